use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use flexcut::job::load_config;
use flexcut::{init_logging, Config, ConfigOverrides, LogFormat, MeasurerKind, PerforationJob};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flexcut")]
#[command(about = "Perforated (flex-cut) path processing for cutting plotters")]
#[command(version = flexcut::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split every path of a polypath file into cuts and bridges
    Perforate {
        /// Input polypath (JSON array of polylines)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (.json or .toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Arc length of each cut
        #[arg(long)]
        cut_length: Option<f64>,

        /// Arc length of each uncut bridge
        #[arg(long)]
        bridge_length: Option<f64>,

        /// Start each path with a bridge instead of a cut
        #[arg(long)]
        start_with_bridge: bool,

        /// Arc-length measuring backend
        #[arg(long, value_enum)]
        measurer: Option<MeasurerArg>,

        /// Process polylines in parallel
        #[arg(long)]
        parallel: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the default configuration
    Defaults {
        #[arg(short, long, value_enum, default_value = "toml")]
        format: FormatArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MeasurerArg {
    Chord,
    Lyon,
}

impl From<MeasurerArg> for MeasurerKind {
    fn from(arg: MeasurerArg) -> Self {
        match arg {
            MeasurerArg::Chord => MeasurerKind::Chord,
            MeasurerArg::Lyon => MeasurerKind::Lyon,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Toml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(level, format)?;
    tracing::debug!("flexcut {} (built {})", flexcut::VERSION, flexcut::BUILD_DATE);

    match cli.command {
        Commands::Perforate {
            input,
            output,
            config,
            cut_length,
            bridge_length,
            start_with_bridge,
            measurer,
            parallel,
            pretty,
        } => {
            let overrides = ConfigOverrides {
                cut_length,
                bridge_length,
                start_with_bridge,
                measurer: measurer.map(MeasurerKind::from),
                parallel,
                pretty,
            };
            let config = load_config(config.as_deref(), &overrides)?;
            tracing::debug!("Running with {:?}", config);

            let job = PerforationJob::new(config)?;
            let summary = job.run(&input, output.as_deref())?;
            if let Some(path) = output {
                eprintln!(
                    "Wrote {} polylines ({} in) to {}",
                    summary.output_polylines,
                    summary.input_polylines,
                    path.display()
                );
            }
        }
        Commands::Defaults { format } => {
            let extension = match format {
                FormatArg::Json => "json",
                FormatArg::Toml => "toml",
            };
            let text = Config::default()
                .to_string_as(extension)
                .context("Failed to serialize default configuration")?;
            println!("{}", text);
        }
    }

    Ok(())
}
