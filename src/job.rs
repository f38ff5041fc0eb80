//! Perforation jobs: configuration resolution and file-to-file processing

use anyhow::{Context, Result};
use flexcut_camtools::{FilterHandle, FilterPipeline, FilterRegistry, MeasurerKind};
use flexcut_core::{read_polypath_file, write_polypath, write_polypath_file, Polyline};
use flexcut_settings::{default_config_path, Config};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub cut_length: Option<f64>,
    pub bridge_length: Option<f64>,
    pub start_with_bridge: bool,
    pub measurer: Option<MeasurerKind>,
    pub parallel: bool,
    pub pretty: bool,
}

impl ConfigOverrides {
    /// Apply the overrides on top of `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(cut_length) = self.cut_length {
            config.perforation.cut_length = cut_length;
        }
        if let Some(bridge_length) = self.bridge_length {
            config.perforation.bridge_length = bridge_length;
        }
        if self.start_with_bridge {
            config.perforation.start_with_cut = false;
        }
        if let Some(measurer) = self.measurer {
            config.measurement.measurer = measurer;
        }
        if self.parallel {
            config.output.parallel = true;
        }
        if self.pretty {
            config.output.pretty = true;
        }
    }
}

/// Load the configuration a job runs with.
///
/// An explicit path must exist. Without one, the platform default file is
/// used when present, built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match default_config_path() {
            Ok(path) if path.exists() => Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            _ => {
                debug!("No config file, using defaults");
                Config::default()
            }
        },
    };

    overrides.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Registry of the filters a job can name
pub fn filter_registry(config: &Config) -> FilterRegistry {
    let mut registry = FilterRegistry::new();
    let config = config.clone();
    registry.register("perforation", move || -> FilterHandle {
        Arc::new(config.perforation_filter())
    });
    registry
}

/// Counts reported after a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    pub input_polylines: usize,
    pub output_polylines: usize,
}

/// One perforation run over a polypath
pub struct PerforationJob {
    config: Config,
    pipeline: FilterPipeline,
}

impl PerforationJob {
    pub const FILTERS: &'static [&'static str] = &["perforation"];

    pub fn new(config: Config) -> Result<Self> {
        let pipeline = filter_registry(&config)
            .create_pipeline(Self::FILTERS)
            .context("Failed to build filter pipeline")?;
        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    /// Run the pipeline over an in-memory polypath
    pub fn process(&self, polypath: &[Polyline]) -> Vec<Polyline> {
        self.pipeline.apply(polypath)
    }

    /// Read a polypath from `input`, process it and write it to `output`
    /// (stdout when `None`)
    pub fn run(&self, input: &Path, output: Option<&Path>) -> Result<JobSummary> {
        let polypath = read_polypath_file(input)
            .with_context(|| format!("Failed to read polypath from {}", input.display()))?;

        let processed = self.process(&polypath);
        let pretty = self.config.output.pretty;

        match output {
            Some(path) => write_polypath_file(path, &processed, pretty)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => {
                let mut stdout = io::stdout().lock();
                write_polypath(&mut stdout, &processed, pretty)
                    .context("Failed to write polypath to stdout")?;
                writeln!(stdout)?;
            }
        }

        let summary = JobSummary {
            input_polylines: polypath.len(),
            output_polylines: processed.len(),
        };
        info!(
            "Perforated {}: {} polylines in, {} out",
            input.display(),
            summary.input_polylines,
            summary.output_polylines
        );
        Ok(summary)
    }
}
