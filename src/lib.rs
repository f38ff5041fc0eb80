//! # Flexcut
//!
//! Perforated ("flex-cut") path processing for pen and blade cutting
//! plotters. Continuous cutting paths are rewritten into alternating cuts
//! and uncut bridges, measured by arc length, so that cut-out pieces stay
//! attached to the sheet until they are pushed out by hand.
//!
//! ## Architecture
//!
//! Flexcut is organized as a workspace with multiple crates:
//!
//! 1. **flexcut-core** - Points, polylines, polypath JSON I/O, errors
//! 2. **flexcut-camtools** - Arc-length measurement, perforation, filter pipeline
//! 3. **flexcut-settings** - Configuration files (JSON/TOML) and validation
//! 4. **flexcut** - This facade and the `flexcut` command-line tool

pub mod job;

pub use flexcut_core::{
    read_polypath, read_polypath_file, write_polypath, write_polypath_file, BoundingBox, Error,
    Point, Polyline, Result,
};

pub use flexcut_camtools::{
    CamToolError, ChordMeasurer, FilterPipeline, FilterRegistry, LyonMeasurer, MeasurerKind,
    PathMeasurer, PerforationConfig, PerforationFilter, PerforationSegmenter, PolypathFilter,
};

pub use flexcut_settings::{
    default_config_path, Config, MeasurementSettings, OutputSettings, PerforationSettings,
    SettingsError,
};

pub use job::{ConfigOverrides, JobSummary, PerforationJob};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr (stdout carries polypath data)
/// - RUST_LOG environment variable support, `default_level` otherwise
pub fn init_logging(default_level: tracing::Level, format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
