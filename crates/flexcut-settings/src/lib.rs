//! Flexcut Settings Crate
//!
//! Handles persisted configuration: perforation defaults, measurement backend
//! selection and output preferences, stored as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, Config, MeasurementSettings, OutputSettings, PerforationSettings,
    CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
