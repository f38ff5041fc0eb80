//! Configuration file handling for Flexcut
//!
//! Supports JSON and TOML file formats, selected by file extension, stored
//! in a platform-specific config directory by default.
//!
//! Configuration is organized into logical sections:
//! - Perforation parameters (cut and bridge lengths, starting phase)
//! - Measurement backend selection
//! - Output preferences

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use flexcut_camtools::{MeasurerKind, PerforationConfig, PerforationFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "flexcut.toml";

/// Perforation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerforationSettings {
    /// Whether the perforation filter runs at all
    pub enabled: bool,
    /// Arc length of each cut run
    pub cut_length: f64,
    /// Arc length of each uncut bridge
    pub bridge_length: f64,
    /// Start each path with a cut rather than a bridge
    pub start_with_cut: bool,
}

impl Default for PerforationSettings {
    fn default() -> Self {
        let defaults = PerforationConfig::default();
        Self {
            enabled: true,
            cut_length: defaults.cut_length,
            bridge_length: defaults.bridge_length,
            start_with_cut: defaults.start_with_cut,
        }
    }
}

impl PerforationSettings {
    /// Parameters handed to the perforation filter
    pub fn to_config(&self) -> PerforationConfig {
        PerforationConfig::new(self.cut_length, self.bridge_length, self.start_with_cut)
    }
}

/// Measurement backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Which measurer computes arc lengths
    pub measurer: MeasurerKind,
    /// Flattening tolerance, only used by the lyon measurer
    pub tolerance: f64,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        Self {
            measurer: MeasurerKind::Chord,
            tolerance: 0.01,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Process polylines on the rayon thread pool
    pub parallel: bool,
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections or keys fall back to their defaults when loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Perforation parameters
    pub perforation: PerforationSettings,
    /// Measurement backend
    pub measurement: MeasurementSettings,
    /// Output preferences
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("perforation.cut_length", self.perforation.cut_length),
            ("perforation.bridge_length", self.perforation.bridge_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let tolerance = self.measurement.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "measurement.tolerance".to_string(),
                value: tolerance.to_string(),
            });
        }

        Ok(())
    }

    /// Build the perforation filter these settings describe
    pub fn perforation_filter(&self) -> PerforationFilter {
        let measurer = self.measurement.measurer.build(self.measurement.tolerance);
        let mut filter = PerforationFilter::with_measurer(self.perforation.to_config(), measurer);
        filter.set_enabled(self.perforation.enabled);
        filter.set_parallel(self.output.parallel);
        filter
    }

    /// Serialize to the format implied by `extension` ("json" or "toml")
    pub fn to_string_as(&self, extension: &str) -> SettingsResult<String> {
        let format = Format::from_path(Path::new(&format!("config.{}", extension)))?;
        Ok(match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        })
    }
}

/// Default location of the config file in the platform config directory
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("flexcut").join(CONFIG_FILE_NAME))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })
}
