use flexcut_camtools::MeasurerKind;
use flexcut_settings::{Config, ConfigError, SettingsError};
use std::fs;
use tempfile::TempDir;

fn sample() -> Config {
    let mut config = Config::new();
    config.perforation.cut_length = 4.5;
    config.perforation.bridge_length = 1.25;
    config.perforation.start_with_cut = false;
    config.measurement.measurer = MeasurerKind::Lyon;
    config.output.pretty = true;
    config
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexcut.json");

    sample().save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded, sample());
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexcut.toml");

    sample().save_to_file(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("measurer = \"lyon\""));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexcut.yaml");

    let err = sample().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
    ));
    assert!(!path.exists());
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexcut.toml");
    fs::write(&path, "[perforation]\nbridge_length = -2.0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexcut.json");
    let mut config = Config::new();
    config.measurement.tolerance = -1.0;

    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_malformed_files() {
    let dir = TempDir::new().unwrap();

    let json = dir.path().join("bad.json");
    fs::write(&json, "{ not json").unwrap();
    assert!(matches!(
        Config::load_from_file(&json),
        Err(SettingsError::JsonError(_))
    ));

    let toml = dir.path().join("bad.toml");
    fs::write(&toml, "[perforation\ncut_length = ").unwrap();
    assert!(matches!(
        Config::load_from_file(&toml),
        Err(SettingsError::TomlError(_))
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        Config::load_from_file(&missing),
        Err(SettingsError::IoError(_))
    ));
}
