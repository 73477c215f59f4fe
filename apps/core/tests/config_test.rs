use std::time::{SystemTime, UNIX_EPOCH};

use photocull_core::config::{self, Config};

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.extension, ".NEF");
    assert_eq!(cfg.trigger_key, "x");
    assert_eq!(cfg.window_marker, "ACDSee");
    assert_eq!(cfg.notify_max_len, 60);
    assert!(cfg.config_path.to_string_lossy().contains("photocull"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn rejects_an_extension_without_a_dot() {
    let cfg = Config {
        extension: "NEF".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_a_bare_dot_extension() {
    let cfg = Config {
        extension: ".".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_an_empty_window_marker() {
    let cfg = Config {
        window_marker: "  ".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_an_unparseable_trigger_key() {
    let cfg = Config {
        trigger_key: "hyper+x".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn normalizes_extensions_with_and_without_the_dot() {
    assert_eq!(config::normalized_extension("nef"), ".nef");
    assert_eq!(config::normalized_extension(".CR2"), ".CR2");
    assert_eq!(config::normalized_extension("  jpg  "), ".jpg");
}

#[test]
fn missing_config_file_loads_defaults_with_the_requested_path() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("photocull-absent-{unique}.toml"));

    let cfg = config::load(Some(&path)).unwrap();

    assert_eq!(cfg.extension, Config::default().extension);
    assert_eq!(cfg.config_path, path);
}

#[test]
fn saved_config_round_trips_through_toml() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir()
        .join(format!("photocull-roundtrip-{unique}"))
        .join("config.toml");

    let mut cfg = Config::default();
    cfg.config_path = path.clone();
    cfg.extension = ".CR2".to_string();
    cfg.window_marker = "FastStone".to_string();
    cfg.notify_error_secs = 7;
    config::save(&cfg).unwrap();

    let reloaded = config::load(Some(&path)).unwrap();
    assert_eq!(reloaded.extension, ".CR2");
    assert_eq!(reloaded.window_marker, "FastStone");
    assert_eq!(reloaded.notify_error_secs, 7);
    assert_eq!(reloaded.config_path, path);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
