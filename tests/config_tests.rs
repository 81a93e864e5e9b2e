// Config loading and validation tests

use plugin_counter::config::AppConfig;

const VALID_CONFIG: &str = r##"
[server]
host = "0.0.0.0"
port = 8081

[database]
path = "data/downloads.db"
max_pool_size = 10

[catalogue]
base_url = "https://plugins.example.org/catalogue/"
timeout_secs = 10

[throttle]
hours = 24

[badge]
label = "downloads"
color = "#007ec6"

[sparkline]
width = 200
height = 50
color = "#007ec6"
default_days = 30
"##;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.database.path, "data/downloads.db");
    assert_eq!(config.catalogue.timeout_secs, 10);
    assert_eq!(config.throttle.hours, 24);
    assert_eq!(config.badge.label, "downloads");
    assert_eq!(config.sparkline.default_days, 30);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("").expect("empty config uses defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.database.path, "downloads.db");
    assert_eq!(config.throttle.hours, 24);
    assert_eq!(config.badge.label, "downloads");
    assert_eq!(config.badge.color, "#007ec6");
    assert_eq!(config.sparkline.width, 200);
    assert_eq!(config.sparkline.height, 50);
    assert_eq!(config.sparkline.default_days, 30);
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[server]\nport = 9000\n").expect("partial config");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.database.path, "downloads.db");
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_db_path() {
    let bad = VALID_CONFIG.replace("path = \"data/downloads.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_config_validation_rejects_max_pool_size_zero() {
    let bad = VALID_CONFIG.replace("max_pool_size = 10", "max_pool_size = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_pool_size"));
}

#[test]
fn test_config_validation_rejects_empty_base_url() {
    let bad = VALID_CONFIG.replace(
        "base_url = \"https://plugins.example.org/catalogue/\"",
        "base_url = \"\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("base_url"));
}

#[test]
fn test_config_validation_rejects_timeout_zero() {
    let bad = VALID_CONFIG.replace("timeout_secs = 10", "timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("timeout_secs"));
}

#[test]
fn test_config_validation_rejects_throttle_hours_zero() {
    let bad = VALID_CONFIG.replace("hours = 24", "hours = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("throttle.hours"));
}

#[test]
fn test_config_validation_rejects_sparkline_width_zero() {
    let bad = VALID_CONFIG.replace("width = 200", "width = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sparkline.width"));
}

#[test]
fn test_config_validation_rejects_default_days_out_of_range() {
    let bad = VALID_CONFIG.replace("default_days = 30", "default_days = 400");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("default_days"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.database.path, "data/downloads.db");
}
