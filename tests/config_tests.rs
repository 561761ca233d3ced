// Configuration loading tests
// Author: kelexine (https://github.com/kelexine)

use gemrelay::config::AppConfig;
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_overrides_defaults() {
    let file = toml_file(
        r#"
[server]
port = 9999

[gemini]
model = "gemini-2.5-pro"
api_key_env = "MY_GEMINI_KEY"
"#,
    );

    let config = AppConfig::load_from(Some(file.path())).unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.gemini.api_key_env, "MY_GEMINI_KEY");
    assert_eq!(
        config.gemini.api_base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_explicit_missing_file_is_error() {
    let result = AppConfig::load_from(Some(std::path::Path::new(
        "/nonexistent/gemrelay/config.toml",
    )));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_error() {
    let file = toml_file("[server\nport = ");
    assert!(AppConfig::load_from(Some(file.path())).is_err());
}

#[test]
fn test_rendered_config_round_trips_through_loader() {
    let mut original = AppConfig::default();
    original.gemini.model = "gemini-custom".to_string();
    original.server.body_limit_bytes = 4096;

    let file = toml_file(&original.to_toml().unwrap());
    let loaded = AppConfig::load_from(Some(file.path())).unwrap();

    assert_eq!(loaded.gemini.model, "gemini-custom");
    assert_eq!(loaded.server.body_limit_bytes, 4096);
}
