//! Configuration loading
//!
//! Reads an optional JSON config file and exposes it as a raw
//! [`serde_json::Value`]; typed config structs are built from it by the
//! modules that own them (see [`crate::server::http::build_http_config`]).
//! A missing file is not an error and yields an empty object.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("failed to parse JSON at {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config root at {path} must be an object")]
    NotAnObject { path: String },
}

/// Get the config file path.
/// Priority: MIRRORBOT_CONFIG_PATH > ~/.mirrorbot/mirrorbot.json
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("MIRRORBOT_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".mirrorbot")
        .join("mirrorbot.json")
}

/// Load and parse the configuration file.
/// Returns empty object `{}` if the file doesn't exist.
pub fn load_config() -> Result<Value, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    if !value.is_object() {
        return Err(ConfigError::NotAnObject {
            path: path.display().to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_empty_object() {
        let cfg = load_config_from(Path::new("/nonexistent/mirrorbot.json")).unwrap();
        assert_eq!(cfg, Value::Object(serde_json::Map::new()));
    }

    #[test]
    fn test_parse_error_is_reported_with_path() {
        let dir = std::env::temp_dir().join("mirrorbot-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let dir = std::env::temp_dir().join("mirrorbot-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("array.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }

    #[test]
    fn test_valid_config_round_trips() {
        let dir = std::env::temp_dir().join("mirrorbot-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("good.json");
        std::fs::write(&path, r#"{ "commands": { "token": "abc" } }"#).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(
            cfg.get("commands").and_then(|c| c.get("token")),
            Some(&Value::String("abc".to_string()))
        );
    }
}
