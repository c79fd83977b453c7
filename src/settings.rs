use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const BASE_URL_ENV: &str = "EMPLEADOS_API_URL";
const CONFIG_DIR_ENV: &str = "EMPLEADOS_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => config_dir().join("logs"),
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("empleados")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Where the effective base URL came from, for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Flag,
    Env,
    Settings,
}

impl UrlSource {
    pub fn label(self) -> &'static str {
        match self {
            UrlSource::Flag => "--base-url",
            UrlSource::Env => BASE_URL_ENV,
            UrlSource::Settings => "settings",
        }
    }
}

/// The command-line flag wins over the environment, which wins over the settings file.
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<&str>,
    settings: &Settings,
) -> (String, UrlSource) {
    let non_empty = |v: &&str| !v.trim().is_empty();
    if let Some(url) = flag.filter(non_empty) {
        return (url.to_string(), UrlSource::Flag);
    }
    if let Some(url) = env.filter(non_empty) {
        return (url.to_string(), UrlSource::Env);
    }
    (settings.base_url.clone(), UrlSource::Settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            base_url: "http://10.0.0.4:3000".to_string(),
            timeout_secs: 5,
            log_dir: Some("/tmp/empleados-logs".to_string()),
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.base_url, "http://10.0.0.4:3000");
        assert_eq!(loaded.timeout_secs, 5);
        assert_eq!(loaded.log_dir(), PathBuf::from("/tmp/empleados-logs"));
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.timeout_secs, 30);
        assert!(s.log_dir.is_none());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"base_url": "http://192.168.1.100:3000"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.base_url, "http://192.168.1.100:3000");
        assert_eq!(s.timeout_secs, 30);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path).base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_resolve_base_url_precedence() {
        let settings = Settings::default();
        let (url, src) = resolve_base_url(Some("http://flag"), Some("http://env"), &settings);
        assert_eq!((url.as_str(), src), ("http://flag", UrlSource::Flag));

        let (url, src) = resolve_base_url(None, Some("http://env"), &settings);
        assert_eq!((url.as_str(), src), ("http://env", UrlSource::Env));

        let (url, src) = resolve_base_url(Some("  "), None, &settings);
        assert_eq!((url.as_str(), src), (DEFAULT_BASE_URL, UrlSource::Settings));
    }
}
