use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "case_client.toml";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub export_dir: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            export_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    export_dir: Option<PathBuf>,
    request_timeout_seconds: Option<u64>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match read_file_settings(path) {
        Ok(Some(file_cfg)) => {
            if let Some(v) = file_cfg.backend_url {
                settings.backend_url = v;
            }
            if let Some(v) = file_cfg.export_dir {
                settings.export_dir = v;
            }
            if let Some(v) = file_cfg.request_timeout_seconds {
                settings.request_timeout = Some(Duration::from_secs(v));
            }
        }
        Ok(None) => {}
        Err(err) => warn!("ignoring settings file: {err:#}"),
    }

    if let Some(v) = env("CASE_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("CASE_EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout = Some(Duration::from_secs(parsed)),
            Err(_) => warn!("ignoring invalid APP__REQUEST_TIMEOUT_SECONDS={v}"),
        }
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url);
    settings
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(parsed))
}

pub fn normalize_backend_url(raw_backend_url: &str) -> String {
    let raw_backend_url = raw_backend_url.trim().trim_end_matches('/');

    if raw_backend_url.is_empty() {
        return DEFAULT_BACKEND_URL.to_string();
    }

    if raw_backend_url.contains("://") {
        return raw_backend_url.to_string();
    }

    format!("http://{raw_backend_url}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
