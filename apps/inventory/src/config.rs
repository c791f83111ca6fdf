use std::{
    fs, io,
    path::{Path, PathBuf},
};

use client_core::parse_base_url;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "inventory.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub log_filter: String,
    pub notice_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            log_filter: "info".into(),
            notice_ttl_secs: 3,
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    BaseUrl(#[from] client_core::SetupError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    log_filter: Option<String>,
    notice_ttl_secs: Option<u64>,
}

pub fn load_settings(overrides: &Overrides) -> Result<Settings, ConfigError> {
    load_settings_with(overrides, |key| std::env::var(key).ok())
}

/// Layers defaults, the config file, the environment (read through `env`)
/// and `overrides`, in that order.
pub(crate) fn load_settings_with(
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let file_cfg = match &overrides.config_path {
        Some(path) => read_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_file(path)?
            } else {
                FileSettings::default()
            }
        }
    };
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.notice_ttl_secs {
        settings.notice_ttl_secs = v;
    }

    if let Some(v) = env("LAPTOP_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__NOTICE_TTL_SECS") {
        settings.notice_ttl_secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "APP__NOTICE_TTL_SECS",
            value: v.clone(),
        })?;
    }

    if let Some(v) = &overrides.api_base_url {
        settings.api_base_url = v.clone();
    }

    let url = parse_base_url(&settings.api_base_url)?;
    settings.api_base_url = url.as_str().trim_end_matches('/').to_string();
    Ok(settings)
}

fn read_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
