use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BugtrackError, Result};
use crate::lifecycle::AssignPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const API_URL_ENV: &str = "BUGTRACK_API_URL";

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub assign_policy: AssignPolicy,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| BugtrackError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| BugtrackError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| BugtrackError::Serialize("config", e))?;
        write_private(config_path, &contents).map_err(|e| BugtrackError::ConfigWrite {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_dir() -> Result<PathBuf> {
        ProjectDirs::from("", "", "bugtrack")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(BugtrackError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// API base URL, env var taking precedence over the config file.
    pub fn api_url(&self) -> Result<String> {
        resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }
}

fn resolve_api_url(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
    let raw = from_env
        .or_else(|| from_file.map(String::from))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_url(&raw)
}

/// Write `contents`, creating parent dirs; owner-only permissions on unix.
pub(crate) fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

pub(crate) fn validate_url(raw: &str) -> Result<String> {
    Url::parse(raw).map_err(|source| BugtrackError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}
