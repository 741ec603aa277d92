//! The logged-in user, kept in a small TOML file next to the config.
//!
//! Commands load it once and pass it down; nothing reads it ambiently.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{write_private, Config};
use crate::error::{BugtrackError, Result};
use crate::types::Role;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn session_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("session.toml"))
    }

    /// Load the stored session, `None` when nobody is logged in.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| BugtrackError::SessionParse {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Load the stored session or fail with [`BugtrackError::NotLoggedIn`].
    pub fn require() -> Result<Self> {
        Self::load_from(&Self::session_path()?)?.ok_or(BugtrackError::NotLoggedIn)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| BugtrackError::Serialize("session", e))?;
        write_private(path, &contents).map_err(|e| BugtrackError::SessionWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), user = %self.username, "session saved");
        Ok(())
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
