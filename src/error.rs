use std::path::PathBuf;
use thiserror::Error;

use crate::types::{BugStatus, Role};

/// Reasons the lifecycle rules refuse an action before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Role '{role}' is not allowed to perform this action")]
    Unauthorized { role: Role },

    #[error("Cannot move a bug from {from} to {to}")]
    InvalidTransition { from: BugStatus, to: BugStatus },

    #[error("Invalid assignment target: {0}")]
    InvalidTarget(String),

    #[error("Bugs in status {0} can no longer be reassigned")]
    AssignmentLocked(BugStatus),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum BugtrackError {
    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse session file at {path}: {source}")]
    SessionParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    SessionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {0}: {1}")]
    Serialize(&'static str, #[source] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Not logged in. Run 'bugtrack login' first")]
    NotLoggedIn,

    #[error("No API token given. Pass --token or set BUGTRACK_TOKEN")]
    MissingToken,

    #[error("Bug not found: {0}")]
    BugNotFound(String),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl BugtrackError {
    /// Collaborator unreachable or answered with a non-2xx status.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, BugtrackError::Http(_) | BugtrackError::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, BugtrackError>;
