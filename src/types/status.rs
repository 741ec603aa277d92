use std::fmt;

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a bug report.
///
/// Statuses only move forward: OPEN, IN_PROGRESS, RESOLVED, APPROVED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BugStatus {
    /// Reported, nobody working on it yet
    Open,
    /// A developer has started working on it
    InProgress,
    /// Fixed by a developer, waiting for approval
    Resolved,
    /// Fix approved by an admin
    Approved,
}

impl BugStatus {
    pub const ALL: [BugStatus; 4] = [
        BugStatus::Open,
        BugStatus::InProgress,
        BugStatus::Resolved,
        BugStatus::Approved,
    ];

    /// Wire name, as sent to and received from the API.
    pub fn as_str(self) -> &'static str {
        match self {
            BugStatus::Open => "OPEN",
            BugStatus::InProgress => "IN_PROGRESS",
            BugStatus::Resolved => "RESOLVED",
            BugStatus::Approved => "APPROVED",
        }
    }

    /// The next status in the chain, `None` for the terminal status.
    pub fn successor(self) -> Option<BugStatus> {
        match self {
            BugStatus::Open => Some(BugStatus::InProgress),
            BugStatus::InProgress => Some(BugStatus::Resolved),
            BugStatus::Resolved => Some(BugStatus::Approved),
            BugStatus::Approved => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    /// Get the colored label for terminal output.
    pub fn colored(self) -> String {
        let label = self.as_str();
        match self {
            BugStatus::Open => label.red().bold().to_string(),
            BugStatus::InProgress => label.yellow().to_string(),
            BugStatus::Resolved => label.green().to_string(),
            BugStatus::Approved => label.blue().to_string(),
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_chain_ends_at_approved() {
        let mut status = BugStatus::Open;
        let mut seen = vec![status];
        while let Some(next) = status.successor() {
            seen.push(next);
            status = next;
        }
        assert_eq!(seen, BugStatus::ALL.to_vec());
        assert!(BugStatus::Approved.is_terminal());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&BugStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let status: BugStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(status, BugStatus::Approved);
    }
}
