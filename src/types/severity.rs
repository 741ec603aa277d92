use std::fmt;

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Urgency set by the customer when the bug is submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Minor issue, not urgent
    #[default]
    Low,
    /// Affects some users
    Medium,
    /// Major feature broken
    High,
    /// App is unusable
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Severity::Low => label.bright_black().to_string(),
            Severity::Medium => label.blue().to_string(),
            Severity::High => label.yellow().bold().to_string(),
            Severity::Critical => label.red().bold().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
