use serde::{Deserialize, Serialize};

use super::{opaque_id, BugStatus, Severity};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BugReport {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    pub status: BugStatus,
    #[serde(rename = "assignedTo", default)]
    pub assigned_to: Option<String>,
}

/// Body of a bug submission.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Bug counts shown on the dashboard.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub open: usize,
    #[serde(rename = "inProgress")]
    pub in_progress: usize,
    pub resolved: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_id_and_missing_assignee() {
        let json = r#"{
            "id": 42,
            "title": "Login button not working",
            "description": "Nothing happens on click",
            "severity": "HIGH",
            "status": "OPEN"
        }"#;
        let bug: BugReport = serde_json::from_str(json).unwrap();
        assert_eq!(bug.id, "42");
        assert_eq!(bug.severity, Severity::High);
        assert_eq!(bug.assigned_to, None);
    }

    #[test]
    fn test_deserialize_string_id_with_assignee() {
        let json = r#"{
            "id": "b-7",
            "title": "Crash on save",
            "description": "",
            "severity": "CRITICAL",
            "status": "IN_PROGRESS",
            "assignedTo": "dev1"
        }"#;
        let bug: BugReport = serde_json::from_str(json).unwrap();
        assert_eq!(bug.id, "b-7");
        assert_eq!(bug.assigned_to.as_deref(), Some("dev1"));
    }

    #[test]
    fn test_stats_use_camel_case() {
        let stats = Stats {
            total: 3,
            open: 1,
            in_progress: 1,
            resolved: 1,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["inProgress"], 1);
    }
}
