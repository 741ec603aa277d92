use serde::Serialize;
use tabled::Tabled;

use crate::client::BugtrackClient;
use crate::commands::bugs::action_label;
use crate::error::{RejectionReason, Result};
use crate::lifecycle::next_action;
use crate::output::{self, truncate};
use crate::queries::{Query, Snapshot};
use crate::session::Session;
use crate::types::{BugReport, Capability, Developer, Role};

#[derive(Tabled)]
struct DeveloperRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
}

impl From<&Developer> for DeveloperRow {
    fn from(dev: &Developer) -> Self {
        Self {
            id: dev.id.clone(),
            username: dev.username.clone(),
        }
    }
}

#[derive(Tabled)]
struct AdminRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assigned To")]
    assignee: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&BugReport> for AdminRow {
    fn from(bug: &BugReport) -> Self {
        let action = match next_action(bug, Role::Admin) {
            Some(next) => action_label(next).to_string(),
            None if bug.status.is_terminal() => "Approved".to_string(),
            None => "Waiting...".to_string(),
        };
        Self {
            id: bug.id.clone(),
            title: truncate(&bug.title, 40),
            severity: bug.severity.colored(),
            status: bug.status.colored(),
            assignee: bug
                .assigned_to
                .clone()
                .unwrap_or_else(|| "-- unassigned --".to_string()),
            action,
        }
    }
}

#[derive(Serialize)]
struct AdminView<'a> {
    bugs: &'a [BugReport],
    developers: &'a [Developer],
}

fn require(session: &Session, capability: Capability) -> Result<()> {
    if session.role.can(capability) {
        Ok(())
    } else {
        Err(RejectionReason::Unauthorized { role: session.role }.into())
    }
}

pub async fn developers(client: &BugtrackClient, session: &Session) -> Result<()> {
    require(session, Capability::AssignDeveloper)?;

    let snapshot = Snapshot::fetch(client, &[Query::Developers]).await?;
    output::print_table(snapshot.developers(), |d| DeveloperRow::from(d));
    Ok(())
}

pub async fn panel(client: &BugtrackClient, session: &Session) -> Result<()> {
    require(session, Capability::AdminPanel)?;

    let snapshot = Snapshot::fetch(client, &[Query::Bugs, Query::Developers]).await?;

    if output::is_json_output() {
        output::print_item(
            &AdminView {
                bugs: snapshot.bugs(),
                developers: snapshot.developers(),
            },
            |_| {},
        );
        return Ok(());
    }

    if snapshot.bugs().is_empty() {
        output::print_message("No bugs in the system yet.");
    } else {
        output::print_table(snapshot.bugs(), |b| AdminRow::from(b));
    }

    println!();
    println!("Developers:");
    output::print_table(snapshot.developers(), |d| DeveloperRow::from(d));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BugStatus, Severity};

    fn bug(status: BugStatus) -> BugReport {
        BugReport {
            id: "1".to_string(),
            title: "Crash".to_string(),
            description: String::new(),
            severity: Severity::High,
            status,
            assigned_to: None,
        }
    }

    #[test]
    fn test_admin_row_actions() {
        assert_eq!(AdminRow::from(&bug(BugStatus::Resolved)).action, "Approve Fix");
        assert_eq!(AdminRow::from(&bug(BugStatus::Approved)).action, "Approved");
        assert_eq!(AdminRow::from(&bug(BugStatus::Open)).action, "Waiting...");
    }

    #[test]
    fn test_panel_requires_admin() {
        let session = Session {
            username: "dana".to_string(),
            role: Role::Developer,
            token: "t".to_string(),
        };
        assert!(require(&session, Capability::AdminPanel).is_err());
        let admin = Session {
            role: Role::Admin,
            ..session
        };
        assert!(require(&admin, Capability::AdminPanel).is_ok());
    }
}
