use colored::Colorize;
use tabled::Tabled;
use tracing::warn;

use crate::cli::{BugCreateArgs, BugListArgs};
use crate::client::BugtrackClient;
use crate::config::Config;
use crate::error::{BugtrackError, Result};
use crate::lifecycle::{next_action, LifecycleController};
use crate::output::{self, truncate};
use crate::queries::{Mutation, Query, Snapshot};
use crate::session::Session;
use crate::store::BugStore;
use crate::types::{BugReport, BugStatus, NewBug, Role};

#[derive(Tabled)]
struct BugRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Next")]
    next: String,
}

impl BugRow {
    fn new(bug: &BugReport, role: Role) -> Self {
        Self {
            id: bug.id.clone(),
            title: truncate(&bug.title, 50),
            severity: bug.severity.colored(),
            status: bug.status.colored(),
            assignee: bug.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
            next: next_action(bug, role)
                .map(|status| action_label(status).to_string())
                .unwrap_or_default(),
        }
    }
}

/// Button text for moving a bug into `status`.
pub fn action_label(status: BugStatus) -> &'static str {
    match status {
        BugStatus::Open => "Open",
        BugStatus::InProgress => "Start Working",
        BugStatus::Resolved => "Mark Resolved",
        BugStatus::Approved => "Approve Fix",
    }
}

pub(crate) fn find_bug<'a>(bugs: &'a [BugReport], id: &str) -> Result<&'a BugReport> {
    bugs.iter()
        .find(|b| b.id == id)
        .ok_or_else(|| BugtrackError::BugNotFound(id.to_string()))
}

fn filter_bugs<'a>(bugs: &'a [BugReport], args: &BugListArgs, role: Role) -> Vec<&'a BugReport> {
    bugs.iter()
        .filter(|b| args.status.map_or(true, |s| b.status == s))
        .filter(|b| !args.actionable || next_action(b, role).is_some())
        .collect()
}

pub async fn list(client: &BugtrackClient, session: &Session, args: BugListArgs) -> Result<()> {
    let snapshot = Snapshot::fetch(client, &[Query::Bugs]).await?;
    let bugs: Vec<BugReport> = filter_bugs(snapshot.bugs(), &args, session.role)
        .into_iter()
        .cloned()
        .collect();

    if bugs.is_empty() && !output::is_json_output() {
        output::print_message("No bugs reported yet.");
        return Ok(());
    }

    output::print_table(&bugs, |b| BugRow::new(b, session.role));
    Ok(())
}

pub async fn show(client: &BugtrackClient, session: &Session, id: &str) -> Result<()> {
    let snapshot = Snapshot::fetch(client, &[Query::Bugs]).await?;
    let bug = find_bug(snapshot.bugs(), id)?;
    output::print_item(bug, |bug| print_details(bug, session.role));
    Ok(())
}

fn print_details(bug: &BugReport, role: Role) {
    println!("#{} - {}", bug.id, bug.title.bold());
    println!();
    if !bug.description.is_empty() {
        println!("{}", bug.description);
        println!();
    }
    println!("Severity: {}", bug.severity.colored());
    println!("Status:   {}", bug.status.colored());
    println!(
        "Assignee: {}",
        bug.assigned_to.as_deref().unwrap_or("-")
    );
    if let Some(next) = next_action(bug, role) {
        println!("Next:     {}", action_label(next).green());
    }
}

pub async fn create(
    client: &BugtrackClient,
    config: &Config,
    session: &Session,
    args: BugCreateArgs,
) -> Result<()> {
    let controller = LifecycleController::new(client, config.assign_policy);
    let created = controller
        .submit(
            NewBug {
                title: args.title,
                description: args.description,
                severity: args.severity,
            },
            session.role,
        )
        .await?;

    let mut snapshot = Snapshot::default();
    finish(client, &mut snapshot, Mutation::Submit, created, session.role).await
}

pub async fn transition(
    client: &BugtrackClient,
    config: &Config,
    session: &Session,
    id: &str,
    status: BugStatus,
) -> Result<()> {
    let mut snapshot = Snapshot::fetch(client, &[Query::Bugs]).await?;
    let bug = find_bug(snapshot.bugs(), id)?.clone();

    let controller = LifecycleController::new(client, config.assign_policy);
    let updated = controller
        .apply_transition(&bug, status, session.role)
        .await?;

    finish(client, &mut snapshot, Mutation::Transition, updated, session.role).await
}

pub async fn assign(
    client: &BugtrackClient,
    config: &Config,
    session: &Session,
    id: &str,
    developer: &str,
) -> Result<()> {
    let mut snapshot = Snapshot::fetch(client, &[Query::Bugs, Query::Developers]).await?;
    let bug = find_bug(snapshot.bugs(), id)?.clone();

    let controller = LifecycleController::new(client, config.assign_policy);
    let updated = controller
        .assign(&bug, developer, session.role, snapshot.developers())
        .await?;

    finish(client, &mut snapshot, Mutation::Assign, updated, session.role).await
}

/// The bug as the server now sees it. The mutation is already saved, so a
/// failed refetch falls back to the report the store returned.
async fn settle<S: BugStore + ?Sized>(
    store: &S,
    snapshot: &mut Snapshot,
    mutation: Mutation,
    returned: BugReport,
) -> BugReport {
    if let Err(e) = snapshot.refresh(store, mutation).await {
        warn!(bug = %returned.id, error = %e, "saved, but refreshing the bug list failed");
        return returned;
    }
    find_bug(snapshot.bugs(), &returned.id)
        .cloned()
        .unwrap_or(returned)
}

/// Status line printed before the bug; JSON output carries the bug alone.
fn summary(mutation: Mutation, bug: &BugReport, json: bool) -> Option<String> {
    if json {
        return None;
    }
    let verb = match mutation {
        Mutation::Submit => "Submitted",
        Mutation::Transition | Mutation::Assign => "Updated",
    };
    Some(format!("{verb} #{} - {}", bug.id, bug.title))
}

async fn finish(
    client: &BugtrackClient,
    snapshot: &mut Snapshot,
    mutation: Mutation,
    returned: BugReport,
    role: Role,
) -> Result<()> {
    let bug = settle(client, snapshot, mutation, returned).await;

    if let Some(line) = summary(mutation, &bug, output::is_json_output()) {
        output::print_message(&line);
        println!();
    }
    output::print_item(&bug, |bug| print_details(bug, role));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::Severity;

    fn bug(id: &str, status: BugStatus) -> BugReport {
        BugReport {
            id: id.to_string(),
            title: format!("bug {id}"),
            description: String::new(),
            severity: Severity::Low,
            status,
            assigned_to: None,
        }
    }

    #[test]
    fn test_find_bug_missing() {
        let bugs = vec![bug("1", BugStatus::Open)];
        assert_eq!(find_bug(&bugs, "1").unwrap().id, "1");
        assert!(matches!(
            find_bug(&bugs, "2"),
            Err(BugtrackError::BugNotFound(id)) if id == "2"
        ));
    }

    #[test]
    fn test_filter_actionable_for_developer() {
        let bugs = vec![
            bug("1", BugStatus::Open),
            bug("2", BugStatus::InProgress),
            bug("3", BugStatus::Resolved),
            bug("4", BugStatus::Approved),
        ];
        let args = BugListArgs {
            status: None,
            actionable: true,
        };

        let ids: Vec<&str> = filter_bugs(&bugs, &args, Role::Developer)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);

        let ids: Vec<&str> = filter_bugs(&bugs, &args, Role::Admin)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_filter_by_status() {
        let bugs = vec![bug("1", BugStatus::Open), bug("2", BugStatus::Resolved)];
        let args = BugListArgs {
            status: Some(BugStatus::Resolved),
            actionable: false,
        };
        let filtered = filter_bugs(&bugs, &args, Role::Customer);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[test]
    fn test_summary_only_outside_json() {
        let updated = bug("12", BugStatus::InProgress);
        assert_eq!(
            summary(Mutation::Transition, &updated, false).as_deref(),
            Some("Updated #12 - bug 12")
        );
        assert_eq!(
            summary(Mutation::Submit, &updated, false).as_deref(),
            Some("Submitted #12 - bug 12")
        );
        assert_eq!(summary(Mutation::Transition, &updated, true), None);
        assert_eq!(summary(Mutation::Assign, &updated, true), None);
    }

    #[tokio::test]
    async fn test_saved_transition_survives_failed_refresh() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/bugs/12")
            .with_status(200)
            .with_body(
                r#"{"id": 12, "title": "Crash", "description": "",
                    "severity": "HIGH", "status": "IN_PROGRESS"}"#,
            )
            .create_async()
            .await;
        let refetch = server
            .mock("GET", "/bugs")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let client = BugtrackClient::new(&server.url(), Some("t".to_string())).unwrap();
        let mut snapshot = Snapshot {
            bugs: Some(vec![bug("12", BugStatus::Open)]),
            developers: None,
        };
        let controller = LifecycleController::new(&client, Default::default());
        let returned = controller
            .apply_transition(&bug("12", BugStatus::Open), BugStatus::InProgress, Role::Developer)
            .await
            .unwrap();

        let shown = settle(&client, &mut snapshot, Mutation::Transition, returned).await;

        put.assert_async().await;
        refetch.assert_async().await;
        assert_eq!(shown.id, "12");
        assert_eq!(shown.status, BugStatus::InProgress);
    }

    #[tokio::test]
    async fn test_settle_prefers_refetched_bug() {
        let store = MemoryStore::new(
            vec![BugReport {
                assigned_to: Some("dana".to_string()),
                ..bug("3", BugStatus::Resolved)
            }],
            Vec::new(),
        );
        let mut snapshot = Snapshot::default();

        let shown = settle(
            &store,
            &mut snapshot,
            Mutation::Transition,
            bug("3", BugStatus::Resolved),
        )
        .await;

        assert_eq!(shown.assigned_to.as_deref(), Some("dana"));
        assert_eq!(store.calls(), vec!["list_bugs"]);
    }

    #[test]
    fn test_row_shows_next_action_for_role() {
        let open = bug("1", BugStatus::Open);
        assert_eq!(BugRow::new(&open, Role::Developer).next, "Start Working");
        assert_eq!(BugRow::new(&open, Role::Customer).next, "");
        assert_eq!(BugRow::new(&open, Role::Customer).assignee, "-");
    }
}
