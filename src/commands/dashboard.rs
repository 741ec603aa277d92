use colored::Colorize;
use serde::Serialize;

use crate::client::BugtrackClient;
use crate::error::Result;
use crate::lifecycle::compute_stats;
use crate::output;
use crate::queries::{Query, Snapshot};
use crate::session::Session;
use crate::types::{Capability, Role, Stats};

#[derive(Serialize)]
struct Dashboard<'a> {
    username: &'a str,
    role: Role,
    stats: Stats,
    actions: Vec<&'static str>,
}

/// Quick actions offered to `role`, in display order.
fn quick_actions(role: Role) -> Vec<&'static str> {
    role.capabilities()
        .iter()
        .filter_map(|capability| match capability {
            Capability::ViewBugs => Some("bugtrack bugs"),
            Capability::SubmitBug => Some("bugtrack bug create"),
            Capability::ProgressWork => Some("bugtrack bugs --actionable"),
            Capability::AdminPanel => Some("bugtrack admin"),
            Capability::ApproveFix | Capability::AssignDeveloper => None,
        })
        .collect()
}

pub async fn show(client: &BugtrackClient, session: &Session) -> Result<()> {
    let snapshot = Snapshot::fetch(client, &[Query::Bugs]).await?;
    let dashboard = Dashboard {
        username: &session.username,
        role: session.role,
        stats: compute_stats(snapshot.bugs()),
        actions: quick_actions(session.role),
    };

    output::print_item(&dashboard, |d| {
        println!(
            "Welcome, {}! You are logged in as: {}",
            d.username.bold(),
            d.role.to_string().bold()
        );
        println!();
        println!("  Total Bugs   {}", d.stats.total);
        println!("  Open         {}", d.stats.open.to_string().red());
        println!("  In Progress  {}", d.stats.in_progress.to_string().yellow());
        println!("  Resolved     {}", d.stats.resolved.to_string().green());
        println!();
        println!("Quick Actions:");
        for action in &d.actions {
            println!("  {action}");
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_actions_by_role() {
        assert_eq!(
            quick_actions(Role::Customer),
            vec!["bugtrack bugs", "bugtrack bug create"]
        );
        assert_eq!(
            quick_actions(Role::Developer),
            vec!["bugtrack bugs", "bugtrack bugs --actionable"]
        );
        assert_eq!(
            quick_actions(Role::Admin),
            vec!["bugtrack bugs", "bugtrack admin"]
        );
    }
}
