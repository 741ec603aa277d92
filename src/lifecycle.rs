//! Bug lifecycle rules.
//!
//! Status moves along OPEN -> IN_PROGRESS -> RESOLVED -> APPROVED, and each
//! edge belongs to exactly one role. Every check here runs before any request
//! reaches the store, so a rejected action never touches the server.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RejectionReason, Result};
use crate::store::BugStore;
use crate::types::{BugReport, BugStatus, Developer, NewBug, Role, Stats};

/// Allowed edges of the status machine and the role each one requires.
pub const TRANSITIONS: &[(BugStatus, BugStatus, Role)] = &[
    (BugStatus::Open, BugStatus::InProgress, Role::Developer),
    (BugStatus::InProgress, BugStatus::Resolved, Role::Developer),
    (BugStatus::Resolved, BugStatus::Approved, Role::Admin),
];

/// Which statuses still accept a (re)assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignPolicy {
    /// Assignment is independent of status.
    #[default]
    AnyStatus,
    /// Approved bugs keep their assignee.
    UntilApproved,
}

impl AssignPolicy {
    pub fn allows(self, status: BugStatus) -> bool {
        match self {
            AssignPolicy::AnyStatus => true,
            AssignPolicy::UntilApproved => status != BugStatus::Approved,
        }
    }
}

fn required_role(current: BugStatus, requested: BugStatus) -> Option<Role> {
    TRANSITIONS
        .iter()
        .find(|(from, to, _)| *from == current && *to == requested)
        .map(|(_, _, role)| *role)
}

/// True iff `requested` is the successor of `current` and `role` owns that edge.
pub fn can_transition(current: BugStatus, requested: BugStatus, role: Role) -> bool {
    required_role(current, requested) == Some(role)
}

/// The transition `role` may perform on `bug`, if any.
pub fn next_action(bug: &BugReport, role: Role) -> Option<BugStatus> {
    bug.status
        .successor()
        .filter(|next| can_transition(bug.status, *next, role))
}

fn check_transition(
    current: BugStatus,
    requested: BugStatus,
    role: Role,
) -> std::result::Result<(), RejectionReason> {
    match required_role(current, requested) {
        None => Err(RejectionReason::InvalidTransition {
            from: current,
            to: requested,
        }),
        Some(required) if required != role => Err(RejectionReason::Unauthorized { role }),
        Some(_) => Ok(()),
    }
}

/// Count bugs per status. APPROVED bugs only count toward the total.
pub fn compute_stats(bugs: &[BugReport]) -> Stats {
    bugs.iter().fold(
        Stats {
            total: bugs.len(),
            ..Stats::default()
        },
        |mut stats, bug| {
            match bug.status {
                BugStatus::Open => stats.open += 1,
                BugStatus::InProgress => stats.in_progress += 1,
                BugStatus::Resolved => stats.resolved += 1,
                BugStatus::Approved => {}
            }
            stats
        },
    )
}

/// Applies lifecycle rules and persists accepted changes through a [`BugStore`].
pub struct LifecycleController<'a, S: BugStore + ?Sized> {
    store: &'a S,
    assign_policy: AssignPolicy,
}

impl<'a, S: BugStore + ?Sized> LifecycleController<'a, S> {
    pub fn new(store: &'a S, assign_policy: AssignPolicy) -> Self {
        Self {
            store,
            assign_policy,
        }
    }

    pub async fn apply_transition(
        &self,
        bug: &BugReport,
        requested: BugStatus,
        role: Role,
    ) -> Result<BugReport> {
        if let Err(reason) = check_transition(bug.status, requested, role) {
            debug!(bug = %bug.id, from = %bug.status, to = %requested, %role, %reason, "transition rejected");
            return Err(reason.into());
        }

        info!(bug = %bug.id, from = %bug.status, to = %requested, "applying transition");
        match requested {
            BugStatus::Approved => self.store.approve(&bug.id).await,
            status => self.store.update_status(&bug.id, status).await,
        }
    }

    pub async fn assign(
        &self,
        bug: &BugReport,
        developer_id: &str,
        role: Role,
        roster: &[Developer],
    ) -> Result<BugReport> {
        let developer_id = developer_id.trim();
        if developer_id.is_empty() {
            return Err(RejectionReason::InvalidTarget("no developer given".to_string()).into());
        }
        if role != Role::Admin {
            return Err(RejectionReason::Unauthorized { role }.into());
        }
        if !roster.iter().any(|d| d.id == developer_id) {
            return Err(RejectionReason::InvalidTarget(format!(
                "unknown developer '{developer_id}'"
            ))
            .into());
        }
        if !self.assign_policy.allows(bug.status) {
            return Err(RejectionReason::AssignmentLocked(bug.status).into());
        }

        info!(bug = %bug.id, developer = developer_id, "assigning bug");
        self.store.assign(&bug.id, developer_id).await
    }

    pub async fn submit(&self, bug: NewBug, role: Role) -> Result<BugReport> {
        if role != Role::Customer {
            return Err(RejectionReason::Unauthorized { role }.into());
        }
        let bug = NewBug {
            title: bug.title.trim().to_string(),
            description: bug.description.trim().to_string(),
            severity: bug.severity,
        };
        if bug.title.is_empty() {
            return Err(RejectionReason::MissingField("title").into());
        }
        if bug.description.is_empty() {
            return Err(RejectionReason::MissingField("description").into());
        }

        info!(title = %bug.title, severity = %bug.severity, "submitting bug");
        self.store.create_bug(&bug).await
    }
}
