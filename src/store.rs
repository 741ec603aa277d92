use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BugReport, BugStatus, Developer, NewBug};

/// Remote storage for bugs and users.
///
/// The server performs its own authorization; callers check the lifecycle
/// rules before reaching for any of the mutating methods.
#[async_trait]
pub trait BugStore: Send + Sync {
    async fn list_bugs(&self) -> Result<Vec<BugReport>>;
    async fn create_bug(&self, bug: &NewBug) -> Result<BugReport>;
    async fn update_status(&self, bug_id: &str, status: BugStatus) -> Result<BugReport>;
    async fn approve(&self, bug_id: &str) -> Result<BugReport>;
    async fn assign(&self, bug_id: &str, developer_id: &str) -> Result<BugReport>;
    async fn list_developers(&self) -> Result<Vec<Developer>>;
}
