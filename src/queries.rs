//! Read queries and what each mutation makes stale.

use tracing::debug;

use crate::error::Result;
use crate::store::BugStore;
use crate::types::{BugReport, Developer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Bugs,
    Developers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Submit,
    Transition,
    Assign,
}

impl Mutation {
    /// Queries whose results are stale once this mutation succeeds.
    pub fn invalidates(self) -> &'static [Query] {
        match self {
            Mutation::Submit | Mutation::Transition | Mutation::Assign => &[Query::Bugs],
        }
    }
}

/// Results of the queries a view depends on.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub bugs: Option<Vec<BugReport>>,
    pub developers: Option<Vec<Developer>>,
}

impl Snapshot {
    /// Run the requested queries concurrently and wait for all of them.
    pub async fn fetch<S: BugStore + ?Sized>(store: &S, queries: &[Query]) -> Result<Self> {
        let mut snapshot = Self::default();
        snapshot.load(store, queries).await?;
        Ok(snapshot)
    }

    /// Re-run only what `mutation` invalidated. On error the snapshot is unchanged.
    pub async fn refresh<S: BugStore + ?Sized>(
        &mut self,
        store: &S,
        mutation: Mutation,
    ) -> Result<()> {
        self.load(store, mutation.invalidates()).await
    }

    async fn load<S: BugStore + ?Sized>(&mut self, store: &S, queries: &[Query]) -> Result<()> {
        let want_bugs = queries.contains(&Query::Bugs);
        let want_developers = queries.contains(&Query::Developers);
        debug!(?queries, "fetching");

        let bugs = async {
            if want_bugs {
                store.list_bugs().await.map(Some)
            } else {
                Ok(None)
            }
        };
        let developers = async {
            if want_developers {
                store.list_developers().await.map(Some)
            } else {
                Ok(None)
            }
        };
        let (bugs, developers) = tokio::try_join!(bugs, developers)?;

        if bugs.is_some() {
            self.bugs = bugs;
        }
        if developers.is_some() {
            self.developers = developers;
        }
        Ok(())
    }

    pub fn bugs(&self) -> &[BugReport] {
        self.bugs.as_deref().unwrap_or_default()
    }

    pub fn developers(&self) -> &[Developer] {
        self.developers.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::{BugStatus, Severity};

    fn store() -> MemoryStore {
        MemoryStore::new(
            vec![BugReport {
                id: "1".to_string(),
                title: "Login button not working".to_string(),
                description: String::new(),
                severity: Severity::Low,
                status: BugStatus::Open,
                assigned_to: None,
            }],
            vec![Developer {
                id: "7".to_string(),
                username: "dana".to_string(),
            }],
        )
    }

    #[tokio::test]
    async fn test_fetch_both_queries() {
        let store = store();
        let snapshot = Snapshot::fetch(&store, &[Query::Bugs, Query::Developers])
            .await
            .unwrap();

        assert_eq!(snapshot.bugs().len(), 1);
        assert_eq!(snapshot.developers().len(), 1);
        let mut calls = store.calls();
        calls.sort();
        assert_eq!(calls, vec!["list_bugs", "list_developers"]);
    }

    #[tokio::test]
    async fn test_refresh_after_transition_only_refetches_bugs() {
        let store = store();
        let mut snapshot = Snapshot::fetch(&store, &[Query::Bugs, Query::Developers])
            .await
            .unwrap();
        store.bugs.lock().unwrap()[0].status = BugStatus::InProgress;

        snapshot.refresh(&store, Mutation::Transition).await.unwrap();

        assert_eq!(snapshot.bugs()[0].status, BugStatus::InProgress);
        assert_eq!(snapshot.developers().len(), 1);
        let calls = store.calls();
        assert_eq!(calls.iter().filter(|c| *c == "list_developers").count(), 1);
        assert_eq!(calls.iter().filter(|c| *c == "list_bugs").count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_results() {
        let store = store();
        let mut snapshot = Snapshot::fetch(&store, &[Query::Bugs, Query::Developers])
            .await
            .unwrap();
        store.bugs.lock().unwrap()[0].status = BugStatus::Resolved;
        store.fail_bugs.store(true, Ordering::Relaxed);

        let err = snapshot.refresh(&store, Mutation::Assign).await.unwrap_err();

        assert!(err.is_network_failure());
        assert_eq!(snapshot.bugs().len(), 1);
        assert_eq!(snapshot.bugs()[0].status, BugStatus::Open);
        assert_eq!(snapshot.developers().len(), 1);
    }

    #[tokio::test]
    async fn test_one_failed_leg_discards_the_other() {
        let store = store();
        let mut snapshot = Snapshot::fetch(&store, &[Query::Bugs, Query::Developers])
            .await
            .unwrap();
        store.bugs.lock().unwrap()[0].status = BugStatus::InProgress;
        store.fail_developers.store(true, Ordering::Relaxed);

        assert!(snapshot
            .load(&store, &[Query::Bugs, Query::Developers])
            .await
            .is_err());

        assert_eq!(snapshot.bugs()[0].status, BugStatus::Open);
        assert_eq!(snapshot.developers()[0].username, "dana");
    }

    #[test]
    fn test_every_mutation_invalidates_bugs() {
        for mutation in [Mutation::Submit, Mutation::Transition, Mutation::Assign] {
            assert_eq!(mutation.invalidates(), &[Query::Bugs]);
        }
    }
}
