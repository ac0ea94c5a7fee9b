use std::collections::{BTreeMap, HashMap};

use hrms_domain::{ActivityFeedEntry, Employee, ExportJob, User};
use tokio::sync::RwLock;
use uuid::Uuid;

mod activity_feed;
mod employees;
mod export_jobs;
mod users;

#[cfg(test)]
mod tests;

/// In-memory implementation of every HR persistence port.
#[derive(Debug, Default)]
pub struct InMemoryHrRepository {
    employees: RwLock<BTreeMap<String, Employee>>,
    activities: RwLock<Vec<ActivityFeedEntry>>,
    export_jobs: RwLock<HashMap<Uuid, ExportJob>>,
    users: RwLock<Vec<User>>,
}

impl InMemoryHrRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
