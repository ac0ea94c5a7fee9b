//! Activity feed ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hrms_core::{AppResult, UserIdentity};
use hrms_domain::{ActivityFeedEntry, NewActivity};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::pagination::{Page, PageRequest};


/// Repository port for activity feed persistence.
#[async_trait]
pub trait ActivityFeedRepository: Send + Sync {
    /// Appends one entry and returns it with its assigned id.
    async fn append(
        &self,
        activity: NewActivity,
        created_at: DateTime<Utc>,
    ) -> AppResult<ActivityFeedEntry>;

    /// Lists entries, newest first.
    async fn list(&self, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>>;

    /// Full-text search over activity text and creator, best match first.
    async fn search(&self, query: &str, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>>;
}

/// Application service for the activity feed.
#[derive(Clone)]
pub struct ActivityFeedService {
    repository: Arc<dyn ActivityFeedRepository>,
    clock: Arc<dyn Clock>,
}

impl ActivityFeedService {
    /// Creates an activity feed service.
    #[must_use]
    pub fn new(repository: Arc<dyn ActivityFeedRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Records an activity performed by `actor`.
    pub async fn record(
        &self,
        actor: &UserIdentity,
        activity: impl Into<String>,
    ) -> AppResult<ActivityFeedEntry> {
        let activity = NewActivity::new(actor.username(), activity)?;
        let entry = self.repository.append(activity, self.clock.now()).await?;
        debug!(activity_id = entry.id, creator = %entry.creator, "activity recorded");
        Ok(entry)
    }

    /// Lists the feed, or searches it when `query` has content.
    pub async fn list(
        &self,
        query: Option<&str>,
        page: PageRequest,
    ) -> AppResult<Page<ActivityFeedEntry>> {
        match query.map(str::trim).filter(|query| !query.is_empty()) {
            Some(query) => self.repository.search(query, page).await,
            None => self.repository.list(page).await,
        }
    }
}
