use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hrms_application::{ActivityFeedRepository, Page, PageRequest};
use hrms_core::AppResult;
use hrms_domain::{ActivityFeedEntry, NewActivity};

use super::InMemoryHrRepository;

#[async_trait]
impl ActivityFeedRepository for InMemoryHrRepository {
    async fn append(
        &self,
        activity: NewActivity,
        created_at: DateTime<Utc>,
    ) -> AppResult<ActivityFeedEntry> {
        let mut activities = self.activities.write().await;
        let entry = ActivityFeedEntry {
            id: i64::try_from(activities.len()).unwrap_or(i64::MAX - 1) + 1,
            creator: activity.creator().to_owned(),
            activity: activity.activity().to_owned(),
            created_at,
        };
        activities.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        let mut entries = self.activities.read().await.clone();
        sort_newest_first(&mut entries);
        Ok(Page::from_ordered(entries, page))
    }

    async fn search(&self, query: &str, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut entries: Vec<ActivityFeedEntry> = self
            .activities
            .read()
            .await
            .iter()
            .filter(|entry| {
                let activity = entry.activity.to_lowercase();
                let creator = entry.creator.to_lowercase();
                terms
                    .iter()
                    .all(|term| activity.contains(term) || creator.contains(term))
            })
            .cloned()
            .collect();
        sort_newest_first(&mut entries);

        Ok(Page::from_ordered(entries, page))
    }
}

fn sort_newest_first(entries: &mut [ActivityFeedEntry]) {
    entries.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then(right.id.cmp(&left.id))
    });
}
