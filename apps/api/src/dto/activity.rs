use hrms_domain::ActivityFeedEntry;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// `?search=&page=&page_size=` parameters of the activity feed.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityFeedQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// API representation of an activity feed entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/activity-feed-entry-response.ts"
)]
pub struct ActivityFeedEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub creator: String,
    pub activity: String,
    pub created_at: String,
}

impl From<ActivityFeedEntry> for ActivityFeedEntryResponse {
    fn from(entry: ActivityFeedEntry) -> Self {
        Self {
            id: entry.id,
            creator: entry.creator,
            activity: entry.activity,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}
