use axum::Json;
use axum::extract::{Query, State};
use hrms_application::{PageLimits, PageRequest};

use crate::dto::{ActivityFeedEntryResponse, ActivityFeedQuery, PaginatedResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_activity_feeds_handler(
    State(state): State<AppState>,
    Query(query): Query<ActivityFeedQuery>,
) -> ApiResult<Json<PaginatedResponse<ActivityFeedEntryResponse>>> {
    let page_request = PageRequest::new(query.page, query.page_size, PageLimits::STANDARD)?;
    let page = state
        .activity_feed_service
        .list(query.search.as_deref(), page_request)
        .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        ActivityFeedEntryResponse::from,
    )))
}
