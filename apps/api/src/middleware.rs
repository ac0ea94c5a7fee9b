use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use hrms_application::{ThrottleDecision, ThrottlePolicy, ThrottleScope};
use hrms_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::session_identity;
use crate::client_ip::resolve_client_ip;
use crate::error::ApiResult;
use crate::state::AppState;

/// Throttle policies applied to a group of routes, checked in order.
#[derive(Debug, Clone)]
pub struct ThrottledRoute {
    policies: Arc<[ThrottlePolicy]>,
}

impl ThrottledRoute {
    pub fn new(scopes: &[ThrottleScope]) -> Self {
        Self {
            policies: scopes
                .iter()
                .map(|scope| ThrottlePolicy::for_scope(*scope))
                .collect(),
        }
    }
}

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Runs every policy of the route; any denial rejects the request with the
/// longest wait. Each policy records the attempt even when another denies.
pub async fn throttle(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(route) = request.extensions().get::<ThrottledRoute>().cloned() else {
        return Ok(next.run(request).await);
    };

    let user: Option<UserIdentity> = session_identity(&session).await?;
    let client_ip = resolve_client_ip(
        request.extensions(),
        request.headers(),
        &state.trusted_proxies,
    );

    let mut longest_wait: Option<u64> = None;
    for policy in route.policies.iter() {
        let identity_key = policy.scope.identity_key(user.as_ref(), client_ip);
        if let ThrottleDecision::Deny { wait_seconds } = state
            .rate_limit_service
            .check(policy, identity_key.as_deref())
            .await?
        {
            longest_wait = Some(longest_wait.map_or(wait_seconds, |wait| wait.max(wait_seconds)));
        }
    }

    if let Some(wait_seconds) = longest_wait {
        return Err(AppError::RateLimited { wait_seconds }.into());
    }

    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.as_str();
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer == allowed_origin
            || referer
                .strip_prefix(allowed_origin)
                .is_some_and(|rest| rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
