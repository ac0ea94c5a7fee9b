use std::path::PathBuf;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use hrms_core::AppError;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;
mod throttled;

#[cfg(test)]
mod tests;

use cors::build_cors_layer;
use throttled::{build_login_routes, build_user_admin_routes};

/// Generated reports exposed under a local path prefix.
#[derive(Debug, Clone)]
pub struct MediaMount {
    pub path_prefix: String,
    pub root: PathBuf,
}

impl MediaMount {
    /// Mounts `root` when `media_url` is a local path such as `/media/`.
    pub fn for_media_url(media_url: &str, root: PathBuf) -> Option<Self> {
        let path_prefix = media_url.trim_end_matches('/');
        if !media_url.starts_with('/') || path_prefix.is_empty() {
            return None;
        }

        Some(Self {
            path_prefix: path_prefix.to_owned(),
            root,
        })
    }
}

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    media: Option<MediaMount>,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let mut protected_routes = Router::new()
        .route(
            "/api/employees",
            get(handlers::employees::list_employees_handler)
                .post(handlers::employees::create_employee_handler),
        )
        .route(
            "/api/employees/count",
            get(handlers::employees::count_employees_handler),
        )
        .route(
            "/api/employees/forecasted-retirees",
            get(handlers::employees::forecasted_retirees_handler),
        )
        .route(
            "/api/employees/{service_id}",
            get(handlers::employees::get_employee_handler)
                .put(handlers::employees::update_employee_handler)
                .delete(handlers::employees::delete_employee_handler),
        )
        .route(
            "/api/search/employee",
            post(handlers::search::search_employees_handler),
        )
        .route(
            "/api/search/employee/export",
            post(handlers::search::export_employees_handler),
        )
        .route(
            "/api/search/employee/export/status/{task_id}",
            get(handlers::search::export_status_handler),
        )
        .route(
            "/api/activity-feeds",
            get(handlers::activity_feeds::list_activity_feeds_handler),
        )
        .merge(build_user_admin_routes(app_state.clone()));

    if let Some(media) = media {
        protected_routes =
            protected_routes.nest_service(media.path_prefix.as_str(), ServeDir::new(media.root));
    }

    let protected_routes = protected_routes.route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .merge(build_login_routes(app_state.clone()))
        .route("/auth/me", get(auth::me_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
