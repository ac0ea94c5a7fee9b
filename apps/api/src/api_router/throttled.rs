use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use hrms_application::ThrottleScope;

use crate::middleware::ThrottledRoute;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

/// Login steps and logout, throttled per client address and per signed-in user.
pub(super) fn build_login_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/verify-otp", post(auth::verify_otp_handler))
        .route("/auth/resend-otp", post(auth::resend_otp_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route_layer(from_fn_with_state(app_state, middleware::throttle))
        .layer(axum::Extension(ThrottledRoute::new(&[
            ThrottleScope::Anonymous,
            ThrottleScope::User,
        ])))
}

pub(super) fn build_user_admin_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route_layer(from_fn_with_state(app_state, middleware::throttle))
        .layer(axum::Extension(ThrottledRoute::new(&[ThrottleScope::User])))
}
