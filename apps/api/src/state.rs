use std::sync::Arc;

use hrms_application::{
    ActivityFeedService, EmployeeService, ExportService, LoginService, RateLimitService,
    UserService,
};
use ipnet::IpNet;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub employee_service: EmployeeService,
    pub activity_feed_service: ActivityFeedService,
    pub export_service: ExportService,
    pub login_service: LoginService,
    pub user_service: UserService,
    pub rate_limit_service: RateLimitService,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub trusted_proxies: Arc<[IpNet]>,
    pub postgres_pool: sqlx::PgPool,
    pub redis_client: redis::Client,
}
