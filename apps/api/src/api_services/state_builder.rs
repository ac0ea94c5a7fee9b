use std::sync::Arc;

use hrms_application::{
    ActivityFeedRepository, ActivityFeedService, EmailService, EmployeeRepository,
    EmployeeService, ExportJobRepository, ExportService, LoginService, PasswordHasher,
    RateLimitService, ReportWriter, ThrottleStore, TokenCache, UserRepository, UserService,
};
use hrms_core::AppError;
use hrms_infrastructure::{
    Argon2PasswordHasher, CsvReportWriter, PostgresActivityFeedRepository,
    PostgresEmployeeRepository, PostgresExportJobRepository, PostgresUserRepository,
    RedisThrottleStore, RedisTokenCache,
};
use ipnet::IpNet;
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::email::build_email_service;

/// Adapters behind every application port the API uses.
pub struct ServicePorts {
    pub employees: Arc<dyn EmployeeRepository>,
    pub activities: Arc<dyn ActivityFeedRepository>,
    pub export_jobs: Arc<dyn ExportJobRepository>,
    pub users: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_cache: Arc<dyn TokenCache>,
    pub throttle_store: Arc<dyn ThrottleStore>,
    pub email_service: Arc<dyn EmailService>,
    pub report_writer: Arc<dyn ReportWriter>,
}

/// Non-service values carried in the state.
pub struct StateSettings {
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub trusted_proxies: Vec<IpNet>,
    pub postgres_pool: PgPool,
    pub redis_client: redis::Client,
}

pub fn build_app_state(
    pool: PgPool,
    redis_client: redis::Client,
    config: &ApiConfig,
) -> Result<AppState, AppError> {
    let ports = ServicePorts {
        employees: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
        activities: Arc::new(PostgresActivityFeedRepository::new(pool.clone())),
        export_jobs: Arc::new(PostgresExportJobRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        token_cache: Arc::new(RedisTokenCache::new(redis_client.clone())),
        throttle_store: Arc::new(RedisThrottleStore::new(
            redis_client.clone(),
            config.throttle_key_prefix.clone(),
        )),
        email_service: build_email_service(config)?,
        report_writer: Arc::new(CsvReportWriter::new(
            config.media_root.clone(),
            config.media_url.clone(),
        )),
    };

    Ok(assemble_app_state(
        ports,
        StateSettings {
            frontend_url: config.frontend_url.clone(),
            bootstrap_token: config.bootstrap_token.clone(),
            trusted_proxies: config.trusted_proxies.clone(),
            postgres_pool: pool,
            redis_client,
        },
    ))
}

pub fn assemble_app_state(ports: ServicePorts, settings: StateSettings) -> AppState {
    let activity_feed_service = ActivityFeedService::new(ports.activities);

    AppState {
        employee_service: EmployeeService::new(
            ports.employees.clone(),
            activity_feed_service.clone(),
        ),
        activity_feed_service,
        export_service: ExportService::new(
            ports.export_jobs,
            ports.employees,
            ports.report_writer,
        ),
        login_service: LoginService::new(
            ports.users.clone(),
            ports.password_hasher.clone(),
            ports.token_cache,
            ports.email_service,
        ),
        user_service: UserService::new(ports.users, ports.password_hasher),
        rate_limit_service: RateLimitService::new(ports.throttle_store),
        frontend_url: settings.frontend_url,
        bootstrap_token: settings.bootstrap_token,
        trusted_proxies: settings.trusted_proxies.into(),
        postgres_pool: settings.postgres_pool,
        redis_client: settings.redis_client,
    }
}
