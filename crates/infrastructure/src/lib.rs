//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod csv_report_writer;
mod in_memory_hr_repository;
mod in_memory_throttle_store;
mod in_memory_token_cache;
mod postgres_activity_feed_repository;
mod postgres_employee_repository;
mod postgres_error;
mod postgres_export_job_repository;
mod postgres_user_repository;
mod redis_throttle_store;
mod redis_token_cache;
mod smtp_email_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_email_service::ConsoleEmailService;
pub use csv_report_writer::CsvReportWriter;
pub use in_memory_hr_repository::InMemoryHrRepository;
pub use in_memory_throttle_store::InMemoryThrottleStore;
pub use in_memory_token_cache::InMemoryTokenCache;
pub use postgres_activity_feed_repository::PostgresActivityFeedRepository;
pub use postgres_employee_repository::PostgresEmployeeRepository;
pub use postgres_export_job_repository::PostgresExportJobRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_throttle_store::RedisThrottleStore;
pub use redis_token_cache::RedisTokenCache;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
