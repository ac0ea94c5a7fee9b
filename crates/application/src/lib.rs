//! Application services and ports.

#![forbid(unsafe_code)]

mod activity_feed_service;
mod clock;
mod employee_service;
mod export_service;
mod login_service;
mod pagination;
mod query_builder;
mod rate_limit_service;
mod retry;
mod user_service;

#[cfg(test)]
mod test_support;

pub use activity_feed_service::{ActivityFeedRepository, ActivityFeedService};
pub use clock::{Clock, SystemClock};
pub use employee_service::{
    DEFAULT_FORECAST_YEARS, EmployeeRepository, EmployeeService, MAX_FORECAST_YEARS,
    RETIREMENT_AGE, RetirementForecast, describe_changes,
};
pub use export_service::{
    EXPORT_COLUMNS, EXPORT_LEASE_SECONDS, EXPORT_PAGE_SIZE, EmployeeReport, ExportJobRepository, ExportRunOutcome,
    ExportService, ExportStatusView, ReportWriter,
};
pub use login_service::{
    EmailService, LoginChallenge, LoginService, OTP_SENT_MESSAGE, OTP_TTL_SECONDS,
    TEMP_TOKEN_PREFIX, TokenCache,
};
pub use pagination::{Page, PageLimits, PageRequest};
pub use query_builder::{FilterSpec, build_predicate, decode_filter_specs};
pub use rate_limit_service::{
    AttemptEvaluation, AttemptRecord, RateLimitService, ThrottleDecision, ThrottlePolicy,
    ThrottleScope, ThrottleStore, evaluate_attempt,
};
pub use retry::RetryPolicy;
pub use user_service::{NewUserInput, PasswordHasher, UserRepository, UserService};
