mod activity;
mod auth;
mod common;
mod employees;
mod search;
mod users;

pub use activity::{ActivityFeedEntryResponse, ActivityFeedQuery};
pub use auth::{
    BootstrapRequest, LoginRequest, LoginResponse, UserIdentityResponse, VerifyOtpRequest,
};
pub use common::{
    CountResponse, HealthDependencyStatus, HealthResponse, PageQuery, PaginatedResponse,
    ResultsResponse,
};
pub use employees::{EmployeePayload, EmployeeResponse, RetirementForecastResponse};
pub use search::{EmployeeSearchRequest, ExportStartedResponse, ExportStatusResponse};
pub use users::{CreateUserRequest, UserResponse};
