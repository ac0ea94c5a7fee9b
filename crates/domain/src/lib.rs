//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod activity;
mod employee;
mod export;
mod query;
mod user;

pub use activity::{
    ActivityFeedEntry, NewActivity, employee_added_activity, employee_deleted_activity,
    employee_updated_activity,
};
pub use employee::{Employee, EmployeeData, FieldValue, SERVICE_ID_MAX_LENGTH};
pub use export::{ExportJob, ExportStatus};
pub use query::{
    EmployeeField, EmployeeFilter, EmployeePredicate, FieldKind, FilterOperator, FilterValue,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH, User, Username,
    validate_password,
};
