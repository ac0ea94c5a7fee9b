use chrono::{DateTime, Utc};
use hrms_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One entry of the audit-style activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeedEntry {
    /// Sequential identifier.
    pub id: i64,
    /// Username of the actor.
    pub creator: String,
    /// Human readable description.
    pub activity: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated activity before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    creator: String,
    activity: String,
}

impl NewActivity {
    /// Validates creator and text; both must be non-blank.
    pub fn new(creator: impl Into<String>, activity: impl Into<String>) -> AppResult<Self> {
        let creator = creator.into();
        let activity = activity.into();

        if creator.trim().is_empty() {
            return Err(AppError::Validation(
                "activity creator must not be empty".to_owned(),
            ));
        }

        if activity.trim().is_empty() {
            return Err(AppError::Validation(
                "activity text must not be empty".to_owned(),
            ));
        }

        Ok(Self { creator, activity })
    }

    /// Returns the actor username.
    #[must_use]
    pub fn creator(&self) -> &str {
        self.creator.as_str()
    }

    /// Returns the activity text.
    #[must_use]
    pub fn activity(&self) -> &str {
        self.activity.as_str()
    }
}

/// Text of the activity recorded when an employee is created.
#[must_use]
pub fn employee_added_activity(actor: &str, service_id: &str) -> String {
    format!("{actor} added a new Employee: '{service_id}'")
}

/// Text of the activity recorded when an employee is updated.
#[must_use]
pub fn employee_updated_activity(actor: &str, service_id: &str, changes: &str) -> String {
    format!("{actor} updated Employee '{service_id}': {changes}")
}

/// Text of the activity recorded when an employee is deleted.
#[must_use]
pub fn employee_deleted_activity(actor: &str, service_id: &str) -> String {
    format!("The Employee '{service_id}' was deleted by {actor}")
}
