//! Employee record ports and application service.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use hrms_core::{AppError, AppResult, UserIdentity};
use hrms_domain::{
    Employee, EmployeeData, EmployeePredicate, employee_added_activity, employee_deleted_activity,
    employee_updated_activity,
};
use serde::Serialize;
use tracing::info;

use crate::activity_feed_service::ActivityFeedService;
use crate::clock::{Clock, SystemClock};
use crate::pagination::{Page, PageRequest};
use crate::query_builder::{FilterSpec, build_predicate};

mod changes;


pub use changes::describe_changes;

/// Age at which employees retire.
pub const RETIREMENT_AGE: i32 = 60;

/// Number of years covered by the default retirement forecast.
pub const DEFAULT_FORECAST_YEARS: u32 = 11;

/// Longest retirement forecast a caller may request.
pub const MAX_FORECAST_YEARS: u32 = 100;

/// Repository port for employee persistence.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts a new record; a taken service id is a `Conflict`.
    async fn insert(&self, employee: &Employee) -> AppResult<()>;

    /// Finds a record by service id.
    async fn find(&self, service_id: &str) -> AppResult<Option<Employee>>;

    /// Replaces an existing record; a missing one is `NotFound`.
    async fn update(&self, employee: &Employee) -> AppResult<()>;

    /// Deletes a record and reports whether it existed.
    async fn delete(&self, service_id: &str) -> AppResult<bool>;

    /// Returns one page of records matching the predicate, ordered by service id.
    async fn search(
        &self,
        predicate: &EmployeePredicate,
        page: PageRequest,
    ) -> AppResult<Page<Employee>>;

    /// Counts all records.
    async fn count(&self) -> AppResult<u64>;

    /// Returns `(service_id, birth_year)` for employees born in the inclusive
    /// year range, ordered by service id.
    async fn birth_years_between(
        &self,
        first_year: i32,
        last_year: i32,
    ) -> AppResult<Vec<(String, i32)>>;
}

/// Employees reaching retirement age in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetirementForecast {
    /// Calendar year.
    pub year: i32,
    /// Number of retirees.
    pub count: usize,
    /// Service ids of the retirees.
    pub employees: Vec<String>,
}

/// Application service for employee records.
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
    activity_feed: ActivityFeedService,
    clock: Arc<dyn Clock>,
}

impl EmployeeService {
    /// Creates an employee service.
    #[must_use]
    pub fn new(repository: Arc<dyn EmployeeRepository>, activity_feed: ActivityFeedService) -> Self {
        Self {
            repository,
            activity_feed,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a record and logs the activity.
    pub async fn create(&self, actor: &UserIdentity, data: EmployeeData) -> AppResult<Employee> {
        actor.require_record_writer()?;
        let employee = Employee::new(data)?;

        if self.repository.find(employee.service_id()).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "employee with service id '{}' already exists",
                employee.service_id()
            )));
        }

        self.repository.insert(&employee).await?;
        self.activity_feed
            .record(
                actor,
                employee_added_activity(actor.username(), employee.service_id()),
            )
            .await?;

        info!(service_id = employee.service_id(), actor = actor.username(), "employee created");
        Ok(employee)
    }

    /// Returns one record.
    pub async fn get(&self, _actor: &UserIdentity, service_id: &str) -> AppResult<Employee> {
        self.repository
            .find(service_id)
            .await?
            .ok_or_else(|| employee_not_found(service_id))
    }

    /// Lists records ordered by service id.
    pub async fn list(&self, _actor: &UserIdentity, page: PageRequest) -> AppResult<Page<Employee>> {
        self.repository.search(&EmployeePredicate::all(), page).await
    }

    /// Replaces a record. An activity entry is written only when a field changed.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        service_id: &str,
        data: EmployeeData,
    ) -> AppResult<Employee> {
        actor.require_record_writer()?;

        if data.service_id.trim() != service_id {
            return Err(AppError::Validation(
                "service_id cannot be changed".to_owned(),
            ));
        }

        let updated = Employee::new(data)?;
        let current = self
            .repository
            .find(service_id)
            .await?
            .ok_or_else(|| employee_not_found(service_id))?;

        let changes = describe_changes(&current, &updated);
        if changes.is_empty() {
            return Ok(current);
        }

        self.repository.update(&updated).await?;
        self.activity_feed
            .record(
                actor,
                employee_updated_activity(actor.username(), service_id, &changes),
            )
            .await?;

        info!(service_id, actor = actor.username(), "employee updated");
        Ok(updated)
    }

    /// Deletes a record. Requires an administrator.
    pub async fn delete(&self, actor: &UserIdentity, service_id: &str) -> AppResult<()> {
        actor.require_administrator()?;

        if !self.repository.delete(service_id).await? {
            return Err(employee_not_found(service_id));
        }

        self.activity_feed
            .record(actor, employee_deleted_activity(actor.username(), service_id))
            .await?;

        info!(service_id, actor = actor.username(), "employee deleted");
        Ok(())
    }

    /// Returns one page of records matching every filter.
    pub async fn search(
        &self,
        _actor: &UserIdentity,
        filters: &[FilterSpec],
        page: PageRequest,
    ) -> AppResult<Page<Employee>> {
        let predicate = build_predicate(filters)?;
        self.repository.search(&predicate, page).await
    }

    /// Counts all records.
    pub async fn count(&self, _actor: &UserIdentity) -> AppResult<u64> {
        self.repository.count().await
    }

    /// Groups employees by the year they turn sixty, starting this year.
    pub async fn forecast_retirees(
        &self,
        _actor: &UserIdentity,
        years: u32,
    ) -> AppResult<Vec<RetirementForecast>> {
        if years > MAX_FORECAST_YEARS {
            return Err(AppError::Validation(format!(
                "forecast span must not exceed {MAX_FORECAST_YEARS} years"
            )));
        }

        let current_year = self.clock.now().year();
        let span = i32::try_from(years)
            .map_err(|_| AppError::Validation("forecast span is too large".to_owned()))?;
        if span == 0 {
            return Ok(Vec::new());
        }

        let out_of_range = || AppError::Validation("forecast years are out of range".to_owned());
        let first_birth_year = current_year
            .checked_sub(RETIREMENT_AGE)
            .ok_or_else(out_of_range)?;
        let last_birth_year = first_birth_year
            .checked_add(span - 1)
            .ok_or_else(out_of_range)?;
        let end_year = current_year.checked_add(span).ok_or_else(out_of_range)?;

        let mut retirees: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        for (service_id, birth_year) in self
            .repository
            .birth_years_between(first_birth_year, last_birth_year)
            .await?
        {
            retirees
                .entry(birth_year + RETIREMENT_AGE)
                .or_default()
                .push(service_id);
        }

        Ok((current_year..end_year)
            .map(|year| {
                let employees = retirees.remove(&year).unwrap_or_default();
                RetirementForecast {
                    year,
                    count: employees.len(),
                    employees,
                }
            })
            .collect())
    }
}

fn employee_not_found(service_id: &str) -> AppError {
    AppError::NotFound(format!("employee '{service_id}' does not exist"))
}
