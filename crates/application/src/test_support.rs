//! Fakes and fixtures shared by service tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use hrms_core::{AppError, AppResult, UserIdentity, UserRole};
use hrms_domain::{ActivityFeedEntry, Employee, EmployeeData, EmployeePredicate, NewActivity, User};

use crate::activity_feed_service::ActivityFeedRepository;
use crate::clock::Clock;
use crate::employee_service::EmployeeRepository;
use crate::pagination::{Page, PageRequest};
use crate::user_service::{PasswordHasher, UserRepository};

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    pub(crate) fn on(year: i32, month: u32, day: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn identity(username: &str, role: UserRole) -> UserIdentity {
    UserIdentity::new(
        Uuid::new_v4(),
        username,
        format!("{username}@example.com"),
        role,
    )
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub(crate) fn employee_data(service_id: &str, last_name: &str, dob: NaiveDate) -> EmployeeData {
    EmployeeData {
        service_id: service_id.to_owned(),
        last_name: last_name.to_owned(),
        other_names: "Akosua".to_owned(),
        gender: "Female".to_owned(),
        dob,
        hometown: None,
        region: "Ashanti".to_owned(),
        religion: "Christian".to_owned(),
        nationality: Some("Ghanaian".to_owned()),
        address: None,
        email: None,
        marital_status: "Single".to_owned(),
        unit: "Accounts".to_owned(),
        grade: "Principal Officer".to_owned(),
        station: "Kumasi".to_owned(),
        structure: "Finance".to_owned(),
        blood_group: "A+".to_owned(),
        disable: false,
        social_security: None,
        category: Some("Senior Staff".to_owned()),
        appointment_date: date(2010, 9, 1),
        confirmation_date: None,
        probation: None,
        entry_qualification: None,
    }
}

pub(crate) fn employee(service_id: &str, last_name: &str, dob: NaiveDate) -> Employee {
    match Employee::new(employee_data(service_id, last_name, dob)) {
        Ok(employee) => employee,
        Err(error) => panic!("invalid employee fixture: {error}"),
    }
}

#[derive(Default)]
pub(crate) struct FakeEmployeeRepository {
    pub(crate) records: Mutex<BTreeMap<String, Employee>>,
}

impl FakeEmployeeRepository {
    pub(crate) async fn seed(&self, employees: impl IntoIterator<Item = Employee>) {
        let mut records = self.records.lock().await;
        for employee in employees {
            records.insert(employee.service_id().to_owned(), employee);
        }
    }
}

#[async_trait]
impl EmployeeRepository for FakeEmployeeRepository {
    async fn insert(&self, employee: &Employee) -> AppResult<()> {
        let mut records = self.records.lock().await;
        if records.contains_key(employee.service_id()) {
            return Err(AppError::Conflict("duplicate service id".to_owned()));
        }
        records.insert(employee.service_id().to_owned(), employee.clone());
        Ok(())
    }

    async fn find(&self, service_id: &str) -> AppResult<Option<Employee>> {
        Ok(self.records.lock().await.get(service_id).cloned())
    }

    async fn update(&self, employee: &Employee) -> AppResult<()> {
        let mut records = self.records.lock().await;
        let Some(slot) = records.get_mut(employee.service_id()) else {
            return Err(AppError::NotFound("missing employee".to_owned()));
        };
        *slot = employee.clone();
        Ok(())
    }

    async fn delete(&self, service_id: &str) -> AppResult<bool> {
        Ok(self.records.lock().await.remove(service_id).is_some())
    }

    async fn search(
        &self,
        predicate: &EmployeePredicate,
        page: PageRequest,
    ) -> AppResult<Page<Employee>> {
        let matching = self
            .records
            .lock()
            .await
            .values()
            .filter(|employee| predicate.matches(employee))
            .cloned()
            .collect();
        Ok(Page::from_ordered(matching, page))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.records.lock().await.len() as u64)
    }

    async fn birth_years_between(
        &self,
        first_year: i32,
        last_year: i32,
    ) -> AppResult<Vec<(String, i32)>> {
        use chrono::Datelike;

        Ok(self
            .records
            .lock()
            .await
            .values()
            .map(|employee| (employee.service_id().to_owned(), employee.data().dob.year()))
            .filter(|(_, year)| (first_year..=last_year).contains(year))
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeActivityFeedRepository {
    pub(crate) entries: Mutex<Vec<ActivityFeedEntry>>,
}

impl FakeActivityFeedRepository {
    pub(crate) async fn texts(&self) -> Vec<String> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|entry| entry.activity.clone())
            .collect()
    }
}

#[async_trait]
impl ActivityFeedRepository for FakeActivityFeedRepository {
    async fn append(
        &self,
        activity: NewActivity,
        created_at: DateTime<Utc>,
    ) -> AppResult<ActivityFeedEntry> {
        let mut entries = self.entries.lock().await;
        let entry = ActivityFeedEntry {
            id: entries.len() as i64 + 1,
            creator: activity.creator().to_owned(),
            activity: activity.activity().to_owned(),
            created_at,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        let mut entries = self.entries.lock().await.clone();
        entries.reverse();
        Ok(Page::from_ordered(entries, page))
    }

    async fn search(&self, _query: &str, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        Ok(Page::from_ordered(Vec::new(), page))
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|existing| existing.username == user.username || existing.email == user.email)
        {
            return Err(AppError::Conflict("duplicate user".to_owned()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<User>> {
        let mut users = self.users.lock().await.clone();
        users.sort_by(|left, right| left.username.as_str().cmp(right.username.as_str()));
        Ok(Page::from_ordered(users, page))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.lock().await.len() as u64)
    }
}

/// Reversible stand-in for Argon2 so tests stay fast.
pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}
