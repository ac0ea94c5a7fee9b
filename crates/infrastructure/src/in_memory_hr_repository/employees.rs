use async_trait::async_trait;
use chrono::Datelike;
use hrms_application::{EmployeeRepository, Page, PageRequest};
use hrms_core::{AppError, AppResult};
use hrms_domain::{Employee, EmployeePredicate};

use super::InMemoryHrRepository;

#[async_trait]
impl EmployeeRepository for InMemoryHrRepository {
    async fn insert(&self, employee: &Employee) -> AppResult<()> {
        let mut employees = self.employees.write().await;
        if employees.contains_key(employee.service_id()) {
            return Err(AppError::Conflict(format!(
                "employee '{}' already exists",
                employee.service_id()
            )));
        }

        employees.insert(employee.service_id().to_owned(), employee.clone());
        Ok(())
    }

    async fn find(&self, service_id: &str) -> AppResult<Option<Employee>> {
        Ok(self.employees.read().await.get(service_id).cloned())
    }

    async fn update(&self, employee: &Employee) -> AppResult<()> {
        let mut employees = self.employees.write().await;
        let Some(stored) = employees.get_mut(employee.service_id()) else {
            return Err(AppError::NotFound(format!(
                "employee '{}' does not exist",
                employee.service_id()
            )));
        };

        *stored = employee.clone();
        Ok(())
    }

    async fn delete(&self, service_id: &str) -> AppResult<bool> {
        Ok(self.employees.write().await.remove(service_id).is_some())
    }

    async fn search(
        &self,
        predicate: &EmployeePredicate,
        page: PageRequest,
    ) -> AppResult<Page<Employee>> {
        let matching = self
            .employees
            .read()
            .await
            .values()
            .filter(|employee| predicate.matches(employee))
            .cloned()
            .collect();

        Ok(Page::from_ordered(matching, page))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.employees.read().await.len() as u64)
    }

    async fn birth_years_between(
        &self,
        first_year: i32,
        last_year: i32,
    ) -> AppResult<Vec<(String, i32)>> {
        Ok(self
            .employees
            .read()
            .await
            .values()
            .map(|employee| (employee.service_id().to_owned(), employee.data().dob.year()))
            .filter(|(_, year)| (first_year..=last_year).contains(year))
            .collect())
    }
}
