//! PostgreSQL-backed employee repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use hrms_application::{EmployeeRepository, Page, PageRequest};
use hrms_core::{AppError, AppResult};
use hrms_domain::{Employee, EmployeeData, EmployeePredicate};

mod predicate;


use crate::postgres_error::conflict_or_internal;
use predicate::push_predicate;

const EMPLOYEE_COLUMNS: &str = "service_id, last_name, other_names, gender, dob, hometown, \
     region, religion, nationality, address, email, marital_status, unit, grade, station, \
     structure, blood_group, disable, social_security, category, appointment_date, \
     confirmation_date, probation, entry_qualification";

/// PostgreSQL implementation of the employee repository port.
#[derive(Clone)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    service_id: String,
    last_name: String,
    other_names: String,
    gender: String,
    dob: NaiveDate,
    hometown: Option<String>,
    region: String,
    religion: String,
    nationality: Option<String>,
    address: Option<String>,
    email: Option<String>,
    marital_status: String,
    unit: String,
    grade: String,
    station: String,
    structure: String,
    blood_group: String,
    disable: bool,
    social_security: Option<String>,
    category: Option<String>,
    appointment_date: NaiveDate,
    confirmation_date: Option<NaiveDate>,
    probation: Option<String>,
    entry_qualification: Option<String>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = AppError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let service_id = row.service_id.clone();
        Employee::new(EmployeeData {
            service_id: row.service_id,
            last_name: row.last_name,
            other_names: row.other_names,
            gender: row.gender,
            dob: row.dob,
            hometown: row.hometown,
            region: row.region,
            religion: row.religion,
            nationality: row.nationality,
            address: row.address,
            email: row.email,
            marital_status: row.marital_status,
            unit: row.unit,
            grade: row.grade,
            station: row.station,
            structure: row.structure,
            blood_group: row.blood_group,
            disable: row.disable,
            social_security: row.social_security,
            category: row.category,
            appointment_date: row.appointment_date,
            confirmation_date: row.confirmation_date,
            probation: row.probation,
            entry_qualification: row.entry_qualification,
        })
        .map_err(|error| {
            AppError::Internal(format!("stored employee '{service_id}' is invalid: {error}"))
        })
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn insert(&self, employee: &Employee) -> AppResult<()> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO employees ({EMPLOYEE_COLUMNS}) "));
        push_values(&mut builder, employee.data());

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|error| {
                conflict_or_internal(
                    error,
                    format!("employee '{}' already exists", employee.service_id()),
                    "insert employee",
                )
            })?;

        Ok(())
    }

    async fn find(&self, service_id: &str) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE service_id = $1"
        ))
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find employee '{service_id}': {error}"))
        })?;

        row.map(Employee::try_from).transpose()
    }

    async fn update(&self, employee: &Employee) -> AppResult<()> {
        let data = employee.data();
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET
                last_name = $2,
                other_names = $3,
                gender = $4,
                dob = $5,
                hometown = $6,
                region = $7,
                religion = $8,
                nationality = $9,
                address = $10,
                email = $11,
                marital_status = $12,
                unit = $13,
                grade = $14,
                station = $15,
                structure = $16,
                blood_group = $17,
                disable = $18,
                social_security = $19,
                category = $20,
                appointment_date = $21,
                confirmation_date = $22,
                probation = $23,
                entry_qualification = $24,
                updated_at = now()
            WHERE service_id = $1
            "#,
        )
        .bind(&data.service_id)
        .bind(&data.last_name)
        .bind(&data.other_names)
        .bind(&data.gender)
        .bind(data.dob)
        .bind(&data.hometown)
        .bind(&data.region)
        .bind(&data.religion)
        .bind(&data.nationality)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.marital_status)
        .bind(&data.unit)
        .bind(&data.grade)
        .bind(&data.station)
        .bind(&data.structure)
        .bind(&data.blood_group)
        .bind(data.disable)
        .bind(&data.social_security)
        .bind(&data.category)
        .bind(data.appointment_date)
        .bind(data.confirmation_date)
        .bind(&data.probation)
        .bind(&data.entry_qualification)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update employee '{}': {error}",
                data.service_id
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "employee '{}' does not exist",
                data.service_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, service_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE service_id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete employee '{service_id}': {error}"))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(
        &self,
        predicate: &EmployeePredicate,
        page: PageRequest,
    ) -> AppResult<Page<Employee>> {
        let limit = i64::from(page.page_size());
        let offset = i64::try_from(page.offset()).map_err(|error| {
            AppError::Validation(format!("invalid employee page offset: {error}"))
        })?;

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM employees");
        push_predicate(&mut count_builder, predicate);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count employees: {error}")))?;

        let mut builder = select_page_query(predicate, limit, offset);
        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to search employees: {error}")))?;

        let items = rows
            .into_iter()
            .map(Employee::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
            request: page,
        })
    }

    async fn count(&self) -> AppResult<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count employees: {error}")))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn birth_years_between(
        &self,
        first_year: i32,
        last_year: i32,
    ) -> AppResult<Vec<(String, i32)>> {
        sqlx::query_as::<_, (String, i32)>(
            r#"
            SELECT service_id, EXTRACT(YEAR FROM dob)::INT AS birth_year
            FROM employees
            WHERE dob >= make_date($1, 1, 1)
              AND dob < make_date($2 + 1, 1, 1)
            ORDER BY service_id COLLATE "C"
            "#,
        )
        .bind(first_year)
        .bind(last_year)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load birth years between {first_year} and {last_year}: {error}"
            ))
        })
    }
}

fn select_page_query(
    predicate: &EmployeePredicate,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'_, Postgres> {
    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees"));
    push_predicate(&mut builder, predicate);
    builder.push(" ORDER BY service_id COLLATE \"C\" LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);
    builder
}

fn push_values<'args>(builder: &mut QueryBuilder<'args, Postgres>, data: &'args EmployeeData) {
    builder.push("VALUES (");
    let mut values = builder.separated(", ");
    values
        .push_bind(data.service_id.as_str())
        .push_bind(data.last_name.as_str())
        .push_bind(data.other_names.as_str())
        .push_bind(data.gender.as_str())
        .push_bind(data.dob)
        .push_bind(data.hometown.as_deref())
        .push_bind(data.region.as_str())
        .push_bind(data.religion.as_str())
        .push_bind(data.nationality.as_deref())
        .push_bind(data.address.as_deref())
        .push_bind(data.email.as_deref())
        .push_bind(data.marital_status.as_str())
        .push_bind(data.unit.as_str())
        .push_bind(data.grade.as_str())
        .push_bind(data.station.as_str())
        .push_bind(data.structure.as_str())
        .push_bind(data.blood_group.as_str())
        .push_bind(data.disable)
        .push_bind(data.social_security.as_deref())
        .push_bind(data.category.as_deref())
        .push_bind(data.appointment_date)
        .push_bind(data.confirmation_date)
        .push_bind(data.probation.as_deref())
        .push_bind(data.entry_qualification.as_deref());
    values.push_unseparated(")");
}
