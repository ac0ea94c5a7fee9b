use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;

use hrms_application::{
    ActivityFeedRepository, EmployeeRepository, ExportJobRepository, FilterSpec, PageRequest,
    UserRepository, build_predicate,
};
use hrms_core::{AppError, AppResult, UserRole};
use hrms_domain::{
    EmailAddress, Employee, EmployeeData, ExportJob, ExportStatus, NewActivity, User, Username,
};

use super::InMemoryHrRepository;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .unwrap_or_default()
}

fn employee(service_id: &str, unit: &str, dob: NaiveDate) -> Employee {
    let data = EmployeeData {
        service_id: service_id.to_owned(),
        last_name: "Mensah".to_owned(),
        other_names: "Kwame".to_owned(),
        gender: "Male".to_owned(),
        dob,
        hometown: None,
        region: "Volta".to_owned(),
        religion: "Christian".to_owned(),
        nationality: None,
        address: None,
        email: None,
        marital_status: "Married".to_owned(),
        unit: unit.to_owned(),
        grade: "Senior Officer".to_owned(),
        station: "Ho".to_owned(),
        structure: "Operations".to_owned(),
        blood_group: "O+".to_owned(),
        disable: false,
        social_security: None,
        category: None,
        appointment_date: date(2015, 1, 5),
        confirmation_date: None,
        probation: None,
        entry_qualification: None,
    };

    match Employee::new(data) {
        Ok(employee) => employee,
        Err(error) => panic!("invalid employee fixture: {error}"),
    }
}

fn user(username: &str, email: &str) -> AppResult<User> {
    Ok(User {
        id: uuid::Uuid::new_v4(),
        full_name: "Efua Owusu".to_owned(),
        username: Username::new(username)?,
        email: EmailAddress::new(email)?,
        role: UserRole::Viewer,
        password_hash: "hash".to_owned(),
        is_active: true,
    })
}

#[tokio::test]
async fn employee_crud_reports_conflicts_and_missing_records() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    let record = employee("1000001", "Audit", date(1970, 2, 1));

    EmployeeRepository::insert(&repository, &record).await?;
    assert!(matches!(
        EmployeeRepository::insert(&repository, &record).await,
        Err(AppError::Conflict(_))
    ));

    let missing = employee("1000002", "Audit", date(1970, 2, 1));
    assert!(matches!(
        EmployeeRepository::update(&repository, &missing).await,
        Err(AppError::NotFound(_))
    ));

    assert!(EmployeeRepository::delete(&repository, "1000001").await?);
    assert!(!EmployeeRepository::delete(&repository, "1000001").await?);
    Ok(())
}

#[tokio::test]
async fn employee_search_filters_and_orders_by_service_id() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    for (service_id, unit) in [("300", "Audit"), ("100", "audit"), ("200", "Payroll")] {
        EmployeeRepository::insert(&repository, &employee(service_id, unit, date(1980, 1, 1)))
            .await?;
    }

    let predicate = build_predicate(&[FilterSpec::new("unit", "iexact", json!("AUDIT"))])?;
    let page =
        EmployeeRepository::search(&repository, &predicate, PageRequest::first(10)).await?;

    let ids: Vec<&str> = page.items.iter().map(Employee::service_id).collect();
    assert_eq!(ids, ["100", "300"]);
    assert_eq!(page.total, 2);
    Ok(())
}

#[tokio::test]
async fn birth_years_are_limited_to_the_range() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    EmployeeRepository::insert(&repository, &employee("1", "Audit", date(1966, 3, 1))).await?;
    EmployeeRepository::insert(&repository, &employee("2", "Audit", date(1990, 3, 1))).await?;

    assert_eq!(
        repository.birth_years_between(1966, 1976).await?,
        vec![("1".to_owned(), 1966)]
    );
    Ok(())
}

#[tokio::test]
async fn activity_search_requires_every_term() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    repository
        .append(NewActivity::new("ama", "ama added a new Employee: '100'")?, at(0))
        .await?;
    repository
        .append(NewActivity::new("kofi", "The Employee '100' was deleted by kofi")?, at(10))
        .await?;

    let both =
        ActivityFeedRepository::search(&repository, "employee 100", PageRequest::first(10)).await?;
    assert_eq!(both.total, 2);
    assert_eq!(both.items[0].creator, "kofi");

    let only_kofi =
        ActivityFeedRepository::search(&repository, "KOFI deleted", PageRequest::first(10)).await?;
    assert_eq!(only_kofi.total, 1);

    let listed = ActivityFeedRepository::list(&repository, PageRequest::first(1)).await?;
    assert_eq!(listed.items[0].id, 2);
    assert!(listed.has_next());
    Ok(())
}

#[tokio::test]
async fn export_jobs_are_claimed_oldest_first_and_once() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    let newer = ExportJob::pending(json!([]), "ama", at(5));
    let older = ExportJob::pending(json!([]), "ama", at(0));
    ExportJobRepository::insert(&repository, &newer).await?;
    ExportJobRepository::insert(&repository, &older).await?;

    let first = repository.claim_next_pending("worker-a", at(6), at(606)).await?;
    assert_eq!(first.map(|job| job.task_id), Some(older.task_id));
    let second = repository.claim_next_pending("worker-b", at(7), at(607)).await?;
    assert_eq!(second.map(|job| job.task_id), Some(newer.task_id));
    assert!(repository.claim_next_pending("worker-c", at(8), at(608)).await?.is_none());

    repository
        .mark_succeeded(older.task_id, "/media/reports/a.csv", at(9))
        .await?;
    let stored = ExportJobRepository::find(&repository, older.task_id).await?;
    assert_eq!(stored.as_ref().map(|job| job.status), Some(ExportStatus::Success));
    assert_eq!(
        stored.and_then(|job| job.file_url).as_deref(),
        Some("/media/reports/a.csv")
    );

    assert!(matches!(
        repository.mark_failed(older.task_id, "late", at(10)).await,
        Err(AppError::Conflict(_))
    ));
    Ok(())
}

#[tokio::test]
async fn finishing_a_pending_job_is_a_conflict() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    let job = ExportJob::pending(json!([]), "ama", at(1));
    ExportJobRepository::insert(&repository, &job).await?;

    assert!(matches!(
        repository.mark_succeeded(job.task_id, "/x", at(2)).await,
        Err(AppError::Conflict(_))
    ));
    Ok(())
}

#[tokio::test]
async fn users_are_unique_by_username_and_email() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    UserRepository::insert(&repository, &user("ama", "ama@example.com")?).await?;

    assert!(matches!(
        UserRepository::insert(&repository, &user("ama", "other@example.com")?).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        UserRepository::insert(&repository, &user("yaw", "AMA@example.com")?).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(UserRepository::count(&repository).await?, 1);
    assert!(repository.find_by_username("ama").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn started_jobs_are_reclaimed_once_their_lease_lapses() -> AppResult<()> {
    let repository = InMemoryHrRepository::new();
    let job = ExportJob::pending(json!([]), "ama", at(0));
    ExportJobRepository::insert(&repository, &job).await?;

    let claimed = repository.claim_next_pending("worker-a", at(1), at(61)).await?;
    assert_eq!(
        claimed.and_then(|job| job.lease_expires_at),
        Some(at(61))
    );
    assert!(repository.claim_next_pending("worker-b", at(60), at(120)).await?.is_none());

    let reclaimed = repository.claim_next_pending("worker-b", at(62), at(122)).await?;
    assert_eq!(reclaimed.as_ref().map(|job| job.task_id), Some(job.task_id));
    assert_eq!(
        reclaimed.map(|job| job.status),
        Some(ExportStatus::Started)
    );

    repository
        .mark_succeeded(job.task_id, "/media/reports/b.csv", at(70))
        .await?;
    let stored = ExportJobRepository::find(&repository, job.task_id).await?;
    assert_eq!(stored.as_ref().map(|job| job.status), Some(ExportStatus::Success));
    assert_eq!(stored.and_then(|job| job.lease_expires_at), None);
    assert!(repository.claim_next_pending("worker-c", at(500), at(560)).await?.is_none());
    Ok(())
}
