use chrono::NaiveDate;
use hrms_application::RetirementForecast;
use hrms_domain::{Employee, EmployeeData};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Employee attributes as exchanged with clients.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/employee-payload.ts"
)]
pub struct EmployeePayload {
    pub service_id: String,
    pub last_name: String,
    pub other_names: String,
    pub gender: String,
    #[ts(type = "string")]
    pub dob: NaiveDate,
    #[serde(default)]
    pub hometown: Option<String>,
    pub region: String,
    pub religion: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub marital_status: String,
    pub unit: String,
    pub grade: String,
    pub station: String,
    pub structure: String,
    pub blood_group: String,
    #[serde(default)]
    pub disable: bool,
    #[serde(default)]
    pub social_security: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[ts(type = "string")]
    pub appointment_date: NaiveDate,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub confirmation_date: Option<NaiveDate>,
    #[serde(default)]
    pub probation: Option<String>,
    #[serde(default)]
    pub entry_qualification: Option<String>,
}

impl From<EmployeePayload> for EmployeeData {
    fn from(payload: EmployeePayload) -> Self {
        Self {
            service_id: payload.service_id,
            last_name: payload.last_name,
            other_names: payload.other_names,
            gender: payload.gender,
            dob: payload.dob,
            hometown: payload.hometown,
            region: payload.region,
            religion: payload.religion,
            nationality: payload.nationality,
            address: payload.address,
            email: payload.email,
            marital_status: payload.marital_status,
            unit: payload.unit,
            grade: payload.grade,
            station: payload.station,
            structure: payload.structure,
            blood_group: payload.blood_group,
            disable: payload.disable,
            social_security: payload.social_security,
            category: payload.category,
            appointment_date: payload.appointment_date,
            confirmation_date: payload.confirmation_date,
            probation: payload.probation,
            entry_qualification: payload.entry_qualification,
        }
    }
}

impl From<EmployeeData> for EmployeePayload {
    fn from(data: EmployeeData) -> Self {
        Self {
            service_id: data.service_id,
            last_name: data.last_name,
            other_names: data.other_names,
            gender: data.gender,
            dob: data.dob,
            hometown: data.hometown,
            region: data.region,
            religion: data.religion,
            nationality: data.nationality,
            address: data.address,
            email: data.email,
            marital_status: data.marital_status,
            unit: data.unit,
            grade: data.grade,
            station: data.station,
            structure: data.structure,
            blood_group: data.blood_group,
            disable: data.disable,
            social_security: data.social_security,
            category: data.category,
            appointment_date: data.appointment_date,
            confirmation_date: data.confirmation_date,
            probation: data.probation,
            entry_qualification: data.entry_qualification,
        }
    }
}

/// Stored employee plus derived values.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/employee-response.ts"
)]
pub struct EmployeeResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: EmployeePayload,
    pub age: u32,
}

impl EmployeeResponse {
    pub fn new(employee: Employee, today: NaiveDate) -> Self {
        let age = employee.age_on(today);
        Self {
            record: employee.into_data().into(),
            age,
        }
    }
}

/// Retirees of one calendar year.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/retirement-forecast-response.ts"
)]
pub struct RetirementForecastResponse {
    pub year: i32,
    #[ts(type = "number")]
    pub count: usize,
    pub employees: Vec<String>,
}

impl From<RetirementForecast> for RetirementForecastResponse {
    fn from(forecast: RetirementForecast) -> Self {
        Self {
            year: forecast.year,
            count: forecast.count,
            employees: forecast.employees,
        }
    }
}
