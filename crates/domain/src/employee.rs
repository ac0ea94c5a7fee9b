//! Employee personal record and its field-level validation rules.

use chrono::NaiveDate;
use hrms_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::query::EmployeeField;

/// Maximum length of a service identifier.
pub const SERVICE_ID_MAX_LENGTH: usize = 7;

/// Raw employee attributes as submitted by clients and stored in Postgres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    /// Service identifier, also the primary key.
    pub service_id: String,
    /// Family name.
    pub last_name: String,
    /// Given names.
    pub other_names: String,
    /// Gender label.
    pub gender: String,
    /// Date of birth.
    pub dob: NaiveDate,
    /// Home town.
    pub hometown: Option<String>,
    /// Region label.
    pub region: String,
    /// Religion label.
    pub religion: String,
    /// Nationality.
    pub nationality: Option<String>,
    /// Postal or residential address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Marital status label.
    pub marital_status: String,
    /// Unit label.
    pub unit: String,
    /// Grade label.
    pub grade: String,
    /// Duty station.
    pub station: String,
    /// Structure label.
    pub structure: String,
    /// Blood group label.
    pub blood_group: String,
    /// Whether the employee has a registered disability.
    pub disable: bool,
    /// Social security number.
    pub social_security: Option<String>,
    /// Employment category.
    pub category: Option<String>,
    /// First appointment date.
    pub appointment_date: NaiveDate,
    /// Confirmation date.
    pub confirmation_date: Option<NaiveDate>,
    /// Probation note.
    pub probation: Option<String>,
    /// Qualification held at entry.
    pub entry_qualification: Option<String>,
}

/// Validated employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    data: EmployeeData,
}

/// Borrowed view of one employee attribute, typed by field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Text attribute; `None` when the optional value is absent.
    Text(Option<&'a str>),
    /// Date attribute; `None` when the optional value is absent.
    Date(Option<NaiveDate>),
    /// Boolean attribute.
    Boolean(bool),
}

impl FieldValue<'_> {
    /// Whether the stored value is absent.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Text(None) | Self::Date(None))
    }

    /// Returns the textual form used by substring matching and change logs.
    #[must_use]
    pub fn text_form(&self) -> Option<String> {
        match self {
            Self::Text(value) => value.map(str::to_owned),
            Self::Date(value) => value.map(|date| date.format("%Y-%m-%d").to_string()),
            Self::Boolean(value) => Some(value.to_string()),
        }
    }
}

impl Employee {
    /// Validates raw attributes into an employee record.
    ///
    /// Optional text values that are blank are normalized to `None`.
    pub fn new(data: EmployeeData) -> AppResult<Self> {
        let EmployeeData {
            service_id,
            last_name,
            other_names,
            gender,
            dob,
            hometown,
            region,
            religion,
            nationality,
            address,
            email,
            marital_status,
            unit,
            grade,
            station,
            structure,
            blood_group,
            disable,
            social_security,
            category,
            appointment_date,
            confirmation_date,
            probation,
            entry_qualification,
        } = data;

        Ok(Self {
            data: EmployeeData {
                service_id: required_text("service_id", service_id, SERVICE_ID_MAX_LENGTH)?,
                last_name: required_text("last_name", last_name, 255)?,
                other_names: required_text("other_names", other_names, 255)?,
                gender: required_text("gender", gender, 50)?,
                dob,
                hometown: optional_text("hometown", hometown, 255)?,
                region: required_text("region", region, 100)?,
                religion: required_text("religion", religion, 100)?,
                nationality: optional_text("nationality", nationality, 100)?,
                address: optional_text("address", address, 255)?,
                email: optional_text("email", email, 255)?,
                marital_status: required_text("marital_status", marital_status, 50)?,
                unit: required_text("unit", unit, 100)?,
                grade: required_text("grade", grade, 255)?,
                station: required_text("station", station, 100)?,
                structure: required_text("structure", structure, 50)?,
                blood_group: required_text("blood_group", blood_group, 3)?,
                disable,
                social_security: optional_text("social_security", social_security, 13)?,
                category: optional_text("category", category, 25)?,
                appointment_date,
                confirmation_date,
                probation: optional_text("probation", probation, usize::MAX)?,
                entry_qualification: optional_text(
                    "entry_qualification",
                    entry_qualification,
                    255,
                )?,
            },
        })
    }

    /// Returns the service identifier.
    #[must_use]
    pub fn service_id(&self) -> &str {
        self.data.service_id.as_str()
    }

    /// Returns the validated attributes.
    #[must_use]
    pub fn data(&self) -> &EmployeeData {
        &self.data
    }

    /// Consumes the record and returns its attributes.
    #[must_use]
    pub fn into_data(self) -> EmployeeData {
        self.data
    }

    /// Completed years of age on the given date.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.data.dob).unwrap_or(0)
    }

    /// Returns the typed value of one attribute.
    #[must_use]
    pub fn field_value(&self, field: EmployeeField) -> FieldValue<'_> {
        let data = &self.data;
        match field {
            EmployeeField::ServiceId => FieldValue::Text(Some(data.service_id.as_str())),
            EmployeeField::LastName => FieldValue::Text(Some(data.last_name.as_str())),
            EmployeeField::OtherNames => FieldValue::Text(Some(data.other_names.as_str())),
            EmployeeField::Gender => FieldValue::Text(Some(data.gender.as_str())),
            EmployeeField::Dob => FieldValue::Date(Some(data.dob)),
            EmployeeField::Hometown => FieldValue::Text(data.hometown.as_deref()),
            EmployeeField::Region => FieldValue::Text(Some(data.region.as_str())),
            EmployeeField::Religion => FieldValue::Text(Some(data.religion.as_str())),
            EmployeeField::Nationality => FieldValue::Text(data.nationality.as_deref()),
            EmployeeField::Address => FieldValue::Text(data.address.as_deref()),
            EmployeeField::Email => FieldValue::Text(data.email.as_deref()),
            EmployeeField::MaritalStatus => FieldValue::Text(Some(data.marital_status.as_str())),
            EmployeeField::Unit => FieldValue::Text(Some(data.unit.as_str())),
            EmployeeField::Grade => FieldValue::Text(Some(data.grade.as_str())),
            EmployeeField::Station => FieldValue::Text(Some(data.station.as_str())),
            EmployeeField::Structure => FieldValue::Text(Some(data.structure.as_str())),
            EmployeeField::BloodGroup => FieldValue::Text(Some(data.blood_group.as_str())),
            EmployeeField::Disable => FieldValue::Boolean(data.disable),
            EmployeeField::SocialSecurity => FieldValue::Text(data.social_security.as_deref()),
            EmployeeField::Category => FieldValue::Text(data.category.as_deref()),
            EmployeeField::AppointmentDate => FieldValue::Date(Some(data.appointment_date)),
            EmployeeField::ConfirmationDate => FieldValue::Date(data.confirmation_date),
            EmployeeField::Probation => FieldValue::Text(data.probation.as_deref()),
            EmployeeField::EntryQualification => {
                FieldValue::Text(data.entry_qualification.as_deref())
            }
        }
    }
}

fn required_text(field: &str, value: String, max_length: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    check_length(field, trimmed, max_length)?;
    Ok(trimmed.to_owned())
}

fn optional_text(
    field: &str,
    value: Option<String>,
    max_length: usize,
) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    check_length(field, trimmed, max_length)?;
    Ok(Some(trimmed.to_owned()))
}

fn check_length(field: &str, value: &str, max_length: usize) -> AppResult<()> {
    if value.chars().count() > max_length {
        return Err(AppError::Validation(format!(
            "{field} must not exceed {max_length} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::EmployeeData;

    pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    pub(crate) fn employee_data(service_id: &str, last_name: &str) -> EmployeeData {
        EmployeeData {
            service_id: service_id.to_owned(),
            last_name: last_name.to_owned(),
            other_names: "Kwame".to_owned(),
            gender: "Male".to_owned(),
            dob: date(1980, 5, 17),
            hometown: Some("Ho".to_owned()),
            region: "Volta".to_owned(),
            religion: "Christian".to_owned(),
            nationality: Some("Ghanaian".to_owned()),
            address: None,
            email: None,
            marital_status: "Married".to_owned(),
            unit: "Accounts".to_owned(),
            grade: "Senior Officer".to_owned(),
            station: "Accra".to_owned(),
            structure: "Finance".to_owned(),
            blood_group: "O+".to_owned(),
            disable: false,
            social_security: Some("C0123456789".to_owned()),
            category: Some("Senior Staff".to_owned()),
            appointment_date: date(2005, 1, 3),
            confirmation_date: None,
            probation: None,
            entry_qualification: Some("BSc".to_owned()),
        }
    }
}
