//! Typed filter conditions over employee records.
//!
//! A predicate is a flat conjunction of `(field, operator, value)` filters.
//! It is evaluated in memory by [`EmployeePredicate::matches`] and rendered
//! to SQL by the Postgres repository; both paths must agree on semantics.

use std::cmp::Ordering;

use chrono::NaiveDate;
use hrms_core::{AppError, AppResult};
use serde_json::Value;

use crate::employee::{Employee, FieldValue};

/// Storage kind of an employee attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Calendar date.
    Date,
    /// Boolean flag.
    Boolean,
}

/// Filterable employee attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    /// `service_id`
    ServiceId,
    /// `last_name`
    LastName,
    /// `other_names`
    OtherNames,
    /// `gender`
    Gender,
    /// `dob`
    Dob,
    /// `hometown`
    Hometown,
    /// `region`
    Region,
    /// `religion`
    Religion,
    /// `nationality`
    Nationality,
    /// `address`
    Address,
    /// `email`
    Email,
    /// `marital_status`
    MaritalStatus,
    /// `unit`
    Unit,
    /// `grade`
    Grade,
    /// `station`
    Station,
    /// `structure`
    Structure,
    /// `blood_group`
    BloodGroup,
    /// `disable`
    Disable,
    /// `social_security`
    SocialSecurity,
    /// `category`
    Category,
    /// `appointment_date`
    AppointmentDate,
    /// `confirmation_date`
    ConfirmationDate,
    /// `probation`
    Probation,
    /// `entry_qualification`
    EntryQualification,
}

impl EmployeeField {
    /// Every employee attribute in display order.
    pub const ALL: [Self; 24] = [
        Self::ServiceId,
        Self::LastName,
        Self::OtherNames,
        Self::Gender,
        Self::Dob,
        Self::Hometown,
        Self::Region,
        Self::Religion,
        Self::Nationality,
        Self::Address,
        Self::Email,
        Self::MaritalStatus,
        Self::Unit,
        Self::Grade,
        Self::Station,
        Self::Structure,
        Self::BloodGroup,
        Self::Disable,
        Self::SocialSecurity,
        Self::Category,
        Self::AppointmentDate,
        Self::ConfirmationDate,
        Self::Probation,
        Self::EntryQualification,
    ];

    /// Parses a transport field name.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown employee field '{value}'")))
    }

    /// Returns the transport name, which is also the column name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceId => "service_id",
            Self::LastName => "last_name",
            Self::OtherNames => "other_names",
            Self::Gender => "gender",
            Self::Dob => "dob",
            Self::Hometown => "hometown",
            Self::Region => "region",
            Self::Religion => "religion",
            Self::Nationality => "nationality",
            Self::Address => "address",
            Self::Email => "email",
            Self::MaritalStatus => "marital_status",
            Self::Unit => "unit",
            Self::Grade => "grade",
            Self::Station => "station",
            Self::Structure => "structure",
            Self::BloodGroup => "blood_group",
            Self::Disable => "disable",
            Self::SocialSecurity => "social_security",
            Self::Category => "category",
            Self::AppointmentDate => "appointment_date",
            Self::ConfirmationDate => "confirmation_date",
            Self::Probation => "probation",
            Self::EntryQualification => "entry_qualification",
        }
    }

    /// Human readable label used in reports and activity messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ServiceId => "Service ID",
            Self::LastName => "Last Name",
            Self::OtherNames => "Other Names",
            Self::Gender => "Gender",
            Self::Dob => "Date of Birth",
            Self::Hometown => "Hometown",
            Self::Region => "Region",
            Self::Religion => "Religion",
            Self::Nationality => "Nationality",
            Self::Address => "Address",
            Self::Email => "Email",
            Self::MaritalStatus => "Marital Status",
            Self::Unit => "Unit",
            Self::Grade => "Grade",
            Self::Station => "Station",
            Self::Structure => "Structure",
            Self::BloodGroup => "Blood Group",
            Self::Disable => "Disable",
            Self::SocialSecurity => "Social Security",
            Self::Category => "Category",
            Self::AppointmentDate => "Appointment Date",
            Self::ConfirmationDate => "Confirmation Date",
            Self::Probation => "Probation",
            Self::EntryQualification => "Entry Qualification",
        }
    }

    /// Returns the storage kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Dob | Self::AppointmentDate | Self::ConfirmationDate => FieldKind::Date,
            Self::Disable => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }
}

/// Comparison operator of one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Case-insensitive equality.
    IExact,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-insensitive substring.
    IContains,
}

impl FilterOperator {
    /// Parses transport value into an operator.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value {
            "iexact" => Ok(Self::IExact),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "icontains" => Ok(Self::IContains),
            _ => Err(AppError::Validation(format!(
                "unknown filter operator '{value}'"
            ))),
        }
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IExact => "iexact",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::IContains => "icontains",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => ordering.is_gt(),
            Self::Gte => ordering.is_ge(),
            Self::Lt => ordering.is_lt(),
            Self::Lte => ordering.is_le(),
            Self::IExact | Self::IContains => false,
        }
    }
}

/// Filter operand coerced to the kind of its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Matches absent optional values (`iexact` only).
    Null,
    /// Text operand.
    Text(String),
    /// Date operand.
    Date(NaiveDate),
    /// Boolean operand.
    Boolean(bool),
}

/// One validated filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFilter {
    field: EmployeeField,
    operator: FilterOperator,
    value: FilterValue,
}

impl EmployeeFilter {
    /// Validates and coerces a raw JSON operand for the given field and operator.
    pub fn new(field: EmployeeField, operator: FilterOperator, value: &Value) -> AppResult<Self> {
        let value = coerce_value(field, operator, value)?;
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    /// Returns the filtered field.
    #[must_use]
    pub fn field(&self) -> EmployeeField {
        self.field
    }

    /// Returns the comparison operator.
    #[must_use]
    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Returns the coerced operand.
    #[must_use]
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Evaluates this condition against one record.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        let stored = employee.field_value(self.field);

        match (self.operator, &self.value) {
            (FilterOperator::IExact, FilterValue::Null) => stored.is_null(),
            (FilterOperator::IExact, FilterValue::Text(expected)) => match stored {
                FieldValue::Text(Some(actual)) => actual.to_lowercase() == expected.to_lowercase(),
                _ => false,
            },
            (FilterOperator::IExact, FilterValue::Date(expected)) => {
                stored == FieldValue::Date(Some(*expected))
            }
            (FilterOperator::IExact, FilterValue::Boolean(expected)) => {
                stored == FieldValue::Boolean(*expected)
            }
            (FilterOperator::IContains, FilterValue::Text(needle)) => stored
                .text_form()
                .map(|haystack| haystack.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            (operator, expected) => compare_stored(stored, expected)
                .map(|ordering| operator.accepts(ordering))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of employee filters. An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePredicate {
    filters: Vec<EmployeeFilter>,
}

impl EmployeePredicate {
    /// Predicate matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Combines filters with logical AND.
    #[must_use]
    pub fn new(filters: Vec<EmployeeFilter>) -> Self {
        Self { filters }
    }

    /// Returns the conjunct filters in request order.
    #[must_use]
    pub fn filters(&self) -> &[EmployeeFilter] {
        &self.filters
    }

    /// Whether every filter accepts the record.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        self.filters.iter().all(|filter| filter.matches(employee))
    }
}

fn compare_stored(stored: FieldValue<'_>, expected: &FilterValue) -> Option<Ordering> {
    match (stored, expected) {
        (FieldValue::Text(Some(actual)), FilterValue::Text(expected)) => {
            Some(actual.cmp(expected.as_str()))
        }
        (FieldValue::Date(Some(actual)), FilterValue::Date(expected)) => Some(actual.cmp(expected)),
        (FieldValue::Boolean(actual), FilterValue::Boolean(expected)) => Some(actual.cmp(expected)),
        _ => None,
    }
}

fn coerce_value(
    field: EmployeeField,
    operator: FilterOperator,
    value: &Value,
) -> AppResult<FilterValue> {
    if value.is_null() {
        return match operator {
            FilterOperator::IExact => Ok(FilterValue::Null),
            _ => Err(AppError::Validation(format!(
                "filter on '{}' with operator '{}' requires a value",
                field.as_str(),
                operator.as_str()
            ))),
        };
    }

    if operator == FilterOperator::IContains {
        return scalar_text(field, value).map(FilterValue::Text);
    }

    match field.kind() {
        FieldKind::Text => scalar_text(field, value).map(FilterValue::Text),
        FieldKind::Date => {
            let raw = value.as_str().ok_or_else(|| malformed_date(field, value))?;
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(FilterValue::Date)
                .map_err(|_| malformed_date(field, value))
        }
        FieldKind::Boolean => match value {
            Value::Bool(flag) => Ok(FilterValue::Boolean(*flag)),
            Value::String(raw) if raw.eq_ignore_ascii_case("true") => Ok(FilterValue::Boolean(true)),
            Value::String(raw) if raw.eq_ignore_ascii_case("false") => {
                Ok(FilterValue::Boolean(false))
            }
            _ => Err(AppError::Validation(format!(
                "filter on '{}' expects a boolean, got {value}",
                field.as_str()
            ))),
        },
    }
}

fn scalar_text(field: EmployeeField, value: &Value) -> AppResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(AppError::Validation(format!(
            "filter on '{}' expects a scalar value, got {value}",
            field.as_str()
        ))),
    }
}

fn malformed_date(field: EmployeeField, value: &Value) -> AppError {
    AppError::Validation(format!(
        "malformed date filter on '{}': expected YYYY-MM-DD, got {value}",
        field.as_str()
    ))
}
