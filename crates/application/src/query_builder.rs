//! Translation of client filter lists into employee predicates.

use hrms_core::{AppError, AppResult};
use hrms_domain::{EmployeeField, EmployeeFilter, EmployeePredicate, FilterOperator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `(field, op, value)` triple as submitted by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Employee attribute name.
    pub field: String,
    /// Operator name: `iexact`, `gt`, `gte`, `lt`, `lte` or `icontains`.
    pub op: String,
    /// Scalar operand.
    #[serde(default)]
    pub value: Value,
}

impl FilterSpec {
    /// Creates a filter specification.
    #[must_use]
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value,
        }
    }
}

/// Builds the conjunctive predicate for a filter list.
///
/// The whole list is validated before anything runs: an unknown field, an
/// unknown operator or an operand of the wrong shape rejects the request.
/// An empty list matches every record.
pub fn build_predicate(filters: &[FilterSpec]) -> AppResult<EmployeePredicate> {
    filters
        .iter()
        .map(|spec| {
            let field = EmployeeField::parse_transport(spec.field.as_str())?;
            let operator = FilterOperator::parse_transport(spec.op.as_str())?;
            EmployeeFilter::new(field, operator, &spec.value)
        })
        .collect::<AppResult<Vec<_>>>()
        .map(EmployeePredicate::new)
}

/// Decodes a filter list stored as JSON, as kept on export jobs.
pub fn decode_filter_specs(value: &Value) -> AppResult<Vec<FilterSpec>> {
    if value.is_null() {
        return Ok(Vec::new());
    }

    serde_json::from_value(value.clone())
        .map_err(|error| AppError::Validation(format!("invalid filter list: {error}")))
}

#[cfg(test)]
mod tests {
    use hrms_core::AppError;
    use serde_json::json;

    use super::{FilterSpec, build_predicate, decode_filter_specs};

    #[test]
    fn empty_filter_list_builds_match_all_predicate() {
        let predicate = build_predicate(&[]);
        assert!(predicate.is_ok_and(|predicate| predicate.filters().is_empty()));
    }

    #[test]
    fn unknown_operator_fails_fast() {
        let filters = vec![
            FilterSpec::new("last_name", "iexact", json!("Mensah")),
            FilterSpec::new("last_name", "regex", json!("^M")),
        ];

        assert!(matches!(
            build_predicate(&filters),
            Err(AppError::Validation(message)) if message.contains("regex")
        ));
    }

    #[test]
    fn unknown_field_fails_fast() {
        let filters = vec![FilterSpec::new("salary", "gt", json!(100))];
        assert!(matches!(
            build_predicate(&filters),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn filters_keep_request_order() {
        let filters = vec![
            FilterSpec::new("unit", "icontains", json!("acc")),
            FilterSpec::new("dob", "lt", json!("1990-01-01")),
        ];

        let Ok(predicate) = build_predicate(&filters) else {
            panic!("filters must be valid");
        };
        let fields: Vec<&str> = predicate
            .filters()
            .iter()
            .map(|filter| filter.field().as_str())
            .collect();
        assert_eq!(fields, vec!["unit", "dob"]);
    }

    #[test]
    fn stored_filter_lists_decode() {
        let stored = json!([{ "field": "gender", "op": "iexact", "value": "female" }]);
        let specs = decode_filter_specs(&stored).unwrap_or_default();
        assert_eq!(specs, vec![FilterSpec::new("gender", "iexact", json!("female"))]);
        assert!(decode_filter_specs(&json!(null)).is_ok_and(|specs| specs.is_empty()));
        assert!(decode_filter_specs(&json!({"field": "gender"})).is_err());
    }
}
