use sqlx::{Postgres, QueryBuilder};

use hrms_domain::{EmployeeFilter, EmployeePredicate, FieldKind, FilterOperator, FilterValue};

/// Appends ` WHERE ...` for a non-empty predicate.
///
/// Text ordering uses the "C" collation so it agrees with the byte-wise
/// comparison of `EmployeePredicate::matches`.
pub(super) fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &EmployeePredicate) {
    for (index, filter) in predicate.filters().iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        push_filter_condition(builder, filter);
    }
}

fn push_filter_condition(builder: &mut QueryBuilder<'_, Postgres>, filter: &EmployeeFilter) {
    // Column names come from the closed field enum, never from request text.
    let column = filter.field().as_str();

    match (filter.operator(), filter.value()) {
        (FilterOperator::IExact, FilterValue::Null) => {
            builder.push(column);
            builder.push(" IS NULL");
        }
        (FilterOperator::IExact, FilterValue::Text(expected)) => {
            builder.push("LOWER(");
            builder.push(column);
            builder.push(") = LOWER(");
            builder.push_bind(expected.clone());
            builder.push(')');
        }
        (FilterOperator::IExact, FilterValue::Date(expected)) => {
            builder.push(column);
            builder.push(" = ");
            builder.push_bind(*expected);
        }
        (FilterOperator::IExact, FilterValue::Boolean(expected)) => {
            builder.push(column);
            builder.push(" = ");
            builder.push_bind(*expected);
        }
        (FilterOperator::IContains, FilterValue::Text(needle)) => {
            builder.push(column);
            if filter.field().kind() != FieldKind::Text {
                builder.push("::TEXT");
            }
            builder.push(" ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(needle)));
            builder.push(r" ESCAPE '\'");
        }
        (operator, value) => {
            let Some(comparison) = comparison_sql(operator) else {
                builder.push("FALSE");
                return;
            };

            match value {
                FilterValue::Text(expected) => {
                    builder.push(column);
                    builder.push(" COLLATE \"C\" ");
                    builder.push(comparison);
                    builder.push(' ');
                    builder.push_bind(expected.clone());
                }
                FilterValue::Date(expected) => {
                    builder.push(column);
                    builder.push(' ');
                    builder.push(comparison);
                    builder.push(' ');
                    builder.push_bind(*expected);
                }
                FilterValue::Boolean(expected) => {
                    builder.push(column);
                    builder.push(' ');
                    builder.push(comparison);
                    builder.push(' ');
                    builder.push_bind(*expected);
                }
                FilterValue::Null => {
                    builder.push("FALSE");
                }
            }
        }
    }
}

fn comparison_sql(operator: FilterOperator) -> Option<&'static str> {
    match operator {
        FilterOperator::Gt => Some(">"),
        FilterOperator::Gte => Some(">="),
        FilterOperator::Lt => Some("<"),
        FilterOperator::Lte => Some("<="),
        FilterOperator::IExact | FilterOperator::IContains => None,
    }
}

pub(super) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
