use hrms_domain::{Employee, EmployeeField};

/// Describes field differences as `Label: old -> new`, joined by `"; "`.
///
/// Absent values render as `N/A`. Returns an empty string when nothing changed.
#[must_use]
pub fn describe_changes(current: &Employee, updated: &Employee) -> String {
    EmployeeField::ALL
        .into_iter()
        .filter_map(|field| {
            let before = current.field_value(field).text_form();
            let after = updated.field_value(field).text_form();
            (before != after).then(|| {
                format!(
                    "{}: {} -> {}",
                    field.label(),
                    display(before.as_deref()),
                    display(after.as_deref())
                )
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn display(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => "N/A",
    }
}
