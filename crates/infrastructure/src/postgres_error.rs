use hrms_core::AppError;

/// Maps a unique violation to `Conflict` and anything else to `Internal`.
pub(crate) fn conflict_or_internal(
    error: sqlx::Error,
    conflict_message: String,
    operation: &str,
) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict_message);
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
