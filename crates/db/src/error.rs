//! Classification of `sqlx` errors into the store's failure modes.
//!
//! Repositories return `sqlx::Error` directly; these helpers let callers
//! distinguish rejected writes (constraint violations) from transient
//! contention that should be retried.

use folio_core::error::CoreError;

/// SQLSTATE: unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE: foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE: check constraint violation.
const CHECK_VIOLATION: &str = "23514";
/// SQLSTATEs that indicate transient contention. Callers should retry.
const RETRYABLE: &[&str] = &[
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available
];

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// A unique constraint (including partial unique indexes) rejected the write.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

/// A foreign key constraint rejected the write.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

/// A check constraint rejected the write (invalid input, not contention).
pub fn is_check_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(CHECK_VIOLATION)
}

/// Deadlock, serialization failure, or lock timeout. The operation did not
/// corrupt anything; the caller must retry.
pub fn is_retryable(err: &sqlx::Error) -> bool {
    matches!(sqlstate(err).as_deref(), Some(code) if RETRYABLE.contains(&code))
}

/// Map a database error onto the domain error enum.
///
/// `entity` names what was being written, for error messages only.
pub fn reject(entity: &'static str, err: sqlx::Error) -> CoreError {
    if is_unique_violation(&err) {
        CoreError::Conflict(format!("{entity} violates a uniqueness constraint"))
    } else if is_foreign_key_violation(&err) {
        CoreError::Conflict(format!("{entity} references a missing row"))
    } else if is_check_violation(&err) {
        CoreError::Validation(format!("{entity} failed a check constraint"))
    } else if is_retryable(&err) {
        CoreError::Transient(err.to_string())
    } else {
        CoreError::Internal(err.to_string())
    }
}
