pub mod catalog_repo;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod review_repo;
pub mod session_store;
pub mod user_repo;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("corrupt session payload: {}", e))
    }
}

/// Name of the unique constraint `e` violated, if it is such a violation.
pub(crate) fn unique_violation(e: &DieselError) -> Option<String> {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Some(
            info.constraint_name().unwrap_or_default().to_string(),
        ),
        _ => None,
    }
}
