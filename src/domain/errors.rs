use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::Validation(ValidationErrors::new(message))
    }
}

/// A summary message plus the per-field problems that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub message: String,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, field: &str, issue: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(issue.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when no field was flagged, otherwise a `Validation` error.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (field, issues) in &self.fields {
            write!(f, "; {}: {}", field, issues.join(", "))?;
        }
        Ok(())
    }
}

/// Field checks shared by the order and account forms.
pub(crate) fn check_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    required: bool,
    max_len: usize,
) {
    let trimmed = value.trim();
    if required && trimmed.is_empty() {
        errors.add(field, "This field is required.");
    }
    if trimmed.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
    }
}

pub(crate) fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    let well_formed = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !value.is_empty() && !well_formed {
        errors.add(field, "Enter a valid email address.");
    }
}
