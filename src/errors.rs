use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Validation(errors) => AppError::Validation {
                message: errors.message,
                fields: errors.fields,
            },
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Unauthenticated => AppError::Unauthenticated,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { message, fields } if !fields.is_empty() => {
                serde_json::json!({ "error": message, "fields": fields })
            }
            AppError::Internal(detail) => {
                log::error!("{}", detail);
                serde_json::json!({ "error": "Internal server error" })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
