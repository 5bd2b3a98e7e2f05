//! Error handling for the Malawi Farm Advisory Platform
//!
//! Provides consistent error responses in English and Chichewa

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_ny: String,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Advisory errors
    #[error("Farmer profile incomplete: {0}")]
    IncompleteProfile(String),

    #[error("Store conflict on {entity}: {key}")]
    StoreConflict { entity: String, key: String },

    #[error("Advice generation failed: {0}")]
    GenerationFailure(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ny: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { entity, key } => AppError::StoreConflict {
                entity: entity.to_string(),
                key,
            },
            StoreError::Database(e) => AppError::DatabaseError(e),
            StoreError::InvalidData(msg) => AppError::Internal(msg),
            StoreError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            message: format!("Invalid value for {}", field),
            message_ny: format!("Zomwe mwalemba pa {} sizolondola", field),
            field,
        }
    }
}

impl AppError {
    /// Validation failure from one of the `shared::validation` checks
    pub fn invalid(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_ny: format!("Zomwe mwalemba pa {} sizolondola", field),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::TokenExpired | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_)
            | AppError::IncompleteProfile(_)
            | AppError::StoreConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::GenerationFailure(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_detail = match &self {
            AppError::InvalidCredentials => ErrorDetail {
                code: "INVALID_CREDENTIALS".to_string(),
                message_en: "Invalid username or password".to_string(),
                message_ny: "Dzina kapena mawu achinsinsi sali olondola".to_string(),
                field: None,
            },
            AppError::TokenExpired => ErrorDetail {
                code: "TOKEN_EXPIRED".to_string(),
                message_en: "Token has expired".to_string(),
                message_ny: "Nthawi yolowera yatha, lowaninso".to_string(),
                field: None,
            },
            AppError::InvalidToken => ErrorDetail {
                code: "INVALID_TOKEN".to_string(),
                message_en: "Invalid token".to_string(),
                message_ny: "Chizindikiro cholowera si cholondola".to_string(),
                field: None,
            },
            AppError::Validation {
                field,
                message,
                message_ny,
            } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message_en: message.clone(),
                message_ny: message_ny.clone(),
                field: Some(field.clone()),
            },
            AppError::DuplicateEntry(field) => ErrorDetail {
                code: "DUPLICATE_ENTRY".to_string(),
                message_en: format!("A record with this {} already exists", field),
                message_ny: format!("{} ameneyu alipo kale", field),
                field: Some(field.clone()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message_en: format!("{} not found", resource),
                message_ny: format!("{} sichinapezeke", resource),
                field: None,
            },
            AppError::IncompleteProfile(missing) => ErrorDetail {
                code: "INCOMPLETE_PROFILE".to_string(),
                message_en: format!("Please complete your farmer profile: {}", missing),
                message_ny: "Chonde malizitsani mbiri yanu ya mlimi".to_string(),
                field: None,
            },
            AppError::StoreConflict { entity, .. } => ErrorDetail {
                code: "CONFLICT".to_string(),
                message_en: format!("This {} already exists", entity),
                message_ny: format!("{} ameneyu alipo kale", entity),
                field: Some(entity.clone()),
            },
            AppError::GenerationFailure(_) => ErrorDetail {
                code: "GENERATION_FAILED".to_string(),
                message_en: "Error generating advice. Please try again.".to_string(),
                message_ny: "Pali vuto popanga malangizo. Chonde yesaninso.".to_string(),
                field: None,
            },
            AppError::DatabaseError(_) => ErrorDetail {
                code: "DATABASE_ERROR".to_string(),
                message_en: "A database error occurred".to_string(),
                message_ny: "Pali vuto ndi nkhokwe ya deta".to_string(),
                field: None,
            },
            AppError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message_en: msg.clone(),
                message_ny: "Pali vuto mkati mwa seva".to_string(),
                field: None,
            },
        };

        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
