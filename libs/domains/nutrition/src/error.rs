use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Failure of the external product database.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("Product '{0}' not found in external database")]
    NotFound(String),

    /// Network failure, timeout or non-success status
    #[error("Product lookup failed: {0}")]
    Transport(String),

    #[error("Malformed product lookup response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Malformed(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("Ingredient with external id '{0}' already exists")]
    DuplicateKey(String),

    #[error("Ingredient with external id '{0}' not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type NutritionResult<T> = Result<T, NutritionError>;

impl From<NutritionError> for AppError {
    fn from(err: NutritionError) -> Self {
        match err {
            NutritionError::DuplicateKey(id) => {
                AppError::Conflict(format!("Ingredient '{}' already exists", id))
            }
            NutritionError::NotFound(id) => {
                AppError::NotFound(format!("Ingredient '{}' not found", id))
            }
            NutritionError::Validation(msg) => AppError::BadRequest(msg),
            NutritionError::Lookup(LookupError::Malformed(msg)) => AppError::UpstreamMalformed(msg),
            NutritionError::Lookup(e) => AppError::BadGateway(e.to_string()),
            NutritionError::Database(msg) => AppError::Database(msg),
            NutritionError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for NutritionError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for NutritionError {
    fn from(err: mongodb::error::Error) -> Self {
        NutritionError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for NutritionError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        NutritionError::Internal(format!("BSON serialization failed: {}", err))
    }
}
