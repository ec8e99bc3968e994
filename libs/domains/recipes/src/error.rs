use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_nutrition::NutritionError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Nutrition could not be computed; the recipe is not saved
    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RecipeResult<T> = Result<T, RecipeError>;

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::NotFound(id) => AppError::NotFound(format!("Recipe {} not found", id)),
            RecipeError::Validation(msg) => AppError::BadRequest(msg),
            RecipeError::Nutrition(e) => e.into(),
            RecipeError::Database(msg) => AppError::Database(msg),
            RecipeError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for RecipeError {
    fn from(err: mongodb::error::Error) -> Self {
        RecipeError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for RecipeError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RecipeError::Internal(format!("BSON serialization failed: {}", err))
    }
}
