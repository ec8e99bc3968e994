//! Query-string extractor with validation.

use crate::errors::{ErrorCode, ErrorResponse, validation_details};
use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Same contract as [`super::ValidatedJson`] for `?key=value` parameters.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let body = ErrorResponse::new(ErrorCode::InvalidQuery, e.body_text());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            })?;

        params.validate().map_err(|e| {
            let body = ErrorResponse::new(
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message(),
            )
            .with_details(validation_details(&e));
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        })?;

        Ok(ValidatedQuery(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1, max = 100))]
        limit: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            get(|ValidatedQuery(p): ValidatedQuery<Paging>| async move { p.limit.to_string() }),
        )
    }

    async fn status(uri: &str) -> StatusCode {
        app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_query_validation() {
        assert_eq!(status("/?limit=20").await, StatusCode::OK);
        assert_eq!(status("/?limit=0").await, StatusCode::BAD_REQUEST);
        assert_eq!(status("/?limit=many").await, StatusCode::BAD_REQUEST);
    }
}
