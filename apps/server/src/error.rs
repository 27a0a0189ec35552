use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use venuemap_core::errors::{DatabaseError, Error as CoreError};
use venuemap_core::matching::MatchingError;
use venuemap_core::taxonomies::TaxonomyError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Taxonomy(TaxonomyError::Schema(_)) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_ERROR")
                }
                CoreError::Taxonomy(TaxonomyError::NodeNotFound(_)) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND")
                }
                CoreError::Taxonomy(TaxonomyError::UnknownTerm { .. }) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_TERM")
                }
                CoreError::Taxonomy(TaxonomyError::NotACategory(_)) => {
                    (StatusCode::BAD_REQUEST, "NOT_A_CATEGORY")
                }
                CoreError::Matching(MatchingError::InvalidRequirement(_)) => {
                    (StatusCode::BAD_REQUEST, "INVALID_REQUIREMENT")
                }
                CoreError::Matching(MatchingError::Cancelled) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED")
                }
                CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND")
                }
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        }
        let body = Json(ErrorBody {
            code,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Blocking task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venuemap_core::taxonomies::SchemaError;

    fn status_of(err: CoreError) -> (StatusCode, &'static str) {
        ApiError::from(err).status_and_code()
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(
            status_of(TaxonomyError::NodeNotFound("barn".into()).into()),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
        assert_eq!(
            status_of(
                TaxonomyError::UnknownTerm {
                    region_code: "US".into(),
                    term: "Shamiana".into(),
                }
                .into()
            ),
            (StatusCode::NOT_FOUND, "UNKNOWN_TERM")
        );
        assert_eq!(
            status_of(TaxonomyError::Schema(SchemaError::DuplicateNodeId("barn".into())).into()),
            (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_ERROR")
        );
        assert_eq!(
            status_of(MatchingError::InvalidRequirement("min > max".into()).into()),
            (StatusCode::BAD_REQUEST, "INVALID_REQUIREMENT")
        );
        assert_eq!(
            status_of(MatchingError::Cancelled.into()),
            (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED")
        );
        assert_eq!(
            status_of(DatabaseError::QueryFailed("disk I/O error".into()).into()),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
        );
    }
}
