use crate::models::ErrorResponse;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("id is not UUID")]
    InvalidId,

    #[error("id not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MalformedBody(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl RegistryError {
    /// Validation failure for a single field, worded after the failing tag.
    pub fn field_validation(field: &str, tag: &str) -> Self {
        RegistryError::Validation(format!(
            "Field validation for '{}' failed on the '{}' tag",
            field, tag
        ))
    }

    /// Label used for the validation failure metric.
    pub fn reason(&self) -> &'static str {
        match self {
            RegistryError::InvalidId => "invalid_id",
            RegistryError::NotFound => "not_found",
            RegistryError::Validation(_) => "validation",
            RegistryError::MalformedBody(_) => "malformed_body",
            RegistryError::RouteNotFound => "route_not_found",
            RegistryError::Metrics(_) => "metrics",
        }
    }
}

impl ResponseError for RegistryError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::InvalidId
            | RegistryError::Validation(_)
            | RegistryError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound | RegistryError::RouteNotFound => StatusCode::NOT_FOUND,
            RegistryError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<ValidationErrors> for RegistryError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first failing field only, in a stable order.
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        fields
            .first()
            .and_then(|(field, errs)| {
                errs.first()
                    .map(|e| RegistryError::field_validation(field, &e.code))
            })
            .unwrap_or_else(|| RegistryError::Validation(errors.to_string()))
    }
}

impl From<JsonPayloadError> for RegistryError {
    fn from(err: JsonPayloadError) -> Self {
        RegistryError::MalformedBody(err.to_string())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(RegistryError::InvalidId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RegistryError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RegistryError::RouteNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RegistryError::MalformedBody("EOF".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::Metrics("encode".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_has_single_error_field() {
        let resp = RegistryError::NotFound.error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value, serde_json::json!({ "error": "id not found" }));
    }

    #[test]
    fn test_field_validation_message() {
        let err = RegistryError::field_validation("state", "required");
        assert_eq!(
            err.to_string(),
            "Field validation for 'state' failed on the 'required' tag"
        );
        assert_eq!(err.reason(), "validation");
    }
}
