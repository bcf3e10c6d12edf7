//! API errors with their HTTP status mapping.
//!
//! Every failure leaves the API as `{ "error": { "code", "message" } }`. Internal failures are
//! logged here and reported to the client without detail.

use api_shared::auth::AuthError;
use api_shared::dto::ErrorRes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pronto_core::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("failed to serialise response: {0}")]
    Serialise(#[from] serde_json::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Record(err) => match err {
                RecordError::InvalidInput(_) | RecordError::Text(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_input")
                }
                RecordError::PatientNotFound(_)
                | RecordError::NationalIdNotFound(_)
                | RecordError::PractitionerNotFound(_)
                | RecordError::AttendanceNotFound(_)
                | RecordError::PrescriptionNotFound(_)
                | RecordError::ExamRequestNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                RecordError::DuplicateNationalId(_) | RecordError::DuplicateAccount(_) => {
                    (StatusCode::CONFLICT, "duplicate")
                }
                RecordError::MissingPractitionerProfile | RecordError::RoleNotPermitted { .. } => {
                    (StatusCode::FORBIDDEN, "forbidden")
                }
                RecordError::ProtectedDelete { .. } => (StatusCode::CONFLICT, "protected"),
                RecordError::ExamAlreadyResulted(_)
                | RecordError::ExamCancelled(_)
                | RecordError::ExamNotCollectable { .. } => (StatusCode::CONFLICT, "conflict"),
                RecordError::StorePoisoned
                | RecordError::ConfigRead(_)
                | RecordError::ConfigParse { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
            ApiError::Auth(AuthError::InvalidPractitionerId(_)) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Serialise(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorRes::new(code, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
