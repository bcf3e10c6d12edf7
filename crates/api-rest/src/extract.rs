//! Request extractors and the API key middleware.

use crate::error::ApiError;
use crate::AppState;
use api_shared::auth::{
    parse_practitioner_id, validate_api_key, AuthError, API_KEY_HEADER, PRACTITIONER_HEADER,
};
use axum::extract::{FromRequest, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use pronto_core::{Practitioner, RecordError};

/// JSON body whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// The practitioner acting on this request, resolved from the `x-practitioner-id` header.
///
/// `None` when the header is absent: the caller holds the API key but has no practitioner
/// profile.
pub struct Acting(pub Option<Practitioner>);

impl Acting {
    pub fn profile(&self) -> Option<&Practitioner> {
        self.0.as_ref()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Acting {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let raw = parts
            .headers
            .get(PRACTITIONER_HEADER)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AuthError::InvalidPractitionerId("<non-ascii>".into()))
            })
            .transpose()?;

        let Some(id) = parse_practitioner_id(raw)? else {
            return Ok(Acting(None));
        };

        match state.services.practitioners.get(id) {
            Ok(practitioner) => Ok(Acting(Some(practitioner))),
            Err(RecordError::PractitionerNotFound(id)) => {
                Err(AuthError::UnknownPractitioner(id).into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Rejects requests without the deployment API key.
///
/// # Errors
/// Returns `401 Unauthorized` if the `x-api-key` header is missing or does not match.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = validate_api_key(provided, &state.api_key) {
        tracing::warn!(path = %request.uri().path(), "rejected request: {err}");
        return Err(err.into());
    }

    Ok(next.run(request).await)
}
