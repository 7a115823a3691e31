//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` can be propagated with `?` and is rendered with a
//! consistent status, JSON body and log line.
//!
//! The rendered body never carries details. Outside production,
//! [`error_details_middleware`] swaps in the detailed body that
//! `into_response` leaves in the response extensions.

use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use cowatch_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper so `IntoResponse` can be implemented for the core `AppError`.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// A body that is not a readable multipart form is the client's fault.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart request: {}",
            rejection.body_text()
        )))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Detailed error body, attached to error responses for non-production rendering.
#[derive(Clone)]
pub struct ErrorDetails(pub Arc<ErrorResponse>);

impl HttpAppError {
    fn to_error_response(&self, hide_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        let (details, error_type) = if hide_details || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let detailed = self.to_error_response(false);
        let mut response = (status, Json(self.to_error_response(true))).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails(Arc::new(detailed)));
        response
    }
}

/// Re-render error responses with details unless the service runs in production.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let details = response.extensions_mut().remove::<ErrorDetails>();

    match details {
        Some(ErrorDetails(body)) if !state.config.is_production() => {
            (response.status(), Json(body.as_ref())).into_response()
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_error_hides_details() {
        let err = HttpAppError(AppError::MetadataWrite("duplicate key value".to_string()));
        let body = err.to_error_response(false);

        assert_eq!(body.error, "Failed to save video metadata");
        assert_eq!(body.code, "METADATA_WRITE_ERROR");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }

    #[test]
    fn test_client_error_shows_details_outside_production() {
        let err = HttpAppError(AppError::InvalidInput("Invalid video ID".to_string()));

        let body = err.to_error_response(false);
        assert_eq!(body.error, "Invalid video ID");
        assert_eq!(body.error_type.as_deref(), Some("InvalidInput"));
        assert!(body.details.is_some());

        let body = err.to_error_response(true);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = HttpAppError(AppError::NotFound("Video not found".to_string()))
            .to_error_response(true);
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["error"], "Video not found");
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_none());
    }
}
