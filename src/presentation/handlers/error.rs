use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::LlmClientError;
use crate::application::services::{AnalysisError, ExtractionError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

pub(super) fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    suggestion: Option<&str>,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            suggestion: suggestion.map(str::to_string),
        }),
    )
        .into_response()
}

pub(super) fn extraction_status(error: &ExtractionError) -> StatusCode {
    match error {
        ExtractionError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ExtractionError::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ExtractionError::AllEnginesExhausted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ExtractionError::Acquisition(_) => StatusCode::BAD_GATEWAY,
        ExtractionError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(super) fn extraction_error_response(error: &ExtractionError) -> Response {
    error_response(
        extraction_status(error),
        error.to_string(),
        Some(error.suggestion()),
    )
}

pub(super) fn analysis_error_response(error: &AnalysisError) -> Response {
    let status = match error {
        AnalysisError::UsageDenied(_) => StatusCode::FORBIDDEN,
        AnalysisError::UsageStore(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::Extraction(e) => extraction_status(e),
        AnalysisError::Backend(LlmClientError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
        AnalysisError::Backend(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, error.to_string(), Some(error.suggestion()))
}
