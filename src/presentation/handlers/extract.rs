use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::domain::{ExtractionAttempt, ExtractionResult};
use crate::presentation::state::AppState;

use super::error::extraction_error_response;
use super::upload::receive_upload;

#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    pub filename: String,
    pub file_handle: Option<String>,
}

#[derive(Serialize)]
pub struct AttemptDto {
    pub stage: String,
    pub outcome: String,
    pub budget_ms: u64,
    pub elapsed_ms: u64,
}

impl From<&ExtractionAttempt> for AttemptDto {
    fn from(attempt: &ExtractionAttempt) -> Self {
        Self {
            stage: attempt.stage.to_string(),
            outcome: attempt.outcome.kind().to_string(),
            budget_ms: attempt.timeout_budget.as_millis() as u64,
            elapsed_ms: attempt.elapsed.as_millis() as u64,
        }
    }
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub file_id: String,
    pub format: String,
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub quality_tier: String,
    pub warnings: Vec<String>,
    pub attempts: Vec<AttemptDto>,
}

impl From<&ExtractionResult> for ExtractResponse {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            file_id: result.file_id.to_string(),
            format: result.format.to_string(),
            text: result.normalized_text.clone(),
            char_count: result.char_count,
            word_count: result.word_count(),
            quality_tier: result.quality_tier.to_string(),
            warnings: result.warnings.clone(),
            attempts: result.attempts_tried.iter().map(AttemptDto::from).collect(),
        }
    }
}

#[tracing::instrument(skip(state, headers, body), fields(filename = %params.filename))]
pub async fn extract_handler<L>(
    State(state): State<AppState<L>>,
    Query(params): Query<ExtractParams>,
    headers: HeaderMap,
    body: Body,
) -> Response
where
    L: LlmClient + 'static,
{
    let upload = match receive_upload(
        &state,
        &params.filename,
        params.file_handle.as_deref(),
        &headers,
        body,
    )
    .await
    {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let result = state
        .extraction_service
        .extract(upload.descriptor(), &upload)
        .await;
    upload.discard().await;

    match result {
        Ok(result) => {
            tracing::info!(
                char_count = result.char_count,
                quality_tier = %result.quality_tier,
                "Extraction request completed"
            );
            (StatusCode::OK, Json(ExtractResponse::from(&result))).into_response()
        }
        Err(e) => extraction_error_response(&e),
    }
}
