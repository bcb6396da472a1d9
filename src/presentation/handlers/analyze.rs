use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, UserId};
use crate::domain::AnalysisKind;
use crate::presentation::state::AppState;

use super::error::{analysis_error_response, error_response};
use super::segment::SegmentDto;
use super::upload::receive_upload;

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub filename: String,
    pub analysis: String,
    pub user_id: i64,
    pub file_handle: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub char_count: usize,
    pub quality_tier: String,
    pub warnings: Vec<String>,
    pub answer: String,
    pub segments: Vec<SegmentDto>,
}

#[tracing::instrument(
    skip(state, headers, body),
    fields(filename = %params.filename, analysis = %params.analysis)
)]
pub async fn analyze_handler<L>(
    State(state): State<AppState<L>>,
    Query(params): Query<AnalyzeParams>,
    headers: HeaderMap,
    body: Body,
) -> Response
where
    L: LlmClient + 'static,
{
    let kind: AnalysisKind = match params.analysis.parse() {
        Ok(kind) => kind,
        Err(e) => {
            let expected: Vec<&str> = AnalysisKind::ALL.iter().map(|k| k.as_str()).collect();
            return error_response(
                StatusCode::BAD_REQUEST,
                e,
                Some(&format!("Use one of: {}", expected.join(", "))),
            );
        }
    };

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
        .analysis_service
        .analyze(
            UserId(params.user_id),
            upload.descriptor(),
            &upload,
            kind,
        )
        .await;
    upload.discard().await;

    match result {
        Ok(report) => {
            let segments = report
                .segments
                .iter()
                .map(|s| SegmentDto::from_segment(s, &state.segmenter))
                .collect();
            let response = AnalyzeResponse {
                analysis: report.kind.to_string(),
                char_count: report.extraction.char_count,
                quality_tier: report.extraction.quality_tier.to_string(),
                warnings: report.extraction.warnings,
                answer: report.answer,
                segments,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Document analysis failed");
            analysis_error_response(&e)
        }
    }
}
