use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::application::services::ResultSegmenter;
use crate::domain::Segment;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct SegmentDto {
    pub index: usize,
    pub total_count: usize,
    pub text: String,
    pub is_final: bool,
    /// Text as it goes over the wire, continuation indicator included.
    pub transmitted: String,
}

impl SegmentDto {
    pub fn from_segment(segment: &Segment, segmenter: &ResultSegmenter) -> Self {
        Self {
            index: segment.index,
            total_count: segment.total_count,
            text: segment.text.clone(),
            is_final: segment.is_final,
            transmitted: segmenter.transmitted(segment),
        }
    }
}

#[derive(Serialize)]
pub struct SegmentResponse {
    pub segments: Vec<SegmentDto>,
}

pub async fn segment_handler<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<SegmentRequest>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
{
    let segments = state.segmenter.segment(&request.text);
    tracing::debug!(
        chars = request.text.chars().count(),
        segments = segments.len(),
        "Text segmented"
    );

    let segments = segments
        .iter()
        .map(|s| SegmentDto::from_segment(s, &state.segmenter))
        .collect();
    (StatusCode::OK, Json(SegmentResponse { segments }))
}
