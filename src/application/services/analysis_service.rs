use std::sync::Arc;

use crate::application::ports::{
    FileAcquisition, LlmClient, LlmClientError, UsageAction, UsageDecision, UsageGate,
    UsageGateError, UserId,
};
use crate::domain::{AnalysisKind, ExtractionResult, FileDescriptor, Segment};

use super::extraction_service::{ExtractionError, ExtractionService};
use super::result_segmenter::ResultSegmenter;

pub const TRUNCATION_NOTE: &str = "[document text truncated for analysis]";

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub kind: AnalysisKind,
    pub extraction: ExtractionResult,
    pub answer: String,
    pub segments: Vec<Segment>,
}

/// Usage check, extraction, LLM analysis, usage recording and reply segmentation.
pub struct DocumentAnalysisService<L: LlmClient> {
    extraction_service: Arc<ExtractionService>,
    llm_client: Arc<L>,
    usage_gate: Arc<dyn UsageGate>,
    segmenter: Arc<ResultSegmenter>,
    max_document_chars: usize,
}

impl<L: LlmClient> DocumentAnalysisService<L> {
    pub fn new(
        extraction_service: Arc<ExtractionService>,
        llm_client: Arc<L>,
        usage_gate: Arc<dyn UsageGate>,
        segmenter: Arc<ResultSegmenter>,
        max_document_chars: usize,
    ) -> Self {
        Self {
            extraction_service,
            llm_client,
            usage_gate,
            segmenter,
            max_document_chars,
        }
    }

    #[tracing::instrument(
        skip(self, descriptor, acquisition),
        fields(user = %user, file_id = %descriptor.id, analysis = %kind)
    )]
    pub async fn analyze(
        &self,
        user: UserId,
        descriptor: &FileDescriptor,
        acquisition: &dyn FileAcquisition,
        kind: AnalysisKind,
    ) -> Result<AnalysisReport, AnalysisError> {
        if let UsageDecision::Denied { reason } = self
            .usage_gate
            .check(user, UsageAction::DocumentAnalysis)
            .await
            .map_err(AnalysisError::UsageStore)?
        {
            tracing::info!(reason = %reason, "Document analysis denied by usage gate");
            return Err(AnalysisError::UsageDenied(reason));
        }

        let extraction = self
            .extraction_service
            .extract(descriptor, acquisition)
            .await
            .map_err(AnalysisError::Extraction)?;

        let document = self.truncate(&extraction.normalized_text);
        let prompt = format!(
            "{}\n\nFile: {}\nText length: {} characters",
            kind.instruction(),
            descriptor.declared_name,
            extraction.char_count
        );

        let answer = self
            .llm_client
            .complete(&prompt, &document)
            .await
            .map_err(AnalysisError::Backend)?;

        if let Err(e) = self
            .usage_gate
            .record(user, UsageAction::DocumentAnalysis)
            .await
        {
            tracing::warn!(error = %e, "Failed to record document analysis usage");
        }

        let segments = self.segmenter.segment(&answer);
        tracing::info!(
            answer_chars = answer.chars().count(),
            segments = segments.len(),
            "Document analysis completed"
        );

        Ok(AnalysisReport {
            kind,
            extraction,
            answer,
            segments,
        })
    }

    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.max_document_chars) {
            Some((offset, _)) => format!("{}\n\n{}", &text[..offset], TRUNCATION_NOTE),
            None => text.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("usage denied: {0}")]
    UsageDenied(String),
    #[error("usage store: {0}")]
    UsageStore(UsageGateError),
    #[error("extraction: {0}")]
    Extraction(ExtractionError),
    #[error("analysis backend: {0}")]
    Backend(LlmClientError),
}

impl AnalysisError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            AnalysisError::UsageDenied(_) => {
                "Your plan does not cover another analysis. Renew the subscription to continue."
            }
            AnalysisError::UsageStore(_) | AnalysisError::Backend(_) => {
                "The analysis service is temporarily unavailable. Try again in a few minutes."
            }
            AnalysisError::Extraction(e) => e.suggestion(),
        }
    }
}
