use std::io::Write;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{Extractor, FileAcquisition, FileAcquisitionError, StagedFile};
use crate::domain::{
    AttemptOutcome, Deadline, DocumentFormat, ExtractionAttempt, ExtractionResult,
    ExtractionStage, FileClass, FileDescriptor,
};

use super::format_router::FormatRouter;
use super::text_normalizer::normalize_text;
use super::timeout_budget::TimeoutBudget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_file_size_bytes: u64,
    pub min_document_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: FormatRouter::DEFAULT_MAX_FILE_SIZE_BYTES,
            min_document_chars: 10,
        }
    }
}

/// When a chain step is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    Always,
    /// Only if every earlier attempt failed outright (timed out, tool missing, unopenable).
    AfterOutrightFailures,
}

pub struct ChainStep {
    extractor: Arc<dyn Extractor>,
    gate: StepGate,
}

impl ChainStep {
    pub fn always(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            gate: StepGate::Always,
        }
    }

    pub fn after_outright_failures(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            gate: StepGate::AfterOutrightFailures,
        }
    }

    fn may_run(&self, earlier: &[ExtractionAttempt]) -> bool {
        match self.gate {
            StepGate::Always => true,
            StepGate::AfterOutrightFailures => earlier
                .iter()
                .all(|attempt| attempt.outcome.is_outright_failure()),
        }
    }
}

/// Fixed, totally ordered sequence of engines for one format.
pub struct ExtractionChain {
    steps: Vec<ChainStep>,
}

impl ExtractionChain {
    pub fn new(steps: Vec<ChainStep>) -> Self {
        Self { steps }
    }

    pub fn stages(&self) -> Vec<ExtractionStage> {
        self.steps.iter().map(|s| s.extractor.stage()).collect()
    }
}

pub struct ExtractionChains {
    word_processor: ExtractionChain,
    pdf: ExtractionChain,
    image: ExtractionChain,
}

impl ExtractionChains {
    pub fn new(
        word_processor: Arc<dyn Extractor>,
        pdf_native: Arc<dyn Extractor>,
        pdf_ocr: Arc<dyn Extractor>,
        pdf_legacy: Arc<dyn Extractor>,
        image_ocr: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            word_processor: ExtractionChain::new(vec![ChainStep::always(word_processor)]),
            pdf: ExtractionChain::new(vec![
                ChainStep::always(pdf_native),
                ChainStep::always(pdf_ocr),
                ChainStep::after_outright_failures(pdf_legacy),
            ]),
            image: ExtractionChain::new(vec![ChainStep::always(image_ocr)]),
        }
    }

    pub fn for_format(&self, format: DocumentFormat) -> &ExtractionChain {
        match format {
            DocumentFormat::WordProcessor => &self.word_processor,
            DocumentFormat::Pdf => &self.pdf,
            DocumentFormat::Image => &self.image,
        }
    }
}

/// Routes a file, runs its fallback chain and packages the normalized result.
pub struct ExtractionService {
    router: FormatRouter,
    budget: TimeoutBudget,
    chains: ExtractionChains,
    limits: ExtractionLimits,
}

impl ExtractionService {
    pub fn new(chains: ExtractionChains, budget: TimeoutBudget, limits: ExtractionLimits) -> Self {
        Self {
            router: FormatRouter::new(limits.max_file_size_bytes),
            budget,
            chains,
            limits,
        }
    }

    pub fn router(&self) -> &FormatRouter {
        &self.router
    }

    #[tracing::instrument(
        skip(self, descriptor, acquisition),
        fields(
            file_id = %descriptor.id,
            filename = %descriptor.declared_name,
            byte_size = descriptor.byte_size,
        )
    )]
    pub async fn extract(
        &self,
        descriptor: &FileDescriptor,
        acquisition: &dyn FileAcquisition,
    ) -> Result<ExtractionResult, ExtractionError> {
        let format = self.router.route(descriptor)?;

        let bytes = acquisition
            .acquire(descriptor)
            .await
            .map_err(ExtractionError::Acquisition)?;
        self.router.check_size(bytes.len() as u64)?;

        // Removed on drop, which covers success, fallback, failure and cancellation.
        let mut temp_file = tempfile::Builder::new()
            .prefix("lexdoc-")
            .suffix(&format!(".{}", descriptor.declared_extension))
            .tempfile()
            .map_err(ExtractionError::Staging)?;
        temp_file
            .write_all(&bytes)
            .and_then(|_| temp_file.flush())
            .map_err(ExtractionError::Staging)?;

        let staged = StagedFile {
            path: temp_file.path().to_path_buf(),
            bytes,
            extension: descriptor.declared_extension.clone(),
        };

        let attempts = self.run_chain(format, &staged).await;
        let result = self.conclude(descriptor, format, attempts);

        drop(temp_file);
        result
    }

    async fn run_chain(
        &self,
        format: DocumentFormat,
        staged: &StagedFile,
    ) -> Vec<ExtractionAttempt> {
        let chain = self.chains.for_format(format);
        let mut attempts: Vec<ExtractionAttempt> = Vec::with_capacity(chain.steps.len());

        for step in &chain.steps {
            let stage = step.extractor.stage();
            if !step.may_run(&attempts) {
                tracing::debug!(
                    engine = %stage,
                    "Skipping engine: an earlier engine opened the file"
                );
                continue;
            }

            let budget = self.budget.budget(staged.byte_size(), stage);
            let started_at = Utc::now();
            let clock = tokio::time::Instant::now();
            let deadline = Deadline::after(budget);

            let attempt = step.extractor.attempt(staged, deadline);
            let outcome = match tokio::time::timeout(budget, attempt).await {
                Ok(outcome) => outcome,
                Err(_) => AttemptOutcome::TimedOut,
            };
            let outcome = self.enforce_minimum(format, outcome);
            let elapsed = clock.elapsed();

            if outcome.is_success() {
                tracing::info!(
                    engine = %stage,
                    budget_ms = budget.as_millis() as u64,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Extraction engine succeeded"
                );
            } else {
                tracing::warn!(
                    engine = %stage,
                    budget_ms = budget.as_millis() as u64,
                    elapsed_ms = elapsed.as_millis() as u64,
                    outcome = outcome.kind(),
                    "Extraction engine did not succeed, advancing chain"
                );
            }

            let done = outcome.is_success();
            attempts.push(ExtractionAttempt {
                stage,
                timeout_budget: budget,
                started_at,
                elapsed,
                outcome,
            });

            if done {
                break;
            }
        }

        attempts
    }

    /// Documents need a minimum amount of text to count as extracted.
    fn enforce_minimum(&self, format: DocumentFormat, outcome: AttemptOutcome) -> AttemptOutcome {
        if format.class() != FileClass::Document {
            return outcome;
        }
        match outcome {
            AttemptOutcome::Success { text, .. }
                if normalize_text(&text).chars().count() < self.limits.min_document_chars =>
            {
                AttemptOutcome::InsufficientYield { text }
            }
            other => other,
        }
    }

    fn conclude(
        &self,
        descriptor: &FileDescriptor,
        format: DocumentFormat,
        attempts: Vec<ExtractionAttempt>,
    ) -> Result<ExtractionResult, ExtractionError> {
        let mut warnings: Vec<String> = attempts
            .iter()
            .filter(|a| !a.outcome.is_success())
            .map(|a| a.outcome.describe(a.stage))
            .collect();

        let success = attempts.iter().find_map(|a| match &a.outcome {
            AttemptOutcome::Success { text, warnings } => {
                Some((a.stage, text.clone(), warnings.clone()))
            }
            _ => None,
        });

        if let Some((stage, raw_text, engine_warnings)) = success {
            if !warnings.is_empty() {
                warnings.push(format!("text recovered by fallback engine {stage}"));
            }
            warnings.extend(engine_warnings);
            let normalized = normalize_text(&raw_text);
            return Ok(ExtractionResult::new(
                descriptor.id.clone(),
                format,
                raw_text,
                normalized,
                warnings,
                attempts,
            ));
        }

        let best_partial = attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::InsufficientYield { text } => {
                    Some((a.stage, text.clone(), normalize_text(text)))
                }
                _ => None,
            })
            .filter(|(_, _, normalized)| {
                normalized.chars().count() >= self.limits.min_document_chars
            })
            .max_by_key(|(_, _, normalized)| normalized.chars().count());

        if let Some((stage, raw_text, normalized)) = best_partial {
            tracing::warn!(engine = %stage, "No engine succeeded; returning low-yield text");
            warnings.push(format!(
                "only a small amount of text could be extracted (best result from {stage})"
            ));
            return Ok(ExtractionResult::new(
                descriptor.id.clone(),
                format,
                raw_text,
                normalized,
                warnings,
                attempts,
            ));
        }

        let cause = attempts
            .last()
            .map(|a| a.outcome.describe(a.stage))
            .unwrap_or_else(|| "no engine was run".to_string());
        tracing::error!(format = %format, cause = %cause, "All extraction engines exhausted");

        Err(ExtractionError::AllEnginesExhausted {
            format,
            attempts,
            cause,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported format: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("file size {size} bytes exceeds the limit of {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },
    #[error("all {format} extraction engines failed: {cause}")]
    AllEnginesExhausted {
        format: DocumentFormat,
        attempts: Vec<ExtractionAttempt>,
        cause: String,
    },
    #[error("file acquisition: {0}")]
    Acquisition(FileAcquisitionError),
    #[error("staging: {0}")]
    Staging(std::io::Error),
}

impl ExtractionError {
    /// Actionable advice shown next to the failure.
    pub fn suggestion(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFormat { .. } => {
                "Upload a DOC, DOCX or PDF document, or a JPG, PNG, BMP or TIFF image."
            }
            ExtractionError::SizeExceeded { .. } => {
                "Upload a smaller file or split the document into several parts."
            }
            ExtractionError::AllEnginesExhausted { .. } => {
                "Try uploading the file again, use a clearer scan, or convert it to another format."
            }
            ExtractionError::Acquisition(_) | ExtractionError::Staging(_) => {
                "Try uploading the file again in a few minutes."
            }
        }
    }
}
