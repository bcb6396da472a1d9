mod analysis_service;
mod extraction_service;
mod format_router;
mod result_segmenter;
mod text_normalizer;
mod timeout_budget;

pub use analysis_service::{
    AnalysisError, AnalysisReport, DocumentAnalysisService, TRUNCATION_NOTE,
};
pub use extraction_service::{
    ChainStep, ExtractionChain, ExtractionChains, ExtractionError, ExtractionLimits,
    ExtractionService, StepGate,
};
pub use format_router::FormatRouter;
pub use result_segmenter::ResultSegmenter;
pub use text_normalizer::normalize_text;
pub use timeout_budget::TimeoutBudget;
