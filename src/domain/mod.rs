mod analysis_kind;
mod deadline;
mod extraction_attempt;
mod extraction_result;
mod extraction_stage;
mod file_descriptor;
mod quality_tier;
mod segment;

pub use analysis_kind::AnalysisKind;
pub use deadline::Deadline;
pub use extraction_attempt::{AttemptOutcome, ExtractionAttempt};
pub use extraction_result::ExtractionResult;
pub use extraction_stage::ExtractionStage;
pub use file_descriptor::{DocumentFormat, FileClass, FileDescriptor, FileHandle};
pub use quality_tier::QualityTier;
pub use segment::{ContinuationIndicator, Segment};
