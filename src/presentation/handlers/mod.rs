mod analyze;
mod error;
mod extract;
mod health;
mod segment;
mod upload;

pub use analyze::{AnalyzeParams, AnalyzeResponse, analyze_handler};
pub use error::ErrorResponse;
pub use extract::{AttemptDto, ExtractParams, ExtractResponse, extract_handler};
pub use health::health_handler;
pub use segment::{SegmentDto, SegmentRequest, SegmentResponse, segment_handler};
