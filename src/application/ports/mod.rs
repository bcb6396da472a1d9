mod extractor;
mod file_acquisition;
mod llm_client;
mod ocr_engine;
mod page_rasterizer;
mod usage_gate;

pub use extractor::{Extractor, StagedFile};
pub use file_acquisition::{FileAcquisition, FileAcquisitionError};
pub use llm_client::{LlmClient, LlmClientError};
pub use ocr_engine::{OcrEngine, OcrError, OcrPass, PageSegmentation};
pub use page_rasterizer::{PageRasterizer, RasterizeError};
pub use usage_gate::{UsageAction, UsageDecision, UsageGate, UsageGateError, UserId};
