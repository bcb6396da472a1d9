use std::io;

use async_trait::async_trait;

/// Layout hint passed to the OCR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegmentation {
    Auto,
    SingleColumn,
    SingleBlock,
}

impl PageSegmentation {
    pub fn psm(&self) -> u8 {
        match self {
            PageSegmentation::Auto => 3,
            PageSegmentation::SingleColumn => 4,
            PageSegmentation::SingleBlock => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrPass {
    pub languages: String,
    pub segmentation: PageSegmentation,
}

impl OcrPass {
    pub fn new(languages: impl Into<String>, segmentation: PageSegmentation) -> Self {
        Self {
            languages: languages.into(),
            segmentation,
        }
    }
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Host precondition, checked before any rasterizing or recognition work.
    async fn is_available(&self) -> bool;

    async fn recognize(&self, image_png: &[u8], pass: &OcrPass) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr engine unavailable: {0}")]
    Unavailable(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
