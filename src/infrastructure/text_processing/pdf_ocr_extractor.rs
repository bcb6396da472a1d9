use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    Extractor, OcrEngine, OcrError, OcrPass, PageRasterizer, PageSegmentation, RasterizeError,
    StagedFile,
};
use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

use super::page_text::{PageText, join_pages, unread_pages_warning};

/// Rasterizes every page and runs OCR on it.
pub struct PdfOcrExtractor {
    ocr: Arc<dyn OcrEngine>,
    rasterizer: Arc<dyn PageRasterizer>,
    languages: String,
    render_dpi: f32,
}

impl PdfOcrExtractor {
    pub const DEFAULT_RENDER_DPI: f32 = 300.0;

    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn PageRasterizer>,
        languages: impl Into<String>,
        render_dpi: f32,
    ) -> Self {
        Self {
            ocr,
            rasterizer,
            languages: languages.into(),
            render_dpi,
        }
    }

    async fn rasterize(
        &self,
        file: &StagedFile,
        deadline: Deadline,
    ) -> Result<Vec<Vec<u8>>, AttemptOutcome> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let bytes = file.bytes.clone();
        let dpi = self.render_dpi;

        let rendered =
            tokio::task::spawn_blocking(move || rasterizer.rasterize(&bytes, dpi, &deadline))
                .await
                .map_err(|e| AttemptOutcome::Corrupt {
                    reason: format!("rasterize task failed: {e}"),
                })?;

        rendered.map_err(|e| match e {
            RasterizeError::Unavailable(_) => AttemptOutcome::ToolUnavailable {
                tool: "pdfium".to_string(),
            },
            RasterizeError::TimedOut => AttemptOutcome::TimedOut,
            RasterizeError::Unopenable(reason) | RasterizeError::RenderFailed(reason) => {
                AttemptOutcome::Corrupt { reason }
            }
        })
    }
}

#[async_trait]
impl Extractor for PdfOcrExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::PdfOcr
    }

    #[tracing::instrument(skip(self, file, deadline), fields(engine = self.ocr.name()))]
    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome {
        if !self.ocr.is_available().await {
            return AttemptOutcome::ToolUnavailable {
                tool: self.ocr.name().to_string(),
            };
        }

        let images = match self.rasterize(file, deadline).await {
            Ok(images) => images,
            Err(outcome) => return outcome,
        };
        tracing::debug!(page_count = images.len(), "PDF pages rasterized");

        let pass = OcrPass::new(self.languages.clone(), PageSegmentation::Auto);
        let mut pages = Vec::with_capacity(images.len());
        let mut failed = 0usize;

        for (index, image) in images.iter().enumerate() {
            if deadline.is_expired() {
                return AttemptOutcome::TimedOut;
            }
            match self.ocr.recognize(image, &pass).await {
                Ok(text) => pages.push(PageText::new(index + 1, text)),
                Err(OcrError::Unavailable(_)) => {
                    return AttemptOutcome::ToolUnavailable {
                        tool: self.ocr.name().to_string(),
                    };
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(page = index + 1, error = %e, "OCR failed for page, skipping");
                }
            }
        }

        let text = join_pages(&pages);
        if text.is_empty() {
            AttemptOutcome::InsufficientYield { text }
        } else {
            AttemptOutcome::Success {
                text,
                warnings: unread_pages_warning(failed),
            }
        }
    }
}
