use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::application::ports::{
    Extractor, OcrEngine, OcrError, OcrPass, PageSegmentation, StagedFile,
};
use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

pub const LOW_CONFIDENCE_MARKER: &str = "[low-confidence OCR]";

const PASSES: [PageSegmentation; 3] = [
    PageSegmentation::Auto,
    PageSegmentation::SingleBlock,
    PageSegmentation::SingleColumn,
];

#[derive(Debug, Clone)]
pub struct ImageOcrOptions {
    pub languages: String,
    pub fallback_language: String,
    pub min_short_edge_px: u32,
    pub min_chars: usize,
}

impl Default for ImageOcrOptions {
    fn default() -> Self {
        Self {
            languages: "rus+eng".to_string(),
            fallback_language: "eng".to_string(),
            min_short_edge_px: 1000,
            min_chars: 5,
        }
    }
}

/// OCR for photos and scans. Never fails on low yield: weak results are
/// returned behind [`LOW_CONFIDENCE_MARKER`].
pub struct ImageOcrExtractor {
    ocr: Arc<dyn OcrEngine>,
    options: ImageOcrOptions,
}

impl ImageOcrExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, options: ImageOcrOptions) -> Self {
        Self { ocr, options }
    }

    /// Canonical RGB, upscaled so the shorter edge reaches `min_short_edge_px`, encoded as PNG.
    pub fn preprocess(data: &[u8], min_short_edge_px: u32) -> Result<Vec<u8>, String> {
        let decoded = image::load_from_memory(data).map_err(|e| e.to_string())?;
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

        let (width, height) = (rgb.width(), rgb.height());
        let short_edge = width.min(height).max(1);
        let prepared = if short_edge < min_short_edge_px {
            let scale = min_short_edge_px as f64 / short_edge as f64;
            let target_width = (width as f64 * scale).round() as u32;
            let target_height = (height as f64 * scale).round() as u32;
            tracing::debug!(
                width,
                height,
                target_width,
                target_height,
                "Upscaling image before OCR"
            );
            rgb.resize_exact(target_width, target_height, FilterType::Lanczos3)
        } else {
            rgb
        };

        let mut png = Vec::new();
        prepared
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| e.to_string())?;
        Ok(png)
    }

    async fn best_of(
        &self,
        png: &[u8],
        passes: &[OcrPass],
        deadline: Deadline,
    ) -> Result<String, AttemptOutcome> {
        let mut best = String::new();
        for pass in passes {
            if deadline.is_expired() {
                break;
            }
            match self.ocr.recognize(png, pass).await {
                Ok(text) => {
                    tracing::debug!(
                        psm = pass.segmentation.psm(),
                        languages = %pass.languages,
                        chars = significant_chars(&text),
                        "OCR pass finished"
                    );
                    if significant_chars(&text) > significant_chars(&best) {
                        best = text;
                    }
                }
                Err(OcrError::Unavailable(_)) => {
                    return Err(AttemptOutcome::ToolUnavailable {
                        tool: self.ocr.name().to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(psm = pass.segmentation.psm(), error = %e, "OCR pass failed");
                }
            }
        }
        Ok(best.trim().to_string())
    }
}

#[async_trait]
impl Extractor for ImageOcrExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::ImageOcr
    }

    #[tracing::instrument(skip(self, file, deadline), fields(engine = self.ocr.name()))]
    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome {
        if !self.ocr.is_available().await {
            return AttemptOutcome::ToolUnavailable {
                tool: self.ocr.name().to_string(),
            };
        }

        let bytes = file.bytes.clone();
        let min_edge = self.options.min_short_edge_px;
        let png = match tokio::task::spawn_blocking(move || Self::preprocess(&bytes, min_edge))
            .await
        {
            Ok(Ok(png)) => png,
            Ok(Err(reason)) => return AttemptOutcome::Corrupt { reason },
            Err(e) => {
                return AttemptOutcome::Corrupt {
                    reason: format!("preprocess task failed: {e}"),
                };
            }
        };

        let bilingual: Vec<OcrPass> = PASSES
            .iter()
            .map(|psm| OcrPass::new(self.options.languages.clone(), *psm))
            .collect();
        let mut best = match self.best_of(&png, &bilingual, deadline).await {
            Ok(text) => text,
            Err(outcome) => return outcome,
        };

        if significant_chars(&best) < self.options.min_chars {
            tracing::info!(
                chars = significant_chars(&best),
                language = %self.options.fallback_language,
                "Low OCR yield, retrying with single language"
            );
            let retry = [OcrPass::new(
                self.options.fallback_language.clone(),
                PageSegmentation::Auto,
            )];
            match self.best_of(&png, &retry, deadline).await {
                Ok(text) if significant_chars(&text) > significant_chars(&best) => best = text,
                Ok(_) => {}
                Err(outcome) => return outcome,
            }
        }

        if significant_chars(&best) < self.options.min_chars {
            tracing::warn!(chars = significant_chars(&best), "Returning low-confidence OCR text");
            return AttemptOutcome::Success {
                text: low_confidence(&best),
                warnings: vec![
                    "very little text was recognized; the image may be blurry, too small or handwritten"
                        .to_string(),
                ],
            };
        }

        AttemptOutcome::success(best)
    }
}

fn significant_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn low_confidence(text: &str) -> String {
    format!(
        "{LOW_CONFIDENCE_MARKER} Very little text could be recognized in this image. \
         Send a sharper, well-lit photo or a scan for better results.\n\n\
         Recognized text:\n{text}"
    )
}
