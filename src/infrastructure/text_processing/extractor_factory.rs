use std::sync::Arc;

use crate::application::ports::{OcrEngine, PageRasterizer};
use crate::application::services::ExtractionChains;
use crate::presentation::config::{ExtractionSettings, OcrSettings};

use super::image_ocr_extractor::{ImageOcrExtractor, ImageOcrOptions};
use super::pdf_legacy_extractor::PdfLegacyExtractor;
use super::pdf_native_extractor::PdfNativeExtractor;
use super::pdf_ocr_extractor::PdfOcrExtractor;
use super::word_processor_extractor::WordProcessorExtractor;

pub struct ExtractorFactory;

impl ExtractorFactory {
    pub fn create(
        extraction: &ExtractionSettings,
        ocr_settings: &OcrSettings,
        ocr: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> ExtractionChains {
        tracing::info!(
            ocr_engine = ocr.name(),
            languages = %ocr_settings.languages,
            render_dpi = ocr_settings.render_dpi,
            native_min_chars = extraction.native_min_chars,
            "Building extraction chains"
        );

        let image_options = ImageOcrOptions {
            languages: ocr_settings.languages.clone(),
            fallback_language: ocr_settings.fallback_language.clone(),
            min_short_edge_px: ocr_settings.min_short_edge_px,
            min_chars: extraction.min_image_chars,
        };

        ExtractionChains::new(
            Arc::new(WordProcessorExtractor::new()),
            Arc::new(PdfNativeExtractor::new(extraction.native_min_chars)),
            Arc::new(PdfOcrExtractor::new(
                Arc::clone(&ocr),
                rasterizer,
                ocr_settings.languages.clone(),
                ocr_settings.render_dpi,
            )),
            Arc::new(PdfLegacyExtractor::new(extraction.min_document_chars)),
            Arc::new(ImageOcrExtractor::new(ocr, image_options)),
        )
    }
}
