mod extractor_factory;
mod image_ocr_extractor;
mod page_text;
mod pdf_legacy_extractor;
mod pdf_native_extractor;
mod pdf_ocr_extractor;
mod word_processor_extractor;

pub use extractor_factory::ExtractorFactory;
pub use image_ocr_extractor::{ImageOcrExtractor, ImageOcrOptions, LOW_CONFIDENCE_MARKER};
pub use pdf_legacy_extractor::PdfLegacyExtractor;
pub use pdf_native_extractor::PdfNativeExtractor;
pub use pdf_ocr_extractor::PdfOcrExtractor;
pub use word_processor_extractor::WordProcessorExtractor;
