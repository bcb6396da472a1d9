use std::fmt;

/// One engine slot in a fallback chain. Also the key the timeout budget is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStage {
    WordProcessor,
    PdfNative,
    PdfOcr,
    PdfLegacy,
    ImageOcr,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::WordProcessor => "word_processor",
            ExtractionStage::PdfNative => "pdf_native",
            ExtractionStage::PdfOcr => "pdf_ocr",
            ExtractionStage::PdfLegacy => "pdf_legacy",
            ExtractionStage::ImageOcr => "image_ocr",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
