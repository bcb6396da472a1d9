use super::extraction_attempt::ExtractionAttempt;
use super::file_descriptor::{DocumentFormat, FileHandle};
use super::quality_tier::QualityTier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub file_id: FileHandle,
    pub format: DocumentFormat,
    pub raw_text: String,
    pub normalized_text: String,
    pub char_count: usize,
    pub quality_tier: QualityTier,
    pub warnings: Vec<String>,
    pub attempts_tried: Vec<ExtractionAttempt>,
}

impl ExtractionResult {
    pub fn new(
        file_id: FileHandle,
        format: DocumentFormat,
        raw_text: String,
        normalized_text: String,
        warnings: Vec<String>,
        attempts_tried: Vec<ExtractionAttempt>,
    ) -> Self {
        let char_count = normalized_text.chars().count();
        Self {
            file_id,
            format,
            raw_text,
            normalized_text,
            char_count,
            quality_tier: QualityTier::from_char_count(char_count),
            warnings,
            attempts_tried,
        }
    }

    pub fn word_count(&self) -> usize {
        self.normalized_text.split_whitespace().count()
    }
}
