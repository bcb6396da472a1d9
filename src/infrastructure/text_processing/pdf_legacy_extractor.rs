use async_trait::async_trait;

use crate::application::ports::{Extractor, StagedFile};
use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

use super::page_text::{PageText, content_chars, join_pages};

/// Second text-layer reader for PDFs the primary parser cannot open.
pub struct PdfLegacyExtractor {
    min_chars: usize,
}

impl PdfLegacyExtractor {
    /// Page content below this many characters is a low yield.
    pub const DEFAULT_MIN_CHARS: usize = 10;

    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    fn read(data: &[u8], min_chars: usize, deadline: Deadline) -> AttemptOutcome {
        let text = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                return AttemptOutcome::Corrupt {
                    reason: format!("legacy parser failed: {e}"),
                };
            }
        };

        // pdf-extract separates pages with form feeds.
        let mut pages = Vec::new();
        for (index, page) in text.split('\x0C').enumerate() {
            if deadline.is_expired() {
                return AttemptOutcome::TimedOut;
            }
            pages.push(PageText::new(index + 1, page));
        }

        let chars = content_chars(&pages);
        let joined = join_pages(&pages);
        if chars < min_chars {
            AttemptOutcome::InsufficientYield { text: joined }
        } else {
            AttemptOutcome::success(joined)
        }
    }
}

impl Default for PdfLegacyExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CHARS)
    }
}

#[async_trait]
impl Extractor for PdfLegacyExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::PdfLegacy
    }

    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome {
        let bytes = file.bytes.clone();
        let min_chars = self.min_chars;
        tokio::task::spawn_blocking(move || Self::read(&bytes, min_chars, deadline))
            .await
            .unwrap_or_else(|e| AttemptOutcome::Corrupt {
                reason: format!("extraction task failed: {e}"),
            })
    }
}
