use std::path::Path;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{Extractor, StagedFile};
use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

use super::page_text::{PageText, content_chars, join_pages, unread_pages_warning};

/// Reads the embedded text layer page by page.
pub struct PdfNativeExtractor {
    min_chars: usize,
}

impl PdfNativeExtractor {
    /// Yields at or below this many characters suggest a scanned PDF.
    pub const DEFAULT_MIN_CHARS: usize = 50;

    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Pages that were read, and how many could not be.
    fn read_pages(
        path: &Path,
        deadline: Deadline,
    ) -> Result<(Vec<PageText>, usize), AttemptOutcome> {
        let mut doc = PdfDocument::open(path).map_err(|e| AttemptOutcome::Corrupt {
            reason: format!("failed to parse PDF: {e}"),
        })?;

        let page_count = doc.page_count().map_err(|e| AttemptOutcome::Corrupt {
            reason: format!("failed to read page count: {e}"),
        })?;

        let mut pages = Vec::with_capacity(page_count);
        let mut failed = 0usize;
        for page_index in 0..page_count {
            if deadline.is_expired() {
                return Err(AttemptOutcome::TimedOut);
            }
            match doc.extract_text(page_index) {
                Ok(text) => pages.push(PageText::new(page_index + 1, text)),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        page = page_index + 1,
                        error = %e,
                        "Failed to read page text, skipping"
                    );
                }
            }
        }

        Ok((pages, failed))
    }
}

impl Default for PdfNativeExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CHARS)
    }
}

#[async_trait]
impl Extractor for PdfNativeExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::PdfNative
    }

    #[tracing::instrument(skip(self, file, deadline), fields(path = %file.path.display()))]
    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome {
        let path = file.path.clone();
        let (pages, failed) = match tokio::task::spawn_blocking(move || {
            Self::read_pages(&path, deadline)
        })
        .await
        {
            Ok(Ok(read)) => read,
            Ok(Err(outcome)) => return outcome,
            Err(e) => {
                return AttemptOutcome::Corrupt {
                    reason: format!("extraction task failed: {e}"),
                };
            }
        };

        let chars = content_chars(&pages);
        tracing::debug!(page_count = pages.len(), failed, chars, "PDF text layer read");

        let text = join_pages(&pages);
        if chars <= self.min_chars {
            AttemptOutcome::InsufficientYield { text }
        } else {
            AttemptOutcome::Success {
                text,
                warnings: unread_pages_warning(failed),
            }
        }
    }
}
