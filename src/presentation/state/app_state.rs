use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::application::services::{DocumentAnalysisService, ExtractionService, ResultSegmenter};
use crate::infrastructure::storage::LocalFileStore;
use crate::presentation::config::Settings;

pub struct AppState<L>
where
    L: LlmClient,
{
    pub extraction_service: Arc<ExtractionService>,
    pub analysis_service: Arc<DocumentAnalysisService<L>>,
    pub segmenter: Arc<ResultSegmenter>,
    pub file_store: Arc<LocalFileStore>,
    pub settings: Settings,
}

impl<L> Clone for AppState<L>
where
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
            analysis_service: Arc::clone(&self.analysis_service),
            segmenter: Arc::clone(&self.segmenter),
            file_store: Arc::clone(&self.file_store),
            settings: self.settings.clone(),
        }
    }
}
