use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use lexdoc::application::ports::UsageGate;
use lexdoc::application::services::{DocumentAnalysisService, ExtractionService};
use lexdoc::infrastructure::llm::{ChatCompletionsClient, DEFAULT_SYSTEM_PROMPT};
use lexdoc::infrastructure::observability::{TracingConfig, init_tracing};
use lexdoc::infrastructure::ocr::{PdfiumRasterizer, TesseractEngine};
use lexdoc::infrastructure::storage::LocalFileStore;
use lexdoc::infrastructure::text_processing::ExtractorFactory;
use lexdoc::infrastructure::usage::UnlimitedUsageGate;
use lexdoc::presentation::{AppState, Environment, Settings, SettingsError, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(SettingsError::Environment)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    let tracing_config = TracingConfig::new(
        environment.as_str(),
        settings.logging.enable_json || environment.prefers_json_logs(),
        &settings.logging.level,
    );
    init_tracing(&tracing_config);

    let ocr = Arc::new(TesseractEngine::new(settings.ocr.tesseract_cmd.clone()));
    let rasterizer = Arc::new(PdfiumRasterizer::new(settings.ocr.max_pages));
    let chains = ExtractorFactory::create(&settings.extraction, &settings.ocr, ocr, rasterizer);

    let extraction_service = Arc::new(ExtractionService::new(
        chains,
        settings.extraction.budget.timeout_budget(),
        settings.extraction.limits(),
    ));
    let segmenter = Arc::new(settings.segmenter.segmenter());

    if settings.llm.api_key.is_empty() {
        tracing::warn!("llm.api_key is empty; analysis requests will fail");
    }
    let llm_client = Arc::new(ChatCompletionsClient::new(
        &settings.llm,
        DEFAULT_SYSTEM_PROMPT,
    ));
    let usage_gate: Arc<dyn UsageGate> = Arc::new(UnlimitedUsageGate);

    let analysis_service = Arc::new(DocumentAnalysisService::new(
        Arc::clone(&extraction_service),
        llm_client,
        usage_gate,
        Arc::clone(&segmenter),
        settings.llm.max_document_chars,
    ));

    let file_store = Arc::new(
        LocalFileStore::new(settings.storage.local_path.clone())
            .context("failed to open upload store")?,
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;

    let state = AppState {
        extraction_service,
        analysis_service,
        segmenter,
        file_store,
        settings,
    };
    let router = create_router(state);

    tracing::info!(%addr, "Listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
