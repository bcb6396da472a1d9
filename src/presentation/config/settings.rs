use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::services::{ExtractionLimits, ResultSegmenter, TimeoutBudget};
use crate::domain::ContinuationIndicator;

use super::Environment;

// Largest source text the startup check sizes the continuation indicator for.
const INDICATOR_SIZING_CHARS: usize = 10_000_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub extraction: ExtractionSettings,
    pub ocr: OcrSettings,
    pub segmenter: SegmenterSettings,
    pub llm: LlmSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub max_file_size_bytes: u64,
    pub min_document_chars: usize,
    pub min_image_chars: usize,
    pub native_min_chars: usize,
    pub budget: BudgetSettings,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            min_document_chars: 10,
            min_image_chars: 5,
            native_min_chars: 50,
            budget: BudgetSettings::default(),
        }
    }
}

impl ExtractionSettings {
    pub fn limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_file_size_bytes: self.max_file_size_bytes,
            min_document_chars: self.min_document_chars,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub native_min_secs: u64,
    pub native_secs_per_mib: u64,
    pub native_max_secs: u64,
    pub ocr_multiplier: u32,
    pub legacy_secs: u64,
    pub image_ocr_guard_secs: u64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            native_min_secs: 30,
            native_secs_per_mib: 10,
            native_max_secs: 120,
            ocr_multiplier: 2,
            legacy_secs: 60,
            image_ocr_guard_secs: 90,
        }
    }
}

impl BudgetSettings {
    pub fn timeout_budget(&self) -> TimeoutBudget {
        TimeoutBudget {
            native_min: Duration::from_secs(self.native_min_secs),
            native_per_mib: Duration::from_secs(self.native_secs_per_mib),
            native_max: Duration::from_secs(self.native_max_secs),
            ocr_multiplier: self.ocr_multiplier,
            legacy: Duration::from_secs(self.legacy_secs),
            image_ocr_guard: Duration::from_secs(self.image_ocr_guard_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub tesseract_cmd: String,
    pub languages: String,
    pub fallback_language: String,
    pub render_dpi: f32,
    pub min_short_edge_px: u32,
    pub max_pages: usize,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            languages: "rus+eng".to_string(),
            fallback_language: "eng".to_string(),
            render_dpi: 300.0,
            min_short_edge_px: 1000,
            max_pages: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmenterSettings {
    pub max_payload_chars: usize,
    pub reserve_buffer_chars: usize,
    pub continuation_template: String,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            max_payload_chars: ResultSegmenter::DEFAULT_MAX_PAYLOAD_CHARS,
            reserve_buffer_chars: ResultSegmenter::DEFAULT_RESERVE_BUFFER_CHARS,
            continuation_template: ContinuationIndicator::DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl SegmenterSettings {
    pub fn segmenter(&self) -> ResultSegmenter {
        ResultSegmenter::new(
            self.max_payload_chars,
            self.reserve_buffer_chars,
            ContinuationIndicator::new(self.continuation_template.clone()),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub max_document_chars: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 3000,
            temperature: 0.3,
            max_document_chars: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub local_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            local_path: std::env::temp_dir().join("lexdoc-uploads"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("environment: {0}")]
    Environment(String),
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Settings {
    /// `appsettings.toml` and `appsettings.{environment}.toml`, then
    /// `APP_`-prefixed variables with `__` between nested keys.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = ::config::Config::builder()
            .add_source(::config::File::with_name("appsettings").required(false))
            .add_source(
                ::config::File::with_name(&format!("appsettings.{}", environment.file_suffix()))
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let segmenter = &self.segmenter;
        let indicator = ContinuationIndicator::new(segmenter.continuation_template.clone());
        let overhead =
            segmenter.reserve_buffer_chars + indicator.max_chars_for(INDICATOR_SIZING_CHARS);
        if segmenter.max_payload_chars <= overhead {
            return Err(SettingsError::Invalid(format!(
                "segmenter.max_payload_chars ({}) must exceed reserve buffer plus indicator ({})",
                segmenter.max_payload_chars, overhead
            )));
        }

        let budget = &self.extraction.budget;
        let budgets = [
            ("native_min_secs", budget.native_min_secs),
            ("native_max_secs", budget.native_max_secs),
            ("legacy_secs", budget.legacy_secs),
            ("image_ocr_guard_secs", budget.image_ocr_guard_secs),
            ("ocr_multiplier", u64::from(budget.ocr_multiplier)),
        ];
        if let Some((name, _)) = budgets.iter().find(|(_, value)| *value == 0) {
            return Err(SettingsError::Invalid(format!(
                "extraction.budget.{name} must be greater than zero"
            )));
        }
        if budget.native_min_secs > budget.native_max_secs {
            return Err(SettingsError::Invalid(
                "extraction.budget.native_min_secs must not exceed native_max_secs".to_string(),
            ));
        }

        if self.extraction.max_file_size_bytes == 0 {
            return Err(SettingsError::Invalid(
                "extraction.max_file_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.ocr.render_dpi <= 0.0 {
            return Err(SettingsError::Invalid(
                "ocr.render_dpi must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
