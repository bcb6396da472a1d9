mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BudgetSettings, ExtractionSettings, LlmSettings, LoggingSettings, OcrSettings,
    SegmenterSettings, ServerSettings, Settings, SettingsError, StorageSettings,
};
