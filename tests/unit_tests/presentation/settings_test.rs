use std::time::Duration;

use lexdoc::application::services::{ResultSegmenter, TimeoutBudget};
use lexdoc::presentation::{Environment, Settings, SettingsError};

#[test]
fn given_defaults_when_validating_then_settings_are_accepted() {
    let settings = Settings::default();

    assert!(settings.validate().is_ok());
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.extraction.max_file_size_bytes, 10 * 1024 * 1024);
}

#[test]
fn given_payload_smaller_than_indicator_when_validating_then_rejected() {
    let mut settings = Settings::default();
    settings.segmenter.max_payload_chars = 100;
    settings.segmenter.reserve_buffer_chars = 100;

    let result = settings.validate();

    assert!(matches!(result, Err(SettingsError::Invalid(msg)) if msg.contains("max_payload_chars")));
}

#[test]
fn given_zero_legacy_budget_when_validating_then_rejected() {
    let mut settings = Settings::default();
    settings.extraction.budget.legacy_secs = 0;

    let result = settings.validate();

    assert!(matches!(result, Err(SettingsError::Invalid(msg)) if msg.contains("legacy_secs")));
}

#[test]
fn given_min_budget_above_max_when_validating_then_rejected() {
    let mut settings = Settings::default();
    settings.extraction.budget.native_min_secs = 200;

    assert!(settings.validate().is_err());
}

#[test]
fn given_default_budget_settings_when_mapping_then_matches_default_budget() {
    let settings = Settings::default();

    assert_eq!(settings.extraction.budget.timeout_budget(), TimeoutBudget::default());
}

#[test]
fn given_custom_budget_settings_when_mapping_then_seconds_become_durations() {
    let mut settings = Settings::default();
    settings.extraction.budget.legacy_secs = 15;
    settings.extraction.budget.ocr_multiplier = 3;

    let budget = settings.extraction.budget.timeout_budget();

    assert_eq!(budget.legacy, Duration::from_secs(15));
    assert_eq!(budget.ocr_multiplier, 3);
}

#[test]
fn given_segmenter_settings_when_building_then_payload_limit_is_applied() {
    let mut settings = Settings::default();
    settings.segmenter.max_payload_chars = 2000;

    let segmenter = settings.segmenter.segmenter();

    assert_eq!(segmenter.max_payload_chars(), 2000);
    assert_eq!(
        Settings::default().segmenter.segmenter().max_payload_chars(),
        ResultSegmenter::DEFAULT_MAX_PAYLOAD_CHARS
    );
}

#[test]
fn given_environment_names_when_parsing_then_aliases_are_accepted() {
    assert_eq!(Environment::try_from("Production".to_string()), Ok(Environment::Prod));
    assert_eq!(Environment::try_from("development".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from(" test ".to_string()), Ok(Environment::Test));
    assert!(Environment::try_from("staging".to_string()).is_err());
}

#[test]
fn given_environment_when_choosing_log_format_then_only_prod_uses_json() {
    assert!(Environment::Prod.prefers_json_logs());
    assert!(!Environment::Local.prefers_json_logs());
    assert_eq!(Environment::Prod.file_suffix(), "prod");
}
