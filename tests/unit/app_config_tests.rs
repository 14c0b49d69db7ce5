/*!
 * Tests for application configuration functionality
 */

use std::str::FromStr;
use yabtwai::app_config::{BackendConfig, Config, LogLevel, TranslationBackend, TranslationConfig};

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    // Test top-level default values
    assert_eq!(config.target_language, "zh-hans");
    assert_eq!(config.translation.backend, TranslationBackend::ChatGPT);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.document.translate_tags, "p");
    assert!(!config.document.include_text_runs);

    // Test the active backend config values
    let chatgpt_config = config.translation.get_active_backend_config()
        .expect("ChatGPT backend config should exist");
    assert_eq!(chatgpt_config.model, "gpt-3.5-turbo");
    assert_eq!(chatgpt_config.api_base, "https://api.openai.com");
    assert_eq!(chatgpt_config.timeout_secs, 30);
    assert!(chatgpt_config.api_keys.is_empty());
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    // The default config selects ChatGPT without an API key
    let mut config = Config::default();
    assert!(config.validate().is_err());

    // With a key the config becomes valid
    config.translation.set_api_keys("sk-1234567890");
    assert!(config.validate().is_ok());

    // Google requires no key at all
    config.translation.backend = TranslationBackend::Google;
    assert!(config.validate().is_ok());

    // Unresolvable target language
    config.target_language = "elvish".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();

    // Invalid proxy URL
    config.translation.proxy = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.proxy = "http://127.0.0.1:7890".to_string();
    assert!(config.validate().is_ok());

    // No translatable tags and no text runs leaves nothing to translate
    config.document.translate_tags = String::new();
    assert!(config.validate().is_err());
    config.document.include_text_runs = true;
    assert!(config.validate().is_ok());
}

/// Test API key pool splitting on commas
#[test]
fn test_getApiKeys_withCommaSeparatedPool_shouldSplitAndTrim() {
    let mut config = Config::default();
    config.translation.set_api_keys("sk-one, sk-two ,,sk-three");

    let keys = config.translation.get_api_keys();

    assert_eq!(keys, vec!["sk-one", "sk-two", "sk-three"]);
}

/// Test model and API base fallbacks when no backend entry exists
#[test]
fn test_backendLookups_withEmptyAvailableBackends_shouldFallBackToDefaults() {
    let translation = TranslationConfig {
        backend: TranslationBackend::GPT3,
        available_backends: Vec::new(),
        proxy: String::new(),
    };

    assert_eq!(translation.get_model(), "text-davinci-003");
    assert_eq!(translation.get_api_base(), "https://api.openai.com");
    assert_eq!(translation.get_timeout_secs(), 30);
    assert!(translation.get_api_keys().is_empty());
}

/// Test the override setters against the active backend entry
#[test]
fn test_backendSetters_shouldUpdateActiveBackendEntry() {
    let mut config = Config::default();
    config.translation.backend = TranslationBackend::Google;

    config.translation.set_api_base("http://localhost:8080");
    config.translation.set_model("custom-model");
    config.translation.set_api_keys("unused-key");

    assert_eq!(config.translation.get_api_base(), "http://localhost:8080");
    assert_eq!(config.translation.get_model(), "custom-model");
    assert_eq!(config.translation.get_api_keys(), vec!["unused-key"]);

    // The other backend entries are untouched
    config.translation.backend = TranslationBackend::ChatGPT;
    assert_eq!(config.translation.get_api_base(), "https://api.openai.com");
}

/// Test that the setters create a backend entry when none exists yet
#[test]
fn test_backendSetters_withMissingEntry_shouldCreateOne() {
    let mut translation = TranslationConfig {
        backend: TranslationBackend::ChatGPT,
        available_backends: Vec::new(),
        proxy: String::new(),
    };

    translation.set_api_keys("sk-new");

    assert_eq!(translation.available_backends.len(), 1);
    assert_eq!(translation.get_api_keys(), vec!["sk-new"]);
    // The created entry carries the backend defaults
    assert_eq!(translation.get_model(), "gpt-3.5-turbo");
}

/// Test backend name parsing, including the legacy alias
#[test]
fn test_backendFromStr_withKnownNames_shouldParse() {
    assert_eq!(TranslationBackend::from_str("chatgpt").unwrap(), TranslationBackend::ChatGPT);
    assert_eq!(TranslationBackend::from_str("chatgptapi").unwrap(), TranslationBackend::ChatGPT);
    assert_eq!(TranslationBackend::from_str("GPT3").unwrap(), TranslationBackend::GPT3);
    assert_eq!(TranslationBackend::from_str("google").unwrap(), TranslationBackend::Google);
    assert!(TranslationBackend::from_str("bing").is_err());
}

/// Test the backend display forms used in logs
#[test]
fn test_backendNames_shouldHaveBothDisplayForms() {
    assert_eq!(TranslationBackend::GPT3.display_name(), "GPT-3");
    assert_eq!(format!("{}", TranslationBackend::GPT3), "gpt3");
    assert_eq!(TranslationBackend::Google.to_lowercase_string(), "google");
    assert!(TranslationBackend::ChatGPT.needs_api_key());
    assert!(!TranslationBackend::Google.needs_api_key());
}

/// Test JSON serialization of the configuration
#[test]
fn test_configSerde_shouldRoundTripThroughJson() {
    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.translation.backend = TranslationBackend::GPT3;
    config.translation.set_api_keys("sk-aaa,sk-bbb");

    let json = serde_json::to_string_pretty(&config).unwrap();
    // The backend entry type tag serializes under the "type" key
    assert!(json.contains("\"type\": \"gpt3\""));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.target_language, "ja");
    assert_eq!(parsed.translation.backend, TranslationBackend::GPT3);
    assert_eq!(parsed.translation.get_api_keys(), vec!["sk-aaa", "sk-bbb"]);
}

/// Test that a minimal JSON document deserializes to the defaults
#[test]
fn test_configSerde_withEmptyDocument_shouldUseDefaults() {
    let parsed: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(parsed.target_language, "zh-hans");
    assert_eq!(parsed.translation.backend, TranslationBackend::ChatGPT);
    assert_eq!(parsed.document.translate_tags, "p");
}

/// Test translate-tags parsing
#[test]
fn test_tagList_withMessyInput_shouldTrimLowercaseAndDropEmpties() {
    let mut config = Config::default();
    config.document.translate_tags = "p, Blockquote ,,LI".to_string();

    assert_eq!(config.document.tag_list(), vec!["p", "blockquote", "li"]);
}

/// Test that BackendConfig::new fills per-backend defaults
#[test]
fn test_backendConfigNew_shouldCarryPerBackendDefaults() {
    let google = BackendConfig::new(TranslationBackend::Google);
    assert_eq!(google.backend_type, "google");
    assert_eq!(google.api_base, "https://translate.googleapis.com");
    assert!(google.model.is_empty());

    let gpt3 = BackendConfig::new(TranslationBackend::GPT3);
    assert_eq!(gpt3.model, "text-davinci-003");
}
