use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language for translation (code, variant or English name)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Document extraction config
    #[serde(default)]
    pub document: DocumentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBackend {
    // @backend: OpenAI chat completions
    #[default]
    ChatGPT,
    // @backend: OpenAI legacy completions
    GPT3,
    // @backend: Google web translation (keyless)
    Google,
}

impl TranslationBackend {
    // @returns: Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::ChatGPT => "ChatGPT",
            Self::GPT3 => "GPT-3",
            Self::Google => "Google",
        }
    }

    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::ChatGPT => "chatgpt".to_string(),
            Self::GPT3 => "gpt3".to_string(),
            Self::Google => "google".to_string(),
        }
    }

    // @returns: Whether this backend authenticates with an API key
    pub fn needs_api_key(&self) -> bool {
        match self {
            Self::ChatGPT | Self::GPT3 => true,
            Self::Google => false,
        }
    }
}

// Implement Display trait for TranslationBackend
impl std::fmt::Display for TranslationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationBackend
impl std::str::FromStr for TranslationBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "chatgptapi" => Ok(Self::ChatGPT),
            "gpt3" => Ok(Self::GPT3),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid backend type: {}", s)),
        }
    }
}

/// Backend configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    // @field: Backend type identifier
    #[serde(rename = "type")]
    pub backend_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key pool, one key or comma-separated keys
    #[serde(default = "String::new")]
    pub api_keys: String,

    // @field: Service base URL
    #[serde(default = "String::new")]
    pub api_base: String,

    // @field: Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    // @param backend_type: Backend enum
    // @returns: Backend config with defaults
    pub fn new(backend_type: TranslationBackend) -> Self {
        match backend_type {
            TranslationBackend::ChatGPT => Self {
                backend_type: "chatgpt".to_string(),
                model: default_chatgpt_model(),
                api_keys: String::new(),
                api_base: default_openai_api_base(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationBackend::GPT3 => Self {
                backend_type: "gpt3".to_string(),
                model: default_gpt3_model(),
                api_keys: String::new(),
                api_base: default_openai_api_base(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationBackend::Google => Self {
                backend_type: "google".to_string(),
                model: String::new(),
                api_keys: String::new(),
                api_base: default_google_api_base(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation backend to use
    #[serde(default)]
    pub backend: TranslationBackend,

    /// Available translation backends
    #[serde(default)]
    pub available_backends: Vec<BackendConfig>,

    /// Proxy URL threaded into backend clients (empty = direct)
    #[serde(default = "String::new")]
    pub proxy: String,
}

/// Document extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Comma-separated element names whose text is translatable
    #[serde(default = "default_translate_tags")]
    pub translate_tags: String,

    /// Whether to also translate meaningful text runs outside those elements
    #[serde(default)]
    pub include_text_runs: bool,
}

impl DocumentConfig {
    /// Parsed element-name list, trimmed and without empties
    pub fn tag_list(&self) -> Vec<String> {
        self.translate_tags
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            translate_tags: default_translate_tags(),
            include_text_runs: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_language() -> String {
    "zh-hans".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_translate_tags() -> String {
    "p".to_string()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_google_api_base() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_chatgpt_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_gpt3_model() -> String {
    "text-davinci-003".to_string()
}

impl Config {

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate target language
        let _label = crate::language_utils::resolve_language_label(&self.target_language)?;

        // Validate the API key pool for backends that authenticate
        if self.translation.backend.needs_api_key()
            && self.translation.get_api_keys().is_empty() {
            return Err(anyhow!(
                "An API key is required for the {} backend",
                self.translation.backend.display_name()
            ));
        }

        // Validate the proxy URL when one is configured
        if !self.translation.proxy.is_empty() {
            url::Url::parse(&self.translation.proxy)
                .map_err(|e| anyhow!("Invalid proxy URL '{}': {}", self.translation.proxy, e))?;
        }

        // At least one unit selector must remain active
        if self.document.tag_list().is_empty() && !self.document.include_text_runs {
            return Err(anyhow!("No translatable tags configured and text runs disabled"));
        }

        Ok(())
    }

}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            document: DocumentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active backend configuration from the available_backends array
    pub fn get_active_backend_config(&self) -> Option<&BackendConfig> {
        let backend_str = self.backend.to_lowercase_string();
        self.available_backends.iter()
            .find(|b| b.backend_type == backend_str)
    }

    /// Get the key pool for the active backend, split on commas
    pub fn get_api_keys(&self) -> Vec<String> {
        if let Some(backend_config) = self.get_active_backend_config() {
            return backend_config.api_keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }

        Vec::new()
    }

    /// Get the model for the active backend
    pub fn get_model(&self) -> String {
        if let Some(backend_config) = self.get_active_backend_config() {
            if !backend_config.model.is_empty() {
                return backend_config.model.clone();
            }
        }

        // Default fallback based on backend type
        match self.backend {
            TranslationBackend::ChatGPT => default_chatgpt_model(),
            TranslationBackend::GPT3 => default_gpt3_model(),
            TranslationBackend::Google => String::new(),
        }
    }

    /// Get the API base URL for the active backend
    pub fn get_api_base(&self) -> String {
        if let Some(backend_config) = self.get_active_backend_config() {
            if !backend_config.api_base.is_empty() {
                return backend_config.api_base.clone();
            }
        }

        // Default fallback based on backend type
        match self.backend {
            TranslationBackend::ChatGPT | TranslationBackend::GPT3 => default_openai_api_base(),
            TranslationBackend::Google => default_google_api_base(),
        }
    }

    /// Get the request timeout for the active backend
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(backend_config) = self.get_active_backend_config() {
            if backend_config.timeout_secs > 0 {
                return backend_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }

    /// Replace the key pool on the active backend config
    pub fn set_api_keys(&mut self, keys: &str) {
        let backend_str = self.backend.to_lowercase_string();
        if let Some(backend_config) = self.available_backends.iter_mut()
            .find(|b| b.backend_type == backend_str) {
            backend_config.api_keys = keys.to_string();
        } else {
            let mut config = BackendConfig::new(self.backend.clone());
            config.api_keys = keys.to_string();
            self.available_backends.push(config);
        }
    }

    /// Replace the model on the active backend config
    pub fn set_model(&mut self, model: &str) {
        let backend_str = self.backend.to_lowercase_string();
        if let Some(backend_config) = self.available_backends.iter_mut()
            .find(|b| b.backend_type == backend_str) {
            backend_config.model = model.to_string();
        } else {
            let mut config = BackendConfig::new(self.backend.clone());
            config.model = model.to_string();
            self.available_backends.push(config);
        }
    }

    /// Replace the API base on the active backend config
    pub fn set_api_base(&mut self, api_base: &str) {
        let backend_str = self.backend.to_lowercase_string();
        if let Some(backend_config) = self.available_backends.iter_mut()
            .find(|b| b.backend_type == backend_str) {
            backend_config.api_base = api_base.to_string();
        } else {
            let mut config = BackendConfig::new(self.backend.clone());
            config.api_base = api_base.to_string();
            self.available_backends.push(config);
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            backend: TranslationBackend::default(),
            available_backends: Vec::new(),
            proxy: String::new(),
        };

        // Add default backends
        config.available_backends.push(BackendConfig::new(TranslationBackend::ChatGPT));
        config.available_backends.push(BackendConfig::new(TranslationBackend::GPT3));
        config.available_backends.push(BackendConfig::new(TranslationBackend::Google));

        config
    }
}
