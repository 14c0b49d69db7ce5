/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its
 * implementation, which dispatches single-unit requests to the configured
 * backend and rotates through the API key pool. A failed request is
 * logged and degrades to the original text, so a flaky backend never
 * aborts a long-running book translation.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::{Config, TranslationBackend};
use crate::language_utils;
use crate::providers::chat::ChatClient;
use crate::providers::completion::CompletionClient;
use crate::providers::google::GoogleTranslate;
use crate::providers::Backend;

/// Round-robin pool of API keys
///
/// Accounts with several keys spread a long book across all of them. The
/// cursor advances before every request, so a pool of one key behaves
/// exactly like a plain key.
pub struct KeyPool {
    /// Keys in rotation order
    keys: Vec<String>,

    /// Index of the next key to hand out
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Create a pool from an already-split key list
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of keys in the pool
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the pool holds no keys at all
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Advance the cursor and return the key it lands on
    pub fn next_key(&self) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.keys.len();
        Some(self.keys[index].as_str())
    }
}

/// Backend implementation variants
enum BackendImpl {
    /// OpenAI chat completions API
    Chat {
        /// Client instance
        client: ChatClient,
    },

    /// OpenAI legacy completions API
    Completion {
        /// Client instance
        client: CompletionClient,
    },

    /// Google web translation endpoint
    Google {
        /// Client instance
        client: GoogleTranslate,
    },
}

/// Main translation service for book translation
pub struct TranslationService {
    /// Backend implementation
    backend: BackendImpl,

    /// API keys rotated across requests
    keys: KeyPool,

    /// Language label embedded in prompts, or the raw code for Google
    target_language: String,

    /// Lowercase backend identifier used in log lines
    name: String,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let translation = &config.translation;
        let proxy = if translation.proxy.is_empty() {
            None
        } else {
            Some(translation.proxy.as_str())
        };

        let backend = match translation.backend {
            TranslationBackend::ChatGPT => BackendImpl::Chat {
                client: ChatClient::new(
                    &translation.get_api_base(),
                    &translation.get_model(),
                    translation.get_timeout_secs(),
                    proxy,
                )?,
            },
            TranslationBackend::GPT3 => BackendImpl::Completion {
                client: CompletionClient::new(
                    &translation.get_api_base(),
                    &translation.get_model(),
                    translation.get_timeout_secs(),
                    proxy,
                )?,
            },
            TranslationBackend::Google => BackendImpl::Google {
                client: GoogleTranslate::new(
                    &translation.get_api_base(),
                    translation.get_timeout_secs(),
                    proxy,
                )?,
            },
        };

        // LLM backends want an English label in the prompt, Google takes
        // the language code verbatim
        let target_language = match translation.backend {
            TranslationBackend::Google => config.target_language.trim().to_string(),
            _ => language_utils::resolve_language_label(&config.target_language)?,
        };

        Ok(Self {
            backend,
            keys: KeyPool::new(translation.get_api_keys()),
            target_language,
            name: translation.backend.to_lowercase_string(),
        })
    }

    /// Build the prompt sent to LLM backends for a single unit
    fn build_prompt(&self, text: &str) -> String {
        format!(
            "Please translate the following text into {}. \
             Reply with the translated content only, without the original text:\n\n{}",
            self.target_language, text
        )
    }
}

#[async_trait]
impl Backend for TranslationService {
    async fn translate(&self, text: &str) -> String {
        let result = match &self.backend {
            BackendImpl::Chat { client } => {
                let key = self.keys.next_key().unwrap_or_default();
                client.complete(&self.build_prompt(text), key).await
            }
            BackendImpl::Completion { client } => {
                let key = self.keys.next_key().unwrap_or_default();
                client.complete(&self.build_prompt(text), key).await
            }
            BackendImpl::Google { client } => {
                client.translate_text(text, &self.target_language).await
            }
        };

        match result {
            Ok(translated) => translated,
            Err(e) => {
                warn!("{} request failed, keeping the original text: {}", self.name, e);
                text.to_string()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
