/*!
 * Backend implementations for the supported translation services.
 *
 * This module contains client implementations for the translation backends:
 * - ChatGPT: OpenAI chat completions API
 * - GPT-3: OpenAI legacy completions API
 * - Google: keyless web translation endpoint
 */

use async_trait::async_trait;

/// Common capability exposed by every translation backend
///
/// `translate` never fails: a backend that cannot produce a translation
/// returns the input text unchanged, so the driver loop only ever deals
/// with cancellation and file IO, not per-unit network faults.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Translate one unit of text into the configured target language
    async fn translate(&self, text: &str) -> String;

    /// Human-readable backend name for logging
    fn name(&self) -> &str;
}

pub mod chat;
pub mod completion;
pub mod google;
pub mod mock;
