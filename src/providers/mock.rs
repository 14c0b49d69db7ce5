/*!
 * Mock backend implementations for testing.
 *
 * This module provides mock backends that simulate different behaviors:
 * - `MockBackend::working()` - Always succeeds with tagged translated text
 * - `MockBackend::failing()` - Every call fails internally and degrades to
 *   returning the input text unchanged
 *
 * The request counter is shared across clones, so tests can hand a clone to
 * the pipeline and still observe how many backend calls were made.
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::providers::Backend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tagged translation
    Working,
    /// Always fails and therefore returns the input unchanged
    Failing,
}

/// Mock backend for testing driver behavior
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls observed
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock backend that degrades every call
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn translate(&self, text: &str) -> String {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => {
                if let Some(generator) = self.custom_response {
                    generator(text)
                } else {
                    format!("[TRANSLATED] {}", text)
                }
            }
            // The degraded contract: a failed call yields the original text
            MockBehavior::Failing => text.to_string(),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
