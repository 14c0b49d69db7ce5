/*!
 * Translation engine for book translation using AI backends.
 *
 * This module contains the core functionality for translating extracted
 * document units using various backends. It is split into several submodules:
 *
 * - `core`: Core translation service definition and API key rotation
 * - `pipeline`: Sequential unit driver with checkpointing and resume
 * - `progress`: Persistent progress snapshots for interrupted runs
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::pipeline::{PipelineEnd, PipelineOutcome, TranslationPipeline};
pub use self::progress::ProgressStore;

// Submodules
pub mod core;
pub mod pipeline;
pub mod progress;
