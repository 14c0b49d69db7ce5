/*!
 * Sequential translation driver with checkpointing.
 *
 * The driver walks the extracted units in document order. For every unit
 * it either replays a previously saved translation or calls the backend,
 * and after every CHECKPOINT_INTERVAL processed units it rewrites the
 * complete progress snapshot. Replayed units advance the same counter as
 * fresh translations, so the checkpoint cadence is stable across resumed
 * runs. A final snapshot is written when the walk ends normally, which
 * keeps the store aligned with the produced document.
 */

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::providers::Backend;
use crate::translation::progress::ProgressStore;

/// Number of processed units between two progress snapshots
pub const CHECKPOINT_INTERVAL: usize = 20;

/// Why the driver stopped walking units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEnd {
    /// Every unit was processed
    Completed,

    /// The unit limit of a test run was reached
    LimitReached,

    /// A cancellation request arrived between units
    Interrupted,

    /// A snapshot write failed mid-run
    Aborted,
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Translated units in document order, one per processed unit
    pub units: Vec<String>,

    /// Why the run stopped
    pub end: PipelineEnd,

    /// Units replayed from the progress snapshot
    pub replayed: usize,

    /// Units translated through the backend
    pub translated: usize,

    /// Total processing time
    pub duration: Duration,

    /// Store failure that ended the run, when `end` is `Aborted`
    pub error: Option<String>,
}

impl PipelineOutcome {
    /// Whether the run produced everything it set out to produce
    pub fn is_finished(&self) -> bool {
        matches!(self.end, PipelineEnd::Completed | PipelineEnd::LimitReached)
    }
}

/// Sequential unit driver
pub struct TranslationPipeline<'a> {
    /// Backend receiving the units that are not replayed
    backend: &'a dyn Backend,

    /// Store receiving the periodic snapshots
    store: &'a ProgressStore,

    /// Translations replayed before the backend is called again
    resumed: Vec<String>,

    /// Stop after this many processed units (test runs)
    limit: Option<usize>,

    /// Cooperative cancellation flag checked between units
    cancel: Arc<AtomicBool>,
}

impl<'a> TranslationPipeline<'a> {
    /// Create a driver over a backend and a progress store
    pub fn new(backend: &'a dyn Backend, store: &'a ProgressStore) -> Self {
        Self {
            backend,
            store,
            resumed: Vec::new(),
            limit: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Seed the driver with units loaded from an earlier run
    pub fn with_resumed(mut self, resumed: Vec<String>) -> Self {
        self.resumed = resumed;
        self
    }

    /// Stop after a fixed number of processed units
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Install the cancellation flag flipped by the signal handler
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the units sequentially until done, limited or cancelled
    ///
    /// A failed snapshot write aborts the walk: continuing without working
    /// checkpoints would lose everything on the next crash. The partially
    /// translated units survive in the returned outcome either way.
    pub async fn run(&self, units: &[String], multi_progress: &MultiProgress) -> PipelineOutcome {
        let start_time = Instant::now();

        // Create a progress bar for translation tracking
        let progress_bar = multi_progress.add(ProgressBar::new(units.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let mut translated_units: Vec<String> = Vec::with_capacity(units.len());
        let mut replayed = 0;
        let mut translated = 0;
        let mut end = PipelineEnd::Completed;
        let mut store_error = None;

        for unit in units {
            if self.cancel.load(Ordering::SeqCst) {
                end = PipelineEnd::Interrupted;
                break;
            }

            if let Some(limit) = self.limit {
                if translated_units.len() >= limit {
                    end = PipelineEnd::LimitReached;
                    break;
                }
            }

            if translated_units.len() < self.resumed.len() {
                // Replay from the snapshot without calling the backend
                let replay = self.resumed[translated_units.len()].clone();
                translated_units.push(replay);
                replayed += 1;
            } else {
                let translation = self.backend.translate(unit).await;
                translated_units.push(translation);
                translated += 1;
            }

            progress_bar.set_position(translated_units.len() as u64);

            if translated_units.len() % CHECKPOINT_INTERVAL == 0 {
                debug!("Checkpoint after {} units", translated_units.len());
                if let Err(e) = self.store.save(&translated_units) {
                    error!("Checkpoint write failed: {}", e);
                    end = PipelineEnd::Aborted;
                    store_error = Some(e.to_string());
                    break;
                }
            }
        }

        // Align the stored snapshot with the units actually produced
        if matches!(end, PipelineEnd::Completed | PipelineEnd::LimitReached) {
            if let Err(e) = self.store.save(&translated_units) {
                error!("Final snapshot write failed: {}", e);
                end = PipelineEnd::Aborted;
                store_error = Some(e.to_string());
            }
        }

        // Clear rather than finish so log lines printed afterwards stay clean
        progress_bar.finish_and_clear();

        PipelineOutcome {
            units: translated_units,
            end,
            replayed,
            translated,
            duration: start_time.elapsed(),
            error: store_error,
        }
    }
}
