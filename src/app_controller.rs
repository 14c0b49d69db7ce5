use anyhow::{anyhow, Result};
use indicatif::MultiProgress;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::LoadedDocument;
use crate::file_utils::{DocumentKind, FileManager};
use crate::translation::pipeline::{PipelineEnd, TranslationPipeline};
use crate::translation::progress::ProgressStore;
use crate::translation::TranslationService;

// @module: Application controller for document translation

/// Options for a single translation job
#[derive(Debug, Clone)]
pub struct JobOptions {
    // @field: Explicit output path, defaults next to the input
    pub output_path: Option<PathBuf>,

    // @field: Replay the progress snapshot of an earlier run
    pub resume: bool,

    // @field: Stop after test_count units
    pub is_test: bool,

    // @field: Unit limit for test runs
    pub test_count: usize,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            resume: false,
            is_test: false,
            test_count: 10,
        }
    }
}

/// Main application controller for book translation
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full workflow for one input document
    pub async fn run(&self, input_file: PathBuf, options: JobOptions) -> Result<()> {
        // Convert Ctrl-C into a cooperative stop between units
        let cancel = Arc::new(AtomicBool::new(false));
        let signal_flag = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current unit");
                signal_flag.store(true, Ordering::SeqCst);
            }
        });

        self.run_with_cancel_flag(input_file, options, cancel).await
    }

    /// Run the workflow with an externally controlled cancellation flag
    pub async fn run_with_cancel_flag(
        &self,
        input_file: PathBuf,
        options: JobOptions,
        cancel: Arc<AtomicBool>,
    ) -> Result<()> {
        // Check if the input file exists
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        // Unsupported extensions fail here, before any job state exists
        let kind = FileManager::detect_document_kind(&input_file)?;

        let source = FileManager::read_to_bytes(&input_file)?;
        let store = ProgressStore::new(FileManager::progress_path(&input_file), &source);

        let document = LoadedDocument::load(&input_file, kind)?;
        let units = document.extract_units(&self.config.document)?;
        info!("Found {} translatable units in {:?}", units.len(), input_file);

        // The snapshot is only read back on an explicit resume; otherwise a
        // leftover snapshot is simply overwritten by the first checkpoint
        let resumed = if options.resume {
            let loaded = store.load()?;
            info!(
                "Resuming: {} units replay from {}",
                loaded.len(),
                store.path().display()
            );
            loaded
        } else {
            Vec::new()
        };

        let service = TranslationService::new(&self.config)?;
        let model = self.config.translation.get_model();
        if model.is_empty() {
            info!("🚀 yabtwai: {}", self.config.translation.backend.display_name());
        } else {
            info!(
                "🚀 yabtwai: {} - {}",
                self.config.translation.backend.display_name(),
                model
            );
        }
        info!("Translating, please wait…");

        let multi_progress = MultiProgress::new();
        let pipeline = TranslationPipeline::new(&service, &store)
            .with_resumed(resumed)
            .with_limit(options.is_test.then_some(options.test_count))
            .with_cancel_flag(cancel);
        let outcome = pipeline.run(&units, &multi_progress).await;

        if outcome.is_finished() {
            let output_path = options
                .output_path
                .clone()
                .unwrap_or_else(|| FileManager::default_output_path(&input_file, kind));
            match document.write_translated(&self.config.document, &outcome.units, &output_path) {
                Ok(()) => {
                    info!("Success: {}", output_path.display());
                    info!(
                        "Translation complete. Replayed: {} - Translated: {} in {}",
                        outcome.replayed,
                        outcome.translated,
                        Self::format_duration(outcome.duration)
                    );
                    return Ok(());
                }
                Err(e) => {
                    error!("Could not write the output document: {}", e);
                }
            }
        } else if outcome.end == PipelineEnd::Interrupted {
            warn!(
                "Translation interrupted after {} of {} units",
                outcome.units.len(),
                units.len()
            );
        }

        // Best-effort checkpoint and partial artifact, then a graceful stop
        self.salvage(&document, &store, &input_file, kind, &outcome.units);
        info!("You can resume this run later with --resume");
        Ok(())
    }

    /// Keep what a stopped run produced: checkpoint, then partial artifact
    fn salvage(
        &self,
        document: &LoadedDocument,
        store: &ProgressStore,
        input_file: &Path,
        kind: DocumentKind,
        units: &[String],
    ) {
        if let Err(e) = store.save(units) {
            warn!("Could not checkpoint progress: {}", e);
        }

        let partial_path = FileManager::partial_output_path(input_file, kind);
        match document.write_translated(&self.config.document, units, &partial_path) {
            Ok(()) => info!("Partial document written to {}", partial_path.display()),
            Err(e) => warn!("Could not write the partial document: {}", e),
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
