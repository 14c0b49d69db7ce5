/*!
 * Document handling for the supported book formats.
 *
 * This module contains the structural side of the pipeline:
 * - `epub`: EPUB container reading and writing
 * - `markup`: chapter markup scanning and bilingual weaving
 * - `text`: line-oriented plain-text documents
 *
 * Extraction and reassembly share the same walkers, so the unit order seen
 * while translating is the order used when the output is put back together.
 */

use anyhow::Result;
use std::path::Path;

use crate::app_config::DocumentConfig;
use crate::file_utils::{DocumentKind, FileManager};

pub mod epub;
pub mod markup;
pub mod text;

/// A loaded input document, dispatched by kind
pub enum LoadedDocument {
    /// EPUB book held fully in memory
    Epub(epub::EpubPackage),

    /// Plain text content
    Text(String),
}

impl LoadedDocument {
    /// Load the document at `path` according to its detected kind
    pub fn load(path: &Path, kind: DocumentKind) -> Result<Self> {
        match kind {
            DocumentKind::Epub => Ok(Self::Epub(epub::EpubPackage::open(path)?)),
            DocumentKind::Text => Ok(Self::Text(FileManager::read_to_string(path)?)),
        }
    }

    /// Extract the ordered meaningful units
    pub fn extract_units(&self, config: &DocumentConfig) -> Result<Vec<String>> {
        match self {
            Self::Epub(package) => package.extract_units(config),
            Self::Text(content) => Ok(text::extract_units(content)),
        }
    }

    /// Write the translated document to `output_path`
    ///
    /// EPUB books get the bilingual weave, text files the translated lines.
    /// Fewer translations than units leaves the tail of the document
    /// original-only, which is what partial artifacts rely on.
    pub fn write_translated(
        &self,
        config: &DocumentConfig,
        translations: &[String],
        output_path: &Path,
    ) -> Result<()> {
        match self {
            Self::Epub(package) => {
                let woven = package.weave_translations(config, translations)?;
                woven.write_to(output_path)
            }
            Self::Text(_) => {
                FileManager::write_to_file(output_path, &text::reassemble(translations))
            }
        }
    }
}

/// Check whether a span of text is worth sending to translation
///
/// Empty, all-whitespace and all-digit spans never become units: they are
/// not emitted by extraction and never occupy a progress-record position.
pub fn is_meaningful(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.chars().all(char::is_whitespace) {
        return false;
    }
    if text.chars().all(char::is_numeric) {
        return false;
    }
    true
}
