use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DocumentError;

// @module: File and path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to raw bytes
    pub fn read_to_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write raw bytes to a file
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the document kind from the file extension
    pub fn detect_document_kind<P: AsRef<Path>>(path: P) -> Result<DocumentKind, DocumentError> {
        let path = path.as_ref();

        match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
            Some(ext) if ext == "epub" => Ok(DocumentKind::Epub),
            Some(ext) if ext == "txt" => Ok(DocumentKind::Text),
            _ => Err(DocumentError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    // @generates: Default output path next to the input document
    // @params: input_file, kind
    pub fn default_output_path<P: AsRef<Path>>(input_file: P, kind: DocumentKind) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let filename = match kind {
            DocumentKind::Epub => format!("{}_bilingual.epub", stem),
            DocumentKind::Text => format!("{}_translated.txt", stem),
        };

        input_file.with_file_name(filename)
    }

    // @generates: Partial-artifact path used when a job stops early
    pub fn partial_output_path<P: AsRef<Path>>(input_file: P, kind: DocumentKind) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let filename = match kind {
            DocumentKind::Epub => format!("{}_bilingual_temp.epub", stem),
            DocumentKind::Text => format!("{}_translated_temp.txt", stem),
        };

        input_file.with_file_name(filename)
    }

    // @generates: Progress-file path derived from the input stem
    pub fn progress_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        input_file.with_file_name(format!(".{}.progress.json", stem))
    }
}

/// Enum representing the supported document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// EPUB book (zip container of markup chapters and resources)
    Epub,
    /// Plain line-oriented text file
    Text,
}
