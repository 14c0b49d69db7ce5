/*!
 * Error types for the yabtwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while reading or writing a book document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file extension maps to no supported document kind
    #[error("Unsupported document format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// The EPUB container is missing a required piece (container.xml, OPF, ...)
    #[error("Invalid EPUB container: {0}")]
    InvalidContainer(String),

    /// A chapter could not be parsed as markup
    #[error("Malformed chapter markup in {item}: {reason}")]
    MalformedChapter {
        /// Archive name of the chapter item
        item: String,
        /// Parser error description
        reason: String
    },
}

/// Errors that can occur in the progress store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Resume was requested but the checkpoint cannot be loaded
    #[error("Cannot load progress file {path:?}: {reason}")]
    LoadFailed {
        /// Path of the progress file
        path: PathBuf,
        /// Why loading failed (absent, unreadable, corrupt, version mismatch)
        reason: String
    },

    /// A checkpoint could not be written durably
    #[error("Cannot save progress file {path:?}: {reason}")]
    SaveFailed {
        /// Path of the progress file
        path: PathBuf,
        /// Why saving failed
        reason: String
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document processing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the progress store
    #[error("Progress store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
