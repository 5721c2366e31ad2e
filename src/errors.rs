//! Error types for the kinetic-notes application.
//!
//! The note store itself absorbs lookup misses and persistence failures, so
//! these errors only surface from the outer layers: configuration, draft
//! validation, the classifier transport and the command line.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the kinetic-notes application.
#[derive(Error, Debug)]
pub enum KnError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport errors talking to the classification service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// A draft failed validation before reaching the store.
    #[error("Invalid note: {message}")]
    Validation { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// The classification service could not produce a verdict.
    #[error("Classifier error: {message}")]
    ClassifierError { message: String },

    /// The command requires a logged-in session.
    #[error("Not logged in. Run `kinotes login` first")]
    NotAuthenticated,

    /// Login was refused.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },

    /// for mutex lock acquisition issues
    #[error("{message}")]
    LockAcquisitionFailed { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
