/// Error types shared across the application
///
/// Every error is recovered at the controller or app boundary and turned
/// into a status line or the `Failed` phase. Nothing here is allowed to
/// take the UI down.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::state::Phase;

/// Errors returned by the analysis session controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The selected image violates the format or size constraints
    #[error("Invalid image: {0}")]
    InvalidInput(#[from] InputError),
    /// An operation was invoked outside the phase it is valid in
    #[error("Cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
    /// The inference backend returned data outside the result schema
    #[error("Backend contract violation: {0}")]
    ContractViolation(String),
}

/// Reasons an image selection is refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("the file is empty")]
    Empty,
    #[error("the file is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("only PNG and JPEG images are supported")]
    UnsupportedFormat,
    #[error("the image could not be decoded: {0}")]
    Undecodable(String),
}

/// Errors produced while talking to an inference backend
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("No inference backend is configured")]
    NotConfigured,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode backend response: {0}")]
    Decode(String),
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Errors produced while reading an image from disk or building its preview
#[derive(Error, Debug, Clone)]
pub enum AcquireError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<AcquireError> for SessionError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Input(input) => SessionError::InvalidInput(input),
            other => SessionError::InvalidInput(InputError::Undecodable(other.to_string())),
        }
    }
}

/// Errors produced while loading or saving settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}
