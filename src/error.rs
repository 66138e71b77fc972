//! Error types for the generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Domain;

/// Failure reported by a delegated artifact generator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DelegateError {
    /// Human-readable failure description.
    pub message: String,
}

impl DelegateError {
    /// Build a delegate error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DelegateError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors raised while generating domain clients.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The input document could not be parsed.
    #[error("{message}")]
    Parse { message: String },

    /// The delegated single-file generator failed for one domain.
    #[error("delegated generator failed for the {domain} domain: {source}")]
    Delegate {
        domain: Domain,
        #[source]
        source: DelegateError,
    },

    /// A filesystem operation failed.
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more domains failed after all domains were attempted.
    #[error("generation failed for {} of {attempted} domains", failures.len())]
    Run {
        attempted: usize,
        failures: Vec<DomainFailure>,
    },
}

impl GenerateError {
    /// Helper for wrapping an I/O error with its path and action.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// One domain's failure inside a [`GenerateError::Run`].
#[derive(Debug, Error)]
#[error("{domain}: {source}")]
pub struct DomainFailure {
    pub domain: Domain,
    #[source]
    pub source: Box<GenerateError>,
}
