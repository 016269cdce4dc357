//! Errors raised while loading trait and archetype definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::conditions::ValidationError;

pub type Result<T> = std::result::Result<T, DataError>;

/// Fatal error while loading declarative data files. Any of these
/// aborts the run before files are touched.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} '{name}' in {path}")]
    DuplicateIdentifier {
        kind: &'static str,
        name: String,
        path: PathBuf,
    },

    #[error("invalid definition '{name}' in {path}: {source}")]
    Validation {
        path: PathBuf,
        name: String,
        #[source]
        source: ValidationError,
    },
}
