//! Per-block rewrite failures.

use std::path::PathBuf;

use thiserror::Error;

/// Why a block could not be rewritten.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockErrorKind {
    #[error("no model reference line found")]
    MissingReference,
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("model '{0}' failed resolution")]
    UnresolvedModel(String),
    #[error("block never closed before end of file")]
    Unterminated,
}

/// A block left byte-identical to its input. The rest of the file is
/// still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: block {index}: {kind}", path.display())]
pub struct BlockError {
    pub path: PathBuf,
    /// Zero-based block position within the file.
    pub index: usize,
    pub kind: BlockErrorKind,
}
