//! Locating and rewriting marker-delimited blocks in event files.

pub mod error;
pub mod rewriter;
pub mod scanner;

pub use error::{BlockError, BlockErrorKind};
pub use rewriter::{BlockRewriter, RewriteOutcome};
pub use scanner::{scan, AiBlock, MarkerSet, ScannedFile};
