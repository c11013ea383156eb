//! Errors for fallible external input (diagrams, config files)
//!
//! Illegal moves and "no legal moves" are not errors: the match controller
//! handles both as part of normal play. A piece on a light square inside the
//! engine is a bug and panics instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed board diagram at line {line}: {reason}")]
    MalformedDiagram { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
