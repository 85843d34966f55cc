//! Error types for minicomp
//!
//! Uses `thiserror` for library errors. The pipeline performs no internal
//! suppression: every error here propagates to the host orchestrator, which
//! decides whether one file's failure aborts the whole build.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for minicomp operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Main error type for minicomp operations
#[derive(Error, Debug)]
pub enum CompileError {
    /// The external source transform rejected the file. Fatal for this
    /// file's build subtree; never retried.
    #[error("transform failed for {file}: {message}")]
    Transform { file: PathBuf, message: String },

    /// A source file could not be read
    #[error("cannot read source file {file}: {source}")]
    ReadSource {
        file: PathBuf,
        source: std::io::Error,
    },

    /// Output directory creation or artifact write failure
    #[error("cannot write artifact {file}: {source}")]
    WriteArtifact {
        file: PathBuf,
        source: std::io::Error,
    },

    /// A resource path that should be inside the source root is not
    #[error("resource '{path}' is outside source root '{root}'")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for the component configuration
    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
