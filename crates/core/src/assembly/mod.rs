pub mod domain;
pub mod infrastructure;

use std::path::PathBuf;

use thiserror::Error;

use crate::process::command_runner::ProcessError;

/// Failure of one segment-assembly run. Whatever the terminal state, the
/// run's temporary working directory is gone by the time this surfaces.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("media engine not initialized: missing {path}")]
    EngineNotInitialized { path: PathBuf },

    #[error("source file not found for id {file_id}")]
    SourceNotFound { file_id: i64 },

    #[error("media engine exceeded its time limit and was killed")]
    EngineTimeout,

    #[error("failed to write concatenation manifest at {path}: {detail}")]
    ManifestWriteFailed { path: PathBuf, detail: String },

    #[error("merge failed: {detail}")]
    MergeFailed { detail: String },

    #[error("temporary file handling failed at {path}: {source}")]
    TempIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}
