pub mod domain;
pub mod infrastructure;

use std::path::PathBuf;

use thiserror::Error;

use crate::process::command_runner::ProcessError;

/// Failure of one transcription pipeline run.
///
/// Parsing-level trouble (malformed blocks, odd encodings) never surfaces
/// here; it is absorbed by the normalizer/parser fallback tiers. These are
/// the process- and IO-level aborts.
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("unsupported audio format: {path} (expected wav, mp3, flac, ogg or m4a)")]
    UnsupportedFormat { path: PathBuf },

    #[error("audio file is not readable: {path}")]
    UnreadableInput { path: PathBuf },

    #[error("speech engine not initialized: missing {path}")]
    EngineNotInitialized { path: PathBuf },

    #[error("speech engine exceeded its time limit and was killed")]
    EngineTimeout,

    #[error("speech engine produced no usable output artifact")]
    NoOutputProduced,

    #[error("temporary file handling failed at {path}: {source}")]
    TempIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("segment store failure: {0}")]
    Store(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}
