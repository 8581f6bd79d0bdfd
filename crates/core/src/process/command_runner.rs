use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one external-process invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// `None` when the process was killed (timeout) or died to a signal.
    pub exit_code: Option<i32>,
    /// Merged stdout/stderr, in arrival order.
    pub lines: Vec<String>,
    pub timed_out: bool,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Seam for invoking external executables.
///
/// Implementations merge the child's stdout and stderr into one ordered
/// line sequence, consume it incrementally, and enforce the wall-clock
/// timeout by force-killing the child. Exit codes are reported, never
/// interpreted; that is the caller's job.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<RunOutput, ProcessError>;
}
