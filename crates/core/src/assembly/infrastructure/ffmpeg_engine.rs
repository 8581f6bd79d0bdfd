use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assembly::MergeError;
use crate::shared::constants::{DEFAULT_CONCAT_TIMEOUT, DEFAULT_EXTRACT_TIMEOUT};
use crate::shared::time::format_seconds;

/// Configuration for the external media engine.
///
/// Like the speech engine, this is an explicit value constructed once at
/// startup; the binary's presence is checked up front.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    extract_timeout: Duration,
    concat_timeout: Duration,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: PathBuf) -> Result<Self, MergeError> {
        if !ffmpeg_path.is_file() {
            return Err(MergeError::EngineNotInitialized { path: ffmpeg_path });
        }
        Ok(Self {
            ffmpeg_path,
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
            concat_timeout: DEFAULT_CONCAT_TIMEOUT,
        })
    }

    /// For callers that locate the binary through `$PATH` rather than an
    /// explicit file (no existence probe possible in that case).
    pub fn from_command_name(name: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: name.into(),
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
            concat_timeout: DEFAULT_CONCAT_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, extract: Duration, concat: Duration) -> Self {
        self.extract_timeout = extract;
        self.concat_timeout = concat;
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    pub fn extract_timeout(&self) -> Duration {
        self.extract_timeout
    }

    pub fn concat_timeout(&self) -> Duration {
        self.concat_timeout
    }

    /// Stream-copy one time range out of `source`. Range endpoints are in
    /// milliseconds but the engine is addressed in whole seconds.
    pub fn extract_args(
        &self,
        source: &Path,
        start_ms: u64,
        end_ms: u64,
        output: &Path,
    ) -> Vec<String> {
        vec![
            "-i".to_string(),
            source.display().to_string(),
            "-ss".to_string(),
            format_seconds(start_ms / 1000),
            "-to".to_string(),
            format_seconds(end_ms / 1000),
            "-c".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ]
    }

    /// Stream-copy concatenation of every clip listed in `manifest`.
    pub fn concat_args(&self, manifest: &Path, output: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ]
    }
}

/// One concat-manifest line: absolute path, forward slashes, single quotes.
pub fn manifest_line(clip: &Path) -> String {
    let normalized = clip.display().to_string().replace('\\', "/");
    format!("file '{normalized}'")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_binary_is_not_initialized() {
        let result = FfmpegEngine::new(PathBuf::from("/nonexistent/ffmpeg"));
        assert!(matches!(
            result,
            Err(MergeError::EngineNotInitialized { .. })
        ));
    }

    #[test]
    fn test_new_accepts_existing_binary() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("ffmpeg");
        fs::write(&bin, b"x").unwrap();
        assert!(FfmpegEngine::new(bin).is_ok());
    }

    #[test]
    fn test_extract_args_use_second_granularity() {
        let engine = FfmpegEngine::from_command_name("ffmpeg");
        let args = engine.extract_args(
            Path::new("/audio/src.mp3"),
            65_500,
            125_999,
            Path::new("/tmp/clip.mp3"),
        );
        assert_eq!(
            args,
            vec![
                "-i",
                "/audio/src.mp3",
                "-ss",
                "00:01:05",
                "-to",
                "00:02:05",
                "-c",
                "copy",
                "/tmp/clip.mp3",
            ]
        );
    }

    #[test]
    fn test_concat_args() {
        let engine = FfmpegEngine::from_command_name("ffmpeg");
        let args = engine.concat_args(Path::new("/tmp/work/list.txt"), Path::new("/out/merged.mp3"));
        assert_eq!(
            args,
            vec![
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/tmp/work/list.txt",
                "-c",
                "copy",
                "/out/merged.mp3",
            ]
        );
    }

    #[test]
    fn test_manifest_line_quotes_and_normalizes() {
        assert_eq!(
            manifest_line(Path::new("/tmp/work/000.mp3")),
            "file '/tmp/work/000.mp3'"
        );
    }
}
