use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::constants::DEFAULT_TRANSCRIBE_TIMEOUT;
use crate::transcription::domain::language::LanguageCode;
use crate::transcription::TranscribeError;

/// Configuration for the external speech-recognition engine.
///
/// Built once at startup and passed into each pipeline run; there is no
/// lazily constructed shared instance. Construction verifies that the
/// engine binary and both model files actually exist, so a misconfigured
/// installation fails before any audio is touched.
#[derive(Debug, Clone)]
pub struct WhisperEngine {
    cli_path: PathBuf,
    english_model: PathBuf,
    multilingual_model: PathBuf,
    timeout: Duration,
}

impl WhisperEngine {
    pub fn new(
        cli_path: PathBuf,
        english_model: PathBuf,
        multilingual_model: PathBuf,
    ) -> Result<Self, TranscribeError> {
        for required in [&cli_path, &english_model, &multilingual_model] {
            if !required.is_file() {
                return Err(TranscribeError::EngineNotInitialized {
                    path: required.clone(),
                });
            }
        }
        Ok(Self {
            cli_path,
            english_model,
            multilingual_model,
            timeout: DEFAULT_TRANSCRIBE_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn model_for(&self, language: LanguageCode) -> &Path {
        if language.uses_english_model() {
            &self.english_model
        } else {
            &self.multilingual_model
        }
    }

    /// Arguments for one transcription run.
    ///
    /// Requests both subtitle (`-osrt`) and plain-text (`-otxt`) artifacts
    /// under `output_prefix`; which one the engine actually writes varies by
    /// version. One thread and no GPU keep runs deterministic, `-ml 1`
    /// keeps utterances short enough to re-bucket meaningfully.
    ///
    /// Vietnamese deliberately gets the same flag set as every other
    /// language: whisper.cpp's `--no-timestamps` would strip the very
    /// timestamps the downstream parser needs.
    pub fn build_args(
        &self,
        input: &Path,
        output_prefix: &Path,
        language: LanguageCode,
    ) -> Vec<String> {
        let model = self.model_for(language);
        log::info!(
            "transcribing with {} model ({})",
            language.display_name(),
            model.display()
        );
        vec![
            "-m".to_string(),
            model.display().to_string(),
            "-f".to_string(),
            input.display().to_string(),
            "-otxt".to_string(),
            "-of".to_string(),
            output_prefix.display().to_string(),
            "-l".to_string(),
            language.code().to_string(),
            "-osrt".to_string(),
            "-t".to_string(),
            "1".to_string(),
            "-ml".to_string(),
            "1".to_string(),
            "-ng".to_string(),
        ]
    }

    /// Find whichever output artifact the engine produced.
    ///
    /// The subtitle file is preferred because it carries timestamps; the
    /// plain-text file is the degraded fallback. Zero-length artifacts
    /// count as absent.
    pub fn locate_output(output_prefix: &Path) -> Result<OutputArtifact, TranscribeError> {
        let srt = output_prefix.with_extension("srt");
        if is_non_empty_file(&srt) {
            return Ok(OutputArtifact::Subtitles(srt));
        }
        let txt = output_prefix.with_extension("txt");
        if is_non_empty_file(&txt) {
            return Ok(OutputArtifact::PlainText(txt));
        }
        Err(TranscribeError::NoOutputProduced)
    }
}

/// What the engine left behind, in preference order.
#[derive(Debug, PartialEq, Eq)]
pub enum OutputArtifact {
    Subtitles(PathBuf),
    PlainText(PathBuf),
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
