use std::fs;
use std::path::{Path, PathBuf};

use crate::process::command_runner::CommandRunner;
use crate::shared::constants::AUDIO_EXTENSIONS;
use crate::transcription::domain::language::LanguageCode;
use crate::transcription::domain::segment_grouper::SegmentGrouper;
use crate::transcription::domain::segment_parser::SegmentParser;
use crate::transcription::domain::segment_store::SegmentStore;
use crate::transcription::domain::subtitle_normalizer::SubtitleNormalizer;
use crate::transcription::domain::transcript_segment::TranscriptSegment;
use crate::transcription::infrastructure::encoded_file_reader::EncodedFileReader;
use crate::transcription::infrastructure::whisper_engine::{OutputArtifact, WhisperEngine};
use crate::transcription::TranscribeError;

/// Parameters for one transcription run. Everything is explicit; nothing
/// is read from shared mutable state.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub file_id: i64,
    pub audio_path: PathBuf,
    pub language: LanguageCode,
    /// Re-analyze even when stored segments already exist (stale rows are
    /// deleted first).
    pub force: bool,
    /// Target bucket duration for re-grouping; `0` passes raw segments
    /// through unchanged.
    pub bucket_ms: u64,
}

/// End-to-end transcription driver.
///
/// Validates the input, short-circuits on a cached result, invokes the
/// speech engine in a private temporary directory, decodes and parses
/// whichever artifact it produced, re-buckets, and persists. Every failure
/// comes back as a [`TranscribeError`]; the temporary directory is removed
/// on every exit path.
pub struct TranscribeUseCase {
    engine: WhisperEngine,
    runner: Box<dyn CommandRunner>,
    store: Box<dyn SegmentStore>,
    work_root: PathBuf,
}

impl TranscribeUseCase {
    pub fn new(
        engine: WhisperEngine,
        runner: Box<dyn CommandRunner>,
        store: Box<dyn SegmentStore>,
    ) -> Self {
        Self {
            engine,
            runner,
            store,
            work_root: std::env::temp_dir(),
        }
    }

    /// Place per-run working directories under `root` instead of the system
    /// temp directory.
    pub fn with_work_root(mut self, root: PathBuf) -> Self {
        self.work_root = root;
        self
    }

    pub fn run(
        &self,
        request: &TranscribeRequest,
    ) -> Result<Vec<TranscriptSegment>, TranscribeError> {
        validate_input(&request.audio_path)?;

        if request.force {
            let deleted = self
                .store
                .delete_segments(request.file_id)
                .map_err(|e| TranscribeError::Store(e.to_string()))?;
            if deleted > 0 {
                log::info!("deleted {deleted} stale segments for file {}", request.file_id);
            }
        } else {
            let existing = self
                .store
                .existing_segments(request.file_id)
                .map_err(|e| TranscribeError::Store(e.to_string()))?;
            if !existing.is_empty() {
                log::info!(
                    "returning {} stored segments for file {}",
                    existing.len(),
                    request.file_id
                );
                return Ok(existing);
            }
        }

        // Private namespace for this run; dropped (and deleted) on every
        // return path below.
        let work_dir = tempfile::Builder::new()
            .prefix("audiosplice_")
            .tempdir_in(&self.work_root)
            .map_err(|e| TranscribeError::TempIo {
                path: self.work_root.clone(),
                source: e,
            })?;

        let input = ascii_safe_input(&request.audio_path, work_dir.path())?;
        let output_prefix = work_dir.path().join("output");
        let args = self
            .engine
            .build_args(&input, &output_prefix, request.language);

        let outcome = self
            .runner
            .run(self.engine.cli_path(), &args, self.engine.timeout())?;
        if outcome.timed_out {
            // Whatever partial artifact exists dies with the work dir.
            return Err(TranscribeError::EngineTimeout);
        }
        if !outcome.success() {
            // A non-zero exit is not fatal by itself; the artifact check
            // below decides.
            log::warn!("speech engine exited with {:?}", outcome.exit_code);
        }

        let artifact = WhisperEngine::locate_output(&output_prefix)?;
        let segments = parse_artifact(&artifact, request)?;

        if !segments.is_empty() {
            let saved = self
                .store
                .save_segments(&segments)
                .map_err(|e| TranscribeError::Store(e.to_string()))?;
            log::info!("saved {saved} segments for file {}", request.file_id);
        }
        Ok(segments)
    }
}

fn parse_artifact(
    artifact: &OutputArtifact,
    request: &TranscribeRequest,
) -> Result<Vec<TranscriptSegment>, TranscribeError> {
    let path = match artifact {
        OutputArtifact::Subtitles(p) | OutputArtifact::PlainText(p) => p,
    };
    let decoded = EncodedFileReader::read_lines(path).map_err(|e| TranscribeError::TempIo {
        path: path.clone(),
        source: e,
    })?;

    let lines = match artifact {
        OutputArtifact::Subtitles(_) => SubtitleNormalizer::normalize(&decoded.lines),
        OutputArtifact::PlainText(_) => decoded.lines,
    };

    let raw = SegmentParser::parse(&lines, request.file_id);
    log::debug!("parsed {} raw segments", raw.len());
    Ok(SegmentGrouper::group(raw, request.bucket_ms, request.file_id))
}

fn validate_input(path: &Path) -> Result<(), TranscribeError> {
    if fs::File::open(path).is_err() {
        return Err(TranscribeError::UnreadableInput {
            path: path.to_path_buf(),
        });
    }
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(TranscribeError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// The engine mishandles non-ASCII paths on some platforms, so such inputs
/// are first copied to an ASCII-named file inside the run's working
/// directory (which is removed with it).
fn ascii_safe_input(audio_path: &Path, work_dir: &Path) -> Result<PathBuf, TranscribeError> {
    let absolute = std::path::absolute(audio_path).map_err(|e| TranscribeError::TempIo {
        path: audio_path.to_path_buf(),
        source: e,
    })?;
    if absolute.to_string_lossy().is_ascii() {
        return Ok(absolute);
    }

    let extension = absolute
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    let safe = work_dir.join(format!("input.{extension}"));
    fs::copy(&absolute, &safe).map_err(|e| TranscribeError::TempIo {
        path: safe.clone(),
        source: e,
    })?;
    log::debug!("copied non-ASCII path to {}", safe.display());
    Ok(safe)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::process::command_runner::{ProcessError, RunOutput};
    use crate::transcription::domain::segment_store::NullSegmentStore;

    // ─── Stubs ───

    struct StubRunner {
        exit_code: Option<i32>,
        timed_out: bool,
        srt: Option<&'static str>,
        txt: Option<&'static str>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl StubRunner {
        fn with_srt(srt: &'static str) -> Self {
            Self {
                exit_code: Some(0),
                timed_out: false,
                srt: Some(srt),
                txt: None,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl CommandRunner for StubRunner {
        fn run(
            &self,
            _program: &Path,
            args: &[String],
            _timeout: Duration,
        ) -> Result<RunOutput, ProcessError> {
            self.calls.lock().unwrap().push(args.to_vec());
            if let Some(pos) = args.iter().position(|a| a == "-of") {
                let prefix = PathBuf::from(&args[pos + 1]);
                if let Some(content) = self.srt {
                    fs::write(prefix.with_extension("srt"), content).unwrap();
                }
                if let Some(content) = self.txt {
                    fs::write(prefix.with_extension("txt"), content).unwrap();
                }
            }
            Ok(RunOutput {
                exit_code: self.exit_code,
                lines: Vec::new(),
                timed_out: self.timed_out,
            })
        }
    }

    struct RecordingStore {
        existing: Vec<TranscriptSegment>,
        saved: Arc<Mutex<Vec<TranscriptSegment>>>,
        deleted: Arc<Mutex<Vec<i64>>>,
    }

    impl RecordingStore {
        fn empty() -> Self {
            Self {
                existing: Vec::new(),
                saved: Arc::new(Mutex::new(Vec::new())),
                deleted: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SegmentStore for RecordingStore {
        fn existing_segments(
            &self,
            _file_id: i64,
        ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>> {
            Ok(self.existing.clone())
        }

        fn save_segments(
            &self,
            segments: &[TranscriptSegment],
        ) -> Result<usize, Box<dyn std::error::Error>> {
            self.saved.lock().unwrap().extend_from_slice(segments);
            Ok(segments.len())
        }

        fn delete_segments(&self, file_id: i64) -> Result<usize, Box<dyn std::error::Error>> {
            self.deleted.lock().unwrap().push(file_id);
            Ok(1)
        }
    }

    // ─── Fixtures ───

    struct Fixture {
        _tmp: TempDir,
        engine: WhisperEngine,
        audio: PathBuf,
        work_root: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let cli = tmp.path().join("whisper-cli");
        let en = tmp.path().join("ggml-tiny.en.bin");
        let multi = tmp.path().join("ggml-base-q8_0.bin");
        for p in [&cli, &en, &multi] {
            fs::write(p, b"x").unwrap();
        }
        let audio = tmp.path().join("input.wav");
        fs::write(&audio, b"RIFF").unwrap();
        let work_root = tmp.path().join("work");
        fs::create_dir_all(&work_root).unwrap();
        Fixture {
            engine: WhisperEngine::new(cli, en, multi).unwrap(),
            audio,
            work_root,
            _tmp: tmp,
        }
    }

    fn request(fx: &Fixture) -> TranscribeRequest {
        TranscribeRequest {
            file_id: 42,
            audio_path: fx.audio.clone(),
            language: LanguageCode::Auto,
            force: false,
            bucket_ms: 0,
        }
    }

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,500\nhello world\n\n2\n00:00:03,000 --> 00:00:04,000\nsecond line\n\n";

    // ─── Tests ───

    #[test]
    fn test_srt_artifact_end_to_end() {
        let fx = fixture();
        let store = RecordingStore::empty();
        let saved = store.saved.clone();
        let uc = TranscribeUseCase::new(
            fx.engine.clone(),
            Box::new(StubRunner::with_srt(SRT)),
            Box::new(store),
        )
        .with_work_root(fx.work_root.clone());

        let segments = uc.run(&request(&fx)).unwrap();
        assert_eq!(
            segments,
            vec![
                TranscriptSegment::new(42, 1_000, 2_500, "hello world"),
                TranscriptSegment::new(42, 3_000, 4_000, "second line"),
            ]
        );
        assert_eq!(*saved.lock().unwrap(), segments);
    }

    #[test]
    fn test_grouping_applied_when_requested() {
        let fx = fixture();
        let uc = TranscribeUseCase::new(
            fx.engine.clone(),
            Box::new(StubRunner::with_srt(SRT)),
            Box::new(NullSegmentStore),
        )
        .with_work_root(fx.work_root.clone());

        let mut req = request(&fx);
        req.bucket_ms = 10_000;
        let segments = uc.run(&req).unwrap();
        assert_eq!(
            segments,
            vec![TranscriptSegment::new(
                42,
                1_000,
                4_000,
                "hello world second line"
            )]
        );
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let fx = fixture();
        let doc = fx.audio.with_extension("pdf");
        fs::write(&doc, b"%PDF").unwrap();
        let uc = TranscribeUseCase::new(
            fx.engine.clone(),
            Box::new(StubRunner::with_srt(SRT)),
            Box::new(NullSegmentStore),
        );
        let mut req = request(&fx);
        req.audio_path = doc;
        assert!(matches!(
            uc.run(&req),
            Err(TranscribeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        let fx = fixture();
        let uc = TranscribeUseCase::new(
            fx.engine.clone(),
            Box::new(StubRunner::with_srt(SRT)),
            Box::new(NullSegmentStore),
        );
        let mut req = request(&fx);
        req.audio_path = fx.audio.with_file_name("missing.wav");
        assert!(matches!(
            uc.run(&req),
            Err(TranscribeError::UnreadableInput { .. })
        ));
    }

    #[test]
    fn test_cached_result_short_circuits_engine() {
        let fx = fixture();
        let cached = vec![TranscriptSegment::new(42, 0, 100, "cached")];
        let store = RecordingStore {
            existing: cached.clone(),
            ..RecordingStore::empty()
        };
        let runner = StubRunner::with_srt(SRT);
        let calls = runner.calls.clone();
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(store))
            .with_work_root(fx.work_root.clone());

        let segments = uc.run(&request(&fx)).unwrap();
        assert_eq!(segments, cached);
        assert!(calls.lock().unwrap().is_empty(), "engine must not run");
    }

    #[test]
    fn test_force_deletes_and_reanalyzes() {
        let fx = fixture();
        let store = RecordingStore {
            existing: vec![TranscriptSegment::new(42, 0, 100, "stale")],
            ..RecordingStore::empty()
        };
        let deleted = store.deleted.clone();
        let runner = StubRunner::with_srt(SRT);
        let calls = runner.calls.clone();
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(store))
            .with_work_root(fx.work_root.clone());

        let mut req = request(&fx);
        req.force = true;
        let segments = uc.run(&req).unwrap();
        assert_eq!(*deleted.lock().unwrap(), vec![42]);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_timeout_ignores_partial_artifact_and_cleans_up() {
        let fx = fixture();
        let runner = StubRunner {
            timed_out: true,
            exit_code: None,
            ..StubRunner::with_srt(SRT)
        };
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(NullSegmentStore))
            .with_work_root(fx.work_root.clone());

        assert!(matches!(
            uc.run(&request(&fx)),
            Err(TranscribeError::EngineTimeout)
        ));
        assert_eq!(
            fs::read_dir(&fx.work_root).unwrap().count(),
            0,
            "work dir must be removed"
        );
    }

    #[test]
    fn test_nonzero_exit_with_artifact_still_succeeds() {
        let fx = fixture();
        let runner = StubRunner {
            exit_code: Some(2),
            ..StubRunner::with_srt(SRT)
        };
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(NullSegmentStore))
            .with_work_root(fx.work_root.clone());

        assert_eq!(uc.run(&request(&fx)).unwrap().len(), 2);
    }

    #[test]
    fn test_no_artifact_fails_and_cleans_up() {
        let fx = fixture();
        let runner = StubRunner {
            srt: None,
            txt: None,
            ..StubRunner::with_srt(SRT)
        };
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(NullSegmentStore))
            .with_work_root(fx.work_root.clone());

        assert!(matches!(
            uc.run(&request(&fx)),
            Err(TranscribeError::NoOutputProduced)
        ));
        assert_eq!(fs::read_dir(&fx.work_root).unwrap().count(), 0);
    }

    #[test]
    fn test_plain_text_artifact_becomes_single_segment() {
        let fx = fixture();
        let runner = StubRunner {
            srt: None,
            txt: Some("just a plain transcript\n"),
            ..StubRunner::with_srt(SRT)
        };
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(NullSegmentStore))
            .with_work_root(fx.work_root.clone());

        let segments = uc.run(&request(&fx)).unwrap();
        assert_eq!(
            segments,
            vec![TranscriptSegment::new(42, 0, 0, "just a plain transcript")]
        );
    }

    #[test]
    fn test_non_ascii_path_copied_before_invocation() {
        let fx = fixture();
        let viet = fx.audio.with_file_name("bài hát.wav");
        fs::copy(&fx.audio, &viet).unwrap();
        let runner = StubRunner::with_srt(SRT);
        let calls = runner.calls.clone();
        let uc = TranscribeUseCase::new(fx.engine.clone(), Box::new(runner), Box::new(NullSegmentStore))
            .with_work_root(fx.work_root.clone());

        let mut req = request(&fx);
        req.audio_path = viet;
        uc.run(&req).unwrap();

        let calls = calls.lock().unwrap();
        let args = &calls[0];
        let input = &args[args.iter().position(|a| a == "-f").unwrap() + 1];
        assert!(input.is_ascii(), "engine got non-ASCII path: {input}");
        // The copy lived inside the (now removed) work dir.
        assert_eq!(fs::read_dir(&fx.work_root).unwrap().count(), 0);
    }
}
