use std::fs;
use std::path::{Path, PathBuf};

use crate::assembly::domain::merge_plan::{in_sequence_order, MergePlanEntry};
use crate::assembly::domain::source_catalog::SourceCatalog;
use crate::assembly::infrastructure::ffmpeg_engine::{manifest_line, FfmpegEngine};
use crate::assembly::MergeError;
use crate::process::command_runner::{CommandRunner, RunOutput};

const MANIFEST_FILENAME: &str = "list.txt";

/// Assembles a new audio file from ordered slices of source recordings.
///
/// Each slice is stream-copied into the run's private temporary directory,
/// renamed to a zero-padded sequence name so lexical order equals playback
/// order, listed in a concat manifest, and concatenated without re-encoding
/// straight to the caller's output path. The temporary directory is removed
/// on every exit path.
pub struct MergeUseCase {
    engine: FfmpegEngine,
    runner: Box<dyn CommandRunner>,
    catalog: Box<dyn SourceCatalog>,
    work_root: PathBuf,
}

impl MergeUseCase {
    pub fn new(
        engine: FfmpegEngine,
        runner: Box<dyn CommandRunner>,
        catalog: Box<dyn SourceCatalog>,
    ) -> Self {
        Self {
            engine,
            runner,
            catalog,
            work_root: std::env::temp_dir(),
        }
    }

    pub fn with_work_root(mut self, root: PathBuf) -> Self {
        self.work_root = root;
        self
    }

    pub fn run(
        &self,
        entries: &[MergePlanEntry],
        output_path: &Path,
    ) -> Result<PathBuf, MergeError> {
        let ordered = in_sequence_order(entries);

        let work_dir = tempfile::Builder::new()
            .prefix("audiosplice_merge_")
            .tempdir_in(&self.work_root)
            .map_err(|e| MergeError::TempIo {
                path: self.work_root.clone(),
                source: e,
            })?;

        let mut manifest_lines = Vec::new();
        for (index, entry) in ordered.iter().enumerate() {
            let clip = self.extract_clip(entry, index, work_dir.path())?;
            manifest_lines.push(manifest_line(&clip));
        }

        let manifest_path = work_dir.path().join(MANIFEST_FILENAME);
        write_manifest(&manifest_path, &manifest_lines)?;

        self.concatenate(&manifest_path, output_path)?;
        Ok(output_path.to_path_buf())
    }

    /// Extract one entry's range into `NNN.<ext>` under the work dir.
    fn extract_clip(
        &self,
        entry: &MergePlanEntry,
        index: usize,
        work_dir: &Path,
    ) -> Result<PathBuf, MergeError> {
        let source = self
            .catalog
            .resolve_source(entry.source_file_id)
            .ok_or(MergeError::SourceNotFound {
                file_id: entry.source_file_id,
            })?;
        log::info!(
            "extracting [{}ms, {}ms] of {} as clip {index}",
            entry.start_ms,
            entry.end_ms,
            source.display()
        );

        // Stream copy needs a like container; mp3 is the default when the
        // source has no usable extension.
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3")
            .to_ascii_lowercase();
        let raw_clip = work_dir.join(format!("clip_{index}.{extension}"));

        let args = self
            .engine
            .extract_args(&source, entry.start_ms, entry.end_ms, &raw_clip);
        let outcome = self
            .runner
            .run(self.engine.ffmpeg_path(), &args, self.engine.extract_timeout())?;
        check_engine_outcome(&outcome, &raw_clip, "extraction")?;

        let ordered_clip = work_dir.join(format!("{index:03}.{extension}"));
        fs::rename(&raw_clip, &ordered_clip).map_err(|e| MergeError::TempIo {
            path: ordered_clip.clone(),
            source: e,
        })?;
        Ok(ordered_clip)
    }

    fn concatenate(&self, manifest_path: &Path, output_path: &Path) -> Result<(), MergeError> {
        let args = self.engine.concat_args(manifest_path, output_path);
        let outcome = self
            .runner
            .run(self.engine.ffmpeg_path(), &args, self.engine.concat_timeout())?;
        check_engine_outcome(&outcome, output_path, "concatenation")?;
        log::info!("merged output written to {}", output_path.display());
        Ok(())
    }
}

fn write_manifest(path: &Path, lines: &[String]) -> Result<(), MergeError> {
    if lines.is_empty() {
        return Err(MergeError::ManifestWriteFailed {
            path: path.to_path_buf(),
            detail: "no clips to concatenate".to_string(),
        });
    }
    let contents = lines.join("\n") + "\n";
    fs::write(path, &contents).map_err(|e| MergeError::ManifestWriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    // A manifest that did not land on disk non-empty would make the engine
    // silently concatenate nothing.
    let written = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(MergeError::ManifestWriteFailed {
            path: path.to_path_buf(),
            detail: "manifest is empty after write".to_string(),
        });
    }
    log::debug!("manifest:\n{contents}");
    Ok(())
}

/// Timeout, non-zero exit, and a missing/empty product all fail the run.
fn check_engine_outcome(
    outcome: &RunOutput,
    product: &Path,
    stage: &str,
) -> Result<(), MergeError> {
    if outcome.timed_out {
        return Err(MergeError::EngineTimeout);
    }
    if !outcome.success() {
        return Err(MergeError::MergeFailed {
            detail: format!("{stage} exited with {:?}", outcome.exit_code),
        });
    }
    let len = fs::metadata(product).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        return Err(MergeError::MergeFailed {
            detail: format!("{stage} produced no output at {}", product.display()),
        });
    }
    Ok(())
}
