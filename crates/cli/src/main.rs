use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use audiosplice_core::assembly::infrastructure::ffmpeg_engine::FfmpegEngine;
use audiosplice_core::pipeline::merge_use_case::MergeUseCase;
use audiosplice_core::pipeline::transcribe_use_case::{TranscribeRequest, TranscribeUseCase};
use audiosplice_core::process::os_runner::OsCommandRunner;
use audiosplice_core::shared::constants::{
    ENGLISH_MODEL_FILENAME, MULTILINGUAL_MODEL_FILENAME,
};
use audiosplice_core::shared::time::format_millis;
use audiosplice_core::transcription::domain::language::LanguageCode;
use audiosplice_core::transcription::domain::segment_store::{NullSegmentStore, SegmentStore};
use audiosplice_core::transcription::infrastructure::whisper_engine::WhisperEngine;

mod plan;
mod store;

use store::JsonSegmentStore;

/// Speech-to-text transcription and timed segment assembly for audio files.
#[derive(Parser)]
#[command(name = "audiosplice")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe an audio file into timestamped text segments.
    Transcribe {
        /// Input audio file (wav, mp3, flac, ogg or m4a).
        input: PathBuf,

        /// Spoken language: auto, en, vi or ja.
        #[arg(long, default_value = "auto")]
        language: String,

        /// Re-bucket segments to this duration in seconds (0 = keep the
        /// engine's own segmentation).
        #[arg(long, default_value = "0")]
        segment_seconds: u64,

        /// Discard stored segments and re-run the engine.
        #[arg(long)]
        force: bool,

        /// Path to the whisper-cli executable.
        #[arg(long, default_value = "lib/whisper-cli")]
        engine: PathBuf,

        /// Directory holding the speech models.
        #[arg(long, default_value = "models")]
        models: PathBuf,

        /// Directory for per-file segment JSON (omit to skip persistence).
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Identifier the segments are stored under.
        #[arg(long, default_value = "0")]
        file_id: i64,
    },

    /// Cut ranges out of source recordings and concatenate them.
    Merge {
        /// JSON merge plan: an array of {source, start_ms, end_ms, sequence?}.
        plan: PathBuf,

        /// Assembled output file.
        output: PathBuf,

        /// Path to (or command name of) the ffmpeg executable.
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: PathBuf,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Transcribe {
            input,
            language,
            segment_seconds,
            force,
            engine,
            models,
            store_dir,
            file_id,
        } => run_transcribe(
            &input,
            &language,
            segment_seconds,
            force,
            &engine,
            &models,
            store_dir,
            file_id,
        ),
        Command::Merge {
            plan,
            output,
            ffmpeg,
        } => run_merge(&plan, &output, &ffmpeg),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_transcribe(
    input: &Path,
    language: &str,
    segment_seconds: u64,
    force: bool,
    engine_path: &Path,
    models: &Path,
    store_dir: Option<PathBuf>,
    file_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let language = LanguageCode::from_str(language)?;
    let engine = WhisperEngine::new(
        engine_path.to_path_buf(),
        models.join(ENGLISH_MODEL_FILENAME),
        models.join(MULTILINGUAL_MODEL_FILENAME),
    )?;

    let store: Box<dyn SegmentStore> = match store_dir {
        Some(dir) => Box::new(JsonSegmentStore::new(dir)?),
        None => Box::new(NullSegmentStore),
    };

    let use_case = TranscribeUseCase::new(engine, Box::new(OsCommandRunner::new()), store);
    let request = TranscribeRequest {
        file_id,
        audio_path: input.to_path_buf(),
        language,
        force,
        bucket_ms: segment_seconds * 1000,
    };

    let segments = use_case.run(&request)?;
    log::info!(
        "transcribed {} into {} segments",
        input.display(),
        segments.len()
    );
    for segment in &segments {
        println!(
            "[{} --> {}] {}",
            format_millis(segment.start_ms),
            format_millis(segment.end_ms),
            segment.text
        );
    }
    Ok(())
}

fn run_merge(
    plan_path: &Path,
    output: &Path,
    ffmpeg: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (entries, catalog) = plan::load_plan(plan_path)?;

    // An explicit path gets an existence probe; a bare command name is
    // resolved by the OS at spawn time.
    let engine = if ffmpeg.components().count() > 1 {
        FfmpegEngine::new(ffmpeg.to_path_buf())?
    } else {
        FfmpegEngine::from_command_name(ffmpeg)
    };

    let use_case = MergeUseCase::new(engine, Box::new(OsCommandRunner::new()), Box::new(catalog));
    let merged = use_case.run(&entries, output)?;
    log::info!("assembled {} clips into {}", entries.len(), merged.display());
    println!("{}", merged.display());
    Ok(())
}
