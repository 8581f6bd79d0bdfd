use std::time::Duration;

/// Audio container extensions the speech engine accepts.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a"];

/// Tag prepended to every normalized transcript line so the parser can
/// distinguish pipeline output from stray engine chatter.
pub const TRANSCRIPT_MARKER: &str = "[Whisper]";

pub const ENGLISH_MODEL_FILENAME: &str = "ggml-tiny.en.bin";
pub const MULTILINGUAL_MODEL_FILENAME: &str = "ggml-base-q8_0.bin";

/// Upper bound on one speech-engine invocation. Long recordings take
/// minutes per invocation on CPU, so this is deliberately generous.
pub const DEFAULT_TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Stream-copy range extraction is near-instant; anything slower is stuck.
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_CONCAT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
