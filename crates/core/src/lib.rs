pub mod assembly;
pub mod pipeline;
pub mod process;
pub mod shared;
pub mod transcription;
