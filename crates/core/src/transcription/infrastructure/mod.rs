pub mod encoded_file_reader;
pub mod whisper_engine;
