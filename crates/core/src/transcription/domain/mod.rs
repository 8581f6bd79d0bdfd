pub mod language;
pub mod segment_grouper;
pub mod segment_parser;
pub mod segment_store;
pub mod subtitle_normalizer;
pub mod transcript_segment;
