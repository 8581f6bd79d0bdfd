use crate::transcription::domain::transcript_segment::TranscriptSegment;

/// Persistence seam for transcript segments.
///
/// The pipeline only reads an existing result set (cache short-circuit),
/// saves a freshly produced one, and deletes stale rows on forced
/// re-analysis. Where segments actually live is the collaborator's concern.
pub trait SegmentStore {
    fn existing_segments(
        &self,
        file_id: i64,
    ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>>;

    /// Returns the number of segments written.
    fn save_segments(
        &self,
        segments: &[TranscriptSegment],
    ) -> Result<usize, Box<dyn std::error::Error>>;

    /// Returns the number of segments removed.
    fn delete_segments(&self, file_id: i64) -> Result<usize, Box<dyn std::error::Error>>;
}

/// Store that persists nothing. Every lookup is a miss.
pub struct NullSegmentStore;

impl SegmentStore for NullSegmentStore {
    fn existing_segments(
        &self,
        _file_id: i64,
    ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }

    fn save_segments(
        &self,
        segments: &[TranscriptSegment],
    ) -> Result<usize, Box<dyn std::error::Error>> {
        Ok(segments.len())
    }

    fn delete_segments(&self, _file_id: i64) -> Result<usize, Box<dyn std::error::Error>> {
        Ok(0)
    }
}
