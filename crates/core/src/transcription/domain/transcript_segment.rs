/// One time-coded utterance of a transcript.
///
/// Invariant: `end_ms >= start_ms`. Instances are transient pipeline state;
/// a [`SegmentStore`](super::segment_store::SegmentStore) collaborator may
/// persist them, the pipeline itself keeps nothing between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub file_id: i64,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(file_id: i64, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        let end_ms = end_ms.max(start_ms);
        Self {
            file_id,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let seg = TranscriptSegment::new(1, 1_000, 2_500, "hello");
        assert_eq!(seg.duration_ms(), 1_500);
    }

    #[test]
    fn test_end_clamped_to_start() {
        let seg = TranscriptSegment::new(1, 2_000, 1_000, "backwards");
        assert_eq!(seg.start_ms, 2_000);
        assert_eq!(seg.end_ms, 2_000);
        assert_eq!(seg.duration_ms(), 0);
    }
}
