use crate::transcription::domain::transcript_segment::TranscriptSegment;

/// Re-buckets raw segments into coarser ones of roughly `bucket_ms` each.
///
/// Segments are stably sorted by start time, then walked: a segment whose
/// start falls before the open bucket's boundary joins it (text appended,
/// end widened); a segment at or past the boundary closes the bucket and
/// seeds the next one. The upper boundary is exclusive, so a segment
/// starting exactly at `bucket_start + bucket_ms` begins a new bucket.
pub struct SegmentGrouper;

impl SegmentGrouper {
    pub fn group(
        raw_segments: Vec<TranscriptSegment>,
        bucket_ms: u64,
        file_id: i64,
    ) -> Vec<TranscriptSegment> {
        if bucket_ms == 0 || raw_segments.is_empty() {
            return raw_segments;
        }

        let mut sorted = raw_segments;
        sorted.sort_by_key(|s| s.start_ms);

        let mut grouped = Vec::new();
        let mut iter = sorted.into_iter();
        let first = iter.next().expect("non-empty");

        let mut bucket_start = first.start_ms;
        let mut bucket_end_ms = first.end_ms;
        let mut boundary = bucket_start + bucket_ms;
        let mut text = first.text;

        for segment in iter {
            if segment.start_ms < boundary {
                if !segment.text.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&segment.text);
                }
                bucket_end_ms = bucket_end_ms.max(segment.end_ms);
            } else {
                grouped.push(TranscriptSegment::new(
                    file_id,
                    bucket_start,
                    bucket_end_ms,
                    text.trim(),
                ));
                bucket_start = segment.start_ms;
                bucket_end_ms = segment.end_ms;
                boundary = bucket_start + bucket_ms;
                text = segment.text;
            }
        }

        grouped.push(TranscriptSegment::new(
            file_id,
            bucket_start,
            bucket_end_ms,
            text.trim(),
        ));
        grouped
    }
}
