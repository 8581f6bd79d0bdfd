use std::sync::LazyLock;

use regex::Regex;

use crate::shared::constants::TRANSCRIPT_MARKER;
use crate::transcription::domain::transcript_segment::TranscriptSegment;

/// Matches one normalized transcript line. Hour/minute/second fields may be
/// 1-2 digits and milliseconds 1-3 digits; the engine does not reliably
/// zero-pad.
static TAGGED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{}\s*\[(\d{{1,2}}):(\d{{1,2}}):(\d{{1,2}})\.(\d{{1,3}})\s*-->\s*(\d{{1,2}}):(\d{{1,2}}):(\d{{1,2}})\.(\d{{1,3}})\]\s*(.*)",
        regex::escape(TRANSCRIPT_MARKER)
    ))
    .expect("valid regex")
});

/// Converts internal tagged lines into [`TranscriptSegment`]s.
///
/// Total over arbitrary input: when no line matches the timestamp pattern
/// it degrades to marker-line concatenation, then to the whole input as a
/// single untimed segment, so content is never silently dropped.
pub struct SegmentParser;

impl SegmentParser {
    pub fn parse(lines: &[String], file_id: i64) -> Vec<TranscriptSegment> {
        let timed = parse_timed_lines(lines, file_id);
        if !timed.is_empty() {
            return timed;
        }

        log::warn!("no timestamped lines found, falling back to plain text");
        if let Some(segment) = marker_fallback(lines, file_id) {
            return vec![segment];
        }
        whole_file_fallback(lines, file_id).into_iter().collect()
    }
}

fn parse_timed_lines(lines: &[String], file_id: i64) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    for line in lines {
        let Some(caps) = TAGGED_LINE_RE.captures(line) else {
            continue;
        };
        let start_ms = timestamp_ms(&caps, 1);
        let end_ms = timestamp_ms(&caps, 5);
        let text = caps[9].trim();
        if text.is_empty() {
            continue;
        }
        segments.push(TranscriptSegment::new(file_id, start_ms, end_ms, text));
    }
    segments
}

/// Capture groups `first..first+3` are hours, minutes, seconds, millis.
/// The pattern bounds each field, so the numeric parses cannot fail.
fn timestamp_ms(caps: &regex::Captures<'_>, first: usize) -> u64 {
    let field = |idx: usize| caps[first + idx].parse::<u64>().unwrap_or(0);
    ((field(0) * 60 + field(1)) * 60 + field(2)) * 1000 + field(3)
}

/// Tier 1: join text found after the marker token on any line.
fn marker_fallback(lines: &[String], file_id: i64) -> Option<TranscriptSegment> {
    let parts: Vec<&str> = lines
        .iter()
        .filter_map(|line| {
            let idx = line.find(TRANSCRIPT_MARKER)?;
            let text = line[idx + TRANSCRIPT_MARKER.len()..].trim();
            (!text.is_empty()).then_some(text)
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(TranscriptSegment::new(file_id, 0, 0, parts.join(" ")))
}

/// Tier 2: the entire input as one untimed segment.
fn whole_file_fallback(lines: &[String], file_id: i64) -> Option<TranscriptSegment> {
    let joined = lines.join(" ");
    let text = joined.trim();
    if text.is_empty() {
        return None;
    }
    Some(TranscriptSegment::new(file_id, 0, 0, text))
}
