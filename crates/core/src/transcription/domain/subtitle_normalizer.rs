use crate::shared::constants::TRANSCRIPT_MARKER;

const TIMESTAMP_SEPARATOR: &str = "-->";

/// Converts subtitle-format engine output into the pipeline's internal
/// tagged line format.
///
/// A subtitle block is a sequence-number line, a
/// `HH:MM:SS,mmm --> HH:MM:SS,mmm` timestamp line, one or more text lines,
/// and a blank separator. Each block becomes one line:
///
/// ```text
/// [Whisper] [HH:MM:SS.mmm --> HH:MM:SS.mmm] joined text
/// ```
///
/// Comma fractional separators become periods. A malformed timestamp line
/// drops only its own block; blocks with no text are dropped; anything else
/// at the top level is skipped.
pub struct SubtitleNormalizer;

enum State {
    ExpectSequenceNumber,
    ExpectTimestamp,
    CollectingText {
        timestamp: String,
        text_parts: Vec<String>,
    },
}

impl SubtitleNormalizer {
    pub fn normalize(lines: &[String]) -> Vec<String> {
        let mut output = Vec::new();
        let mut state = State::ExpectSequenceNumber;

        for line in lines {
            let line = line.trim();
            state = match state {
                State::ExpectSequenceNumber => {
                    if is_sequence_number(line) {
                        State::ExpectTimestamp
                    } else {
                        State::ExpectSequenceNumber
                    }
                }
                State::ExpectTimestamp => {
                    if line.contains(TIMESTAMP_SEPARATOR) {
                        State::CollectingText {
                            timestamp: line.replace(',', "."),
                            text_parts: Vec::new(),
                        }
                    } else {
                        // Malformed block; abandon it and keep scanning.
                        log::debug!("skipping non-timestamp line: {line}");
                        State::ExpectSequenceNumber
                    }
                }
                State::CollectingText {
                    timestamp,
                    mut text_parts,
                } => {
                    if line.is_empty() {
                        emit_block(&mut output, &timestamp, &text_parts);
                        State::ExpectSequenceNumber
                    } else {
                        text_parts.push(line.to_string());
                        State::CollectingText {
                            timestamp,
                            text_parts,
                        }
                    }
                }
            };
        }

        // Input may end without a trailing blank line.
        if let State::CollectingText {
            timestamp,
            text_parts,
        } = state
        {
            emit_block(&mut output, &timestamp, &text_parts);
        }

        output
    }
}

fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

fn emit_block(output: &mut Vec<String>, timestamp: &str, text_parts: &[String]) {
    if text_parts.is_empty() {
        return;
    }
    output.push(format!(
        "{TRANSCRIPT_MARKER} [{timestamp}] {}",
        text_parts.join(" ")
    ));
}
