use std::fs;
use std::io;
use std::path::Path;

/// Encoding actually used to decode an engine output file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Byte-preserving fallback: every byte maps to the code point of the
    /// same value, so nothing is lost even if the result is not readable.
    Latin1,
}

#[derive(Debug)]
pub struct DecodedText {
    pub lines: Vec<String>,
    pub encoding: TextEncoding,
}

/// Reads a whole file and decodes it defensively.
///
/// The speech engine's output encoding is not trustworthy, so the file is
/// read as raw bytes first, decoded as strict UTF-8, and re-decoded as
/// Latin-1 when that fails. Lines are split on both `\r\n` and `\n`.
pub struct EncodedFileReader;

impl EncodedFileReader {
    pub fn read_lines(path: &Path) -> io::Result<DecodedText> {
        let bytes = fs::read(path)?;
        let (text, encoding) = decode(&bytes);
        log::debug!(
            "decoded {} ({} bytes) as {encoding:?}",
            path.display(),
            bytes.len()
        );
        Ok(DecodedText {
            lines: split_lines(&text),
            encoding,
        })
    }
}

fn decode(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Latin1,
        ),
    }
}

/// Split on `\r?\n`, dropping trailing empty lines (but keeping interior
/// ones, which the subtitle format uses as block separators).
fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
