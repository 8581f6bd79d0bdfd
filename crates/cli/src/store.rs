use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use audiosplice_core::transcription::domain::segment_store::SegmentStore;
use audiosplice_core::transcription::domain::transcript_segment::TranscriptSegment;

#[derive(Serialize, Deserialize)]
struct SegmentDto {
    file_id: i64,
    start_ms: u64,
    end_ms: u64,
    text: String,
}

impl From<&TranscriptSegment> for SegmentDto {
    fn from(seg: &TranscriptSegment) -> Self {
        Self {
            file_id: seg.file_id,
            start_ms: seg.start_ms,
            end_ms: seg.end_ms,
            text: seg.text.clone(),
        }
    }
}

impl From<SegmentDto> for TranscriptSegment {
    fn from(dto: SegmentDto) -> Self {
        TranscriptSegment::new(dto.file_id, dto.start_ms, dto.end_ms, dto.text)
    }
}

/// Sidecar-file segment store: one JSON file per audio file id.
///
/// Stands in for the relational store the surrounding application would
/// provide, so the cache and force-reanalyze paths behave the same from
/// the command line.
pub struct JsonSegmentStore {
    dir: PathBuf,
}

impl JsonSegmentStore {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, file_id: i64) -> PathBuf {
        self.dir.join(format!("segments_{file_id}.json"))
    }
}

impl SegmentStore for JsonSegmentStore {
    fn existing_segments(
        &self,
        file_id: i64,
    ) -> Result<Vec<TranscriptSegment>, Box<dyn std::error::Error>> {
        let path = self.path_for(file_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        let dtos: Vec<SegmentDto> = serde_json::from_str(&raw)?;
        Ok(dtos.into_iter().map(TranscriptSegment::from).collect())
    }

    fn save_segments(
        &self,
        segments: &[TranscriptSegment],
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let Some(file_id) = segments.first().map(|s| s.file_id) else {
            return Ok(0);
        };
        let dtos: Vec<SegmentDto> = segments.iter().map(SegmentDto::from).collect();
        fs::write(self.path_for(file_id), serde_json::to_string_pretty(&dtos)?)?;
        Ok(segments.len())
    }

    fn delete_segments(&self, file_id: i64) -> Result<usize, Box<dyn std::error::Error>> {
        let path = self.path_for(file_id);
        if !path.exists() {
            return Ok(0);
        }
        let count = self.existing_segments(file_id).map(|s| s.len()).unwrap_or(0);
        fs::remove_file(&path)?;
        Ok(count)
    }
}
