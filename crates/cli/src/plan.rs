use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use audiosplice_core::assembly::domain::merge_plan::MergePlanEntry;
use audiosplice_core::assembly::domain::source_catalog::StaticCatalog;

/// One slice in a JSON merge plan. `sequence` defaults to the entry's
/// position in the file.
#[derive(Deserialize)]
struct PlanEntryDto {
    source: PathBuf,
    start_ms: u64,
    end_ms: u64,
    #[serde(default)]
    sequence: Option<u32>,
}

/// Load a merge plan from a JSON array of `{source, start_ms, end_ms,
/// sequence?}` objects. Sources are assigned ids by first appearance and
/// returned as a catalog alongside the plan entries.
pub fn load_plan(path: &Path) -> Result<(Vec<MergePlanEntry>, StaticCatalog), Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let dtos: Vec<PlanEntryDto> = serde_json::from_str(&raw)?;
    if dtos.is_empty() {
        return Err(format!("merge plan {} contains no entries", path.display()).into());
    }

    let mut ids: HashMap<PathBuf, i64> = HashMap::new();
    let mut sources: HashMap<i64, PathBuf> = HashMap::new();
    let mut entries = Vec::with_capacity(dtos.len());
    for (position, dto) in dtos.into_iter().enumerate() {
        if dto.end_ms <= dto.start_ms {
            return Err(format!(
                "merge plan entry {position}: end_ms {} is not after start_ms {}",
                dto.end_ms, dto.start_ms
            )
            .into());
        }
        let next_id = ids.len() as i64;
        let id = *ids.entry(dto.source.clone()).or_insert(next_id);
        sources.entry(id).or_insert(dto.source);
        let sequence = dto.sequence.unwrap_or(position as u32);
        entries.push(MergePlanEntry::new(id, dto.start_ms, dto.end_ms, sequence));
    }

    Ok((entries, StaticCatalog::new(sources)))
}
