/// One ordered slice of a merge plan: extract `[start_ms, end_ms]` from the
/// referenced source and place it at position `sequence_index` in the
/// assembled output. The sequence order is the whole contract; the order
/// entries happen to arrive in is irrelevant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergePlanEntry {
    pub source_file_id: i64,
    pub start_ms: u64,
    pub end_ms: u64,
    pub sequence_index: u32,
}

impl MergePlanEntry {
    pub fn new(source_file_id: i64, start_ms: u64, end_ms: u64, sequence_index: u32) -> Self {
        Self {
            source_file_id,
            start_ms,
            end_ms,
            sequence_index,
        }
    }
}

/// Entries sorted by `sequence_index`, ready to extract in playback order.
pub fn in_sequence_order(entries: &[MergePlanEntry]) -> Vec<MergePlanEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by_key(|e| e.sequence_index);
    ordered
}
