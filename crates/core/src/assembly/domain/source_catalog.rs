use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a merge entry's opaque source reference to an on-disk path.
/// Backed by whatever catalog the surrounding application keeps.
pub trait SourceCatalog {
    fn resolve_source(&self, file_id: i64) -> Option<PathBuf>;
}

/// Fixed in-memory catalog, useful for CLIs and tests.
pub struct StaticCatalog {
    sources: HashMap<i64, PathBuf>,
}

impl StaticCatalog {
    pub fn new(sources: HashMap<i64, PathBuf>) -> Self {
        Self { sources }
    }
}

impl SourceCatalog for StaticCatalog {
    fn resolve_source(&self, file_id: i64) -> Option<PathBuf> {
        self.sources.get(&file_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new(HashMap::from([(3, PathBuf::from("/audio/a.mp3"))]));
        assert_eq!(catalog.resolve_source(3), Some(PathBuf::from("/audio/a.mp3")));
        assert_eq!(catalog.resolve_source(4), None);
    }
}
