pub mod merge_plan;
pub mod source_catalog;
