// file: src/parser/mod.rs
// description: structured model-response parsing module exports
// reference: internal module structure

pub mod repair;
pub mod structured_block;

pub use repair::{REPAIR_RULES, RepairRule, repair_block};
pub use structured_block::{DEFAULT_LABEL, RawRecord, StructuredBlockParser};
