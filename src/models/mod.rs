// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod abstraction;
pub mod chapter;
pub mod file_index;

pub use abstraction::Abstraction;
pub use chapter::TutorialChapter;
pub use file_index::{FileIndex, SourceFile};
