// file: src/exporter/mod.rs
// description: exporter module exports
// reference: chapter listing and archive packaging

pub mod bundle;
pub mod catalog;

pub use bundle::BundleExporter;
pub use catalog::{CatalogEntry, ChapterCatalog};
