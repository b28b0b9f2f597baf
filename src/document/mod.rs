// file: src/document/mod.rs
// description: pdf document module exports
// reference: internal module structure

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{PdfSource, TextExtractor};
