// file: src/document/extractor.rs
// description: pdf page text extraction via lopdf
// reference: https://docs.rs/lopdf

use crate::error::{Result, RhymeError};
use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where PDF bytes come from: a file on disk or an already loaded upload.
#[derive(Debug, Clone)]
pub enum PdfSource {
    Path(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl PdfSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        PdfSource::Path(path.into())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|source| RhymeError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(PdfSource::Bytes {
            name: path.display().to_string(),
            data,
        })
    }

    pub fn name(&self) -> String {
        match self {
            PdfSource::Path(path) => path.display().to_string(),
            PdfSource::Bytes { name, .. } => name.clone(),
        }
    }
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page in page-number order, concatenated without a separator.
    pub fn extract(&self, source: &PdfSource) -> Result<String> {
        let document = match source {
            PdfSource::Path(path) => Document::load(path)?,
            PdfSource::Bytes { data, .. } => Document::load_mem(data)?,
        };

        self.extract_document(&document, &source.name())
    }

    fn extract_document(&self, document: &Document, source_name: &str) -> Result<String> {
        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(RhymeError::Extraction {
                source_name: source_name.to_string(),
                message: "document has no pages".to_string(),
            });
        }

        let mut text = String::new();

        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    warn!("Skipping page {} of {}: {}", page_number, source_name, e);
                }
            }
        }

        debug!(
            "Extracted {} chars from {} pages of {}",
            text.len(),
            pages.len(),
            source_name
        );

        Ok(text)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
