// file: src/models/session.rs
// description: explicit per-user interaction state moved through the pipeline
// reference: internal data model

use super::{Language, Outcome};
use crate::document::PdfSource;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub title: String,
    pub language: Language,
    pub upload: Option<PdfSource>,
    pub last_outcome: Option<Outcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_upload(mut self, upload: PdfSource) -> Self {
        self.upload = Some(upload);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Look the title up in the documents, generating the poem when absent.
    FindOrGenerate,
    /// Drop every field and start over.
    ClearAll,
}
