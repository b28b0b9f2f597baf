// file: src/utils/validation.rs
// description: input validation for titles and uploaded documents
// reference: input validation patterns

use crate::error::{Result, RhymeError};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// Returns the trimmed title, rejecting blank input.
    pub fn validate_title(title: &str) -> Result<&str> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(RhymeError::Validation("Title is empty".to_string()));
        }
        Ok(trimmed)
    }

    pub fn validate_file_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(RhymeError::Validation(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(RhymeError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_pdf_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Ok(()),
            _ => Err(RhymeError::Validation(format!(
                "File is not a PDF: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_upload(path: &Path) -> Result<()> {
        Self::validate_pdf_extension(path)?;
        Self::validate_file_path(path)
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}
