// file: src/poem/locator.rs
// description: finds a poem block by title inside extracted document text
// reference: https://docs.rs/regex

use super::cleaner::PoemCleaner;
use crate::error::{Result, RhymeError};
use regex::RegexBuilder;
use tracing::debug;

pub struct PoemLocator {
    cleaner: PoemCleaner,
}

impl PoemLocator {
    pub fn new() -> Self {
        Self {
            cleaner: PoemCleaner::new(),
        }
    }

    /// Returns the cleaned stanza following the first case-insensitive match of
    /// `title`, or `None` when the title is absent or the stanza cleans to nothing.
    pub fn locate(&self, text: &str, title: &str) -> Result<Option<String>> {
        if title.is_empty() {
            return Err(RhymeError::Validation("Title is empty".to_string()));
        }

        let pattern = RegexBuilder::new(&regex::escape(title))
            .case_insensitive(true)
            .build()
            .map_err(|e| RhymeError::Validation(format!("Invalid title pattern: {}", e)))?;

        let Some(found) = pattern.find(text) else {
            debug!("Title '{}' not present in {} chars", title, text.len());
            return Ok(None);
        };

        let stanza = collect_stanza(&text[found.end()..]);
        let cleaned = self.cleaner.clean(&stanza.join("\n"));

        if cleaned.is_empty() {
            debug!("Title '{}' matched but no poem lines survived cleanup", title);
            return Ok(None);
        }

        Ok(Some(cleaned))
    }
}

impl Default for PoemLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading blank lines are skipped; the first blank line after content ends the stanza.
fn collect_stanza(after_match: &str) -> Vec<&str> {
    let mut stanza = Vec::new();

    for line in after_match.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if stanza.is_empty() {
                continue;
            }
            break;
        }
        stanza.push(trimmed);
    }

    stanza
}
