// file: src/poem/mod.rs
// description: poem lookup module exports
// reference: internal module structure

mod cleaner;
mod locator;

pub use cleaner::{MAX_LINE_CHARS, PoemCleaner};
pub use locator::PoemLocator;
