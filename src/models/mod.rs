// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

mod language;
mod outcome;
mod session;

pub use language::Language;
pub use outcome::{Notice, NoticeLevel, Outcome, Poem, PoemOrigin, Translation};
pub use session::{Action, Session};
