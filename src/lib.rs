// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod poem;
pub mod services;
pub mod utils;

pub use config::{
    Config, DocumentsConfig, GeneratorConfig, HttpConfig, SpeechConfig, TranslatorConfig,
};
pub use document::{PdfSource, TextExtractor};
pub use error::{Result, RhymeError};
pub use models::{
    Action, Language, Notice, NoticeLevel, Outcome, Poem, PoemOrigin, Session, Translation,
};
pub use pipeline::{Orchestrator, StepProgress};
pub use poem::{PoemCleaner, PoemLocator};
pub use services::{
    GeminiClient, GoogleSpeechClient, GoogleTranslateClient, PoemGenerator, PoemTranslator,
    SpeechSynthesizer,
};
pub use utils::{OperationTimer, Validator};
