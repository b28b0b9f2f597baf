// file: src/services/mod.rs
// description: external service clients and the seams the pipeline calls through
// reference: internal module structure

mod gemini;
mod speech;
mod translator;

pub use gemini::GeminiClient;
pub use speech::{GoogleSpeechClient, split_chunks};
pub use translator::GoogleTranslateClient;

use crate::error::Result;
use crate::models::Language;
use std::future::Future;
use std::path::PathBuf;

pub trait PoemGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

pub trait PoemTranslator {
    fn translate(
        &self,
        text: &str,
        target: Language,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Produces a playable MP3 file and returns where it was written.
pub trait SpeechSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}
