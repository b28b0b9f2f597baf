// file: src/services/speech.rs
// description: Google translate text-to-speech client writing mp3 artifacts
// reference: translate.google.com translate_tts (client=tw-ob)

use super::SpeechSynthesizer;
use crate::config::{HttpConfig, SpeechConfig};
use crate::error::{Result, RhymeError};
use crate::models::Language;
use reqwest::Client;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

const BREAK_CHARS: &[char] = &['\n', '.', '!', '?', ';', ':', ',', '،', '۔', '。', '，', '！', '？'];

pub struct GoogleSpeechClient {
    client: Client,
    endpoint: String,
    audio_dir: Option<PathBuf>,
    max_chunk_chars: usize,
}

impl GoogleSpeechClient {
    pub fn new(config: &SpeechConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            audio_dir: config.audio_dir.clone(),
            max_chunk_chars: config.max_chunk_chars,
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        code: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", code),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RhymeError::Speech(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(RhymeError::Speech(format!(
                "Request for chunk {} failed with status {}",
                idx,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RhymeError::Speech(format!("Failed to read audio: {}", e)))?;

        Ok(bytes.to_vec())
    }

    fn write_artifact(&self, audio: &[u8]) -> Result<PathBuf> {
        let dir = self.audio_dir.clone().unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&dir).map_err(|source| RhymeError::FileOperation {
            path: dir.clone(),
            source,
        })?;

        let mut file = tempfile::Builder::new()
            .prefix("poem-")
            .suffix(".mp3")
            .tempfile_in(&dir)?;
        file.write_all(audio)?;

        let (_, path) = file.keep().map_err(|e| RhymeError::Io(e.error))?;
        Ok(path)
    }
}

impl SpeechSynthesizer for GoogleSpeechClient {
    async fn synthesize(&self, text: &str, language: Language) -> Result<PathBuf> {
        let chunks = split_chunks(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(RhymeError::Speech("No text to speak".to_string()));
        }

        let code = language.service_code();
        debug!("Synthesizing {} chunks in {}", chunks.len(), code);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, &code, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(RhymeError::Speech("Empty audio returned".to_string()));
        }

        let path = self.write_artifact(&audio)?;
        debug!("Wrote {} bytes of audio to {}", audio.len(), path.display());
        Ok(path)
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, cutting after
/// punctuation or line ends where possible, then at whitespace, then anywhere.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let window_end = match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => idx,
            None => {
                chunks.push(rest.to_string());
                break;
            }
        };
        let window = &rest[..window_end];

        let cut = window
            .char_indices()
            .rfind(|(_, c)| BREAK_CHARS.contains(c))
            .map(|(idx, c)| idx + c.len_utf8())
            .or_else(|| window.rfind(char::is_whitespace))
            .filter(|&idx| idx > 0)
            .unwrap_or(window_end);

        let (chunk, tail) = rest.split_at(cut);
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        rest = tail.trim_start();
    }

    chunks
}
