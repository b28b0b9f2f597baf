// file: src/services/translator.rs
// description: Google translate client with automatic source language detection
// reference: translate.googleapis.com translate_a/single (client=gtx)

use super::PoemTranslator;
use crate::config::{HttpConfig, TranslatorConfig};
use crate::error::{Result, RhymeError};
use crate::models::Language;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    max_chars: usize,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslatorConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_chars: config.max_chars,
        })
    }
}

impl PoemTranslator for GoogleTranslateClient {
    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let length = text.chars().count();
        if length > self.max_chars {
            return Err(RhymeError::Translation(format!(
                "Text has {} characters, limit is {}",
                length, self.max_chars
            )));
        }

        let code = target.service_code();
        debug!("Translating {} chars to {}", length, code);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", code.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| RhymeError::Translation(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(RhymeError::Translation(format!(
                "Request failed with status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RhymeError::Translation(format!("Failed to parse response: {}", e)))?;

        parse_translation(&body)
    }
}

/// The body is `[[["translated", "original", ...], ...], ...]`; segment texts are joined.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| RhymeError::Translation("Unexpected response shape".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(RhymeError::Translation(
            "Empty translation returned".to_string(),
        ));
    }

    Ok(translated)
}
