// file: src/services/gemini.rs
// description: Gemini generateContent client used when a poem is missing from the pdfs
// reference: https://ai.google.dev/api/generate-content

use super::PoemGenerator;
use crate::config::{GeneratorConfig, HttpConfig};
use crate::error::{Result, RhymeError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeneratorConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL.
    fn build_request(&self, api_key: &str, body: &GenerateRequest) -> Result<reqwest::Request> {
        self.client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(body)
            .build()
            .map_err(|e| RhymeError::Generation(format!("Failed to build Gemini request: {}", e)))
    }
}

impl PoemGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RhymeError::Generation(format!(
                "{} is not set",
                crate::config::API_KEY_ENV
            ))
        })?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Requesting generation from {} for {} chars", self.model, prompt.len());

        let request = self.build_request(api_key, &request)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| RhymeError::Generation(format!("Failed to send Gemini request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RhymeError::Generation(format!(
                "Gemini request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            RhymeError::Generation(format!("Failed to parse Gemini response: {}", e))
        })?;

        extract_text(body)
    }
}

fn extract_text(body: GenerateResponse) -> Result<String> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(RhymeError::Generation(
            "No text returned from Gemini".to_string(),
        ));
    }

    debug!("Received {} generated chars", text.len());
    Ok(text.to_string())
}
