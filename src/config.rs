// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, RhymeError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const ENV_PREFIX: &str = "RHYME_FINDER";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// A configured key (file or `RHYME_FINDER__GENERATOR__API_KEY`) wins over
/// `GEMINI_API_KEY`; blank values count as unset.
fn resolve_api_key(configured: Option<String>, fallback: Option<String>) -> Option<String> {
    configured
        .filter(|key| !key.trim().is_empty())
        .or_else(|| fallback.filter(|key| !key.trim().is_empty()))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub documents: DocumentsConfig,
    pub generator: GeneratorConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentsConfig {
    pub builtin_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub prompt_template: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    pub endpoint: String,
    #[serde(default)]
    pub audio_dir: Option<PathBuf>,
    pub max_chunk_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub slow_call_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn slow_call(&self) -> Duration {
        Duration::from_secs(self.slow_call_secs)
    }
}

impl GeneratorConfig {
    pub fn prompt_for(&self, title: &str) -> String {
        self.prompt_template.replace(TITLE_PLACEHOLDER, title)
    }
}

impl Config {
    /// Defaults, then the TOML file (optional), then `RHYME_FINDER__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::load_from(path, None)
    }

    /// `env` replaces the process environment when given.
    fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::defaults())
            .map_err(|e| RhymeError::Config(e.to_string()))?;

        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let fallback_key = match &env {
            Some(vars) => vars.get(API_KEY_ENV).cloned(),
            None => std::env::var(API_KEY_ENV).ok(),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| RhymeError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| RhymeError::Config(e.to_string()))?;

        config.generator.api_key = resolve_api_key(config.generator.api_key.take(), fallback_key);
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults with the credential taken from the process environment.
    pub fn default_config() -> Self {
        dotenv().ok();

        let mut config = Self::defaults();
        config.generator.api_key = resolve_api_key(None, std::env::var(API_KEY_ENV).ok());
        config
    }

    fn defaults() -> Self {
        Self {
            documents: DocumentsConfig {
                builtin_path: PathBuf::from("Nursery_Rhyme_Charts.pdf"),
            },
            generator: GeneratorConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-1.5-flash".to_string(),
                prompt_template: "Write a short children's poem titled '{title}'".to_string(),
                api_key: None,
            },
            translator: TranslatorConfig {
                endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
                max_chars: 5000,
            },
            speech: SpeechConfig {
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                audio_dir: None,
                max_chunk_chars: 100,
            },
            http: HttpConfig {
                timeout_secs: 30,
                slow_call_secs: 10,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.generator.prompt_template.contains(TITLE_PLACEHOLDER) {
            return Err(RhymeError::Config(format!(
                "prompt_template must contain {}",
                TITLE_PLACEHOLDER
            )));
        }

        if self.translator.max_chars == 0 {
            return Err(RhymeError::Config(
                "translator.max_chars must be greater than 0".to_string(),
            ));
        }

        if self.speech.max_chunk_chars == 0 {
            return Err(RhymeError::Config(
                "speech.max_chunk_chars must be greater than 0".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(RhymeError::Config(
                "http.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
