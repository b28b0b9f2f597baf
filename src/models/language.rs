// file: src/models/language.rs
// description: fixed table of translation and voice languages
// reference: ISO 639-1 language codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Urdu,
    Hindi,
    Spanish,
    French,
    German,
    Arabic,
    Chinese,
    Russian,
    Italian,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Urdu,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Arabic,
        Language::Chinese,
        Language::Russian,
        Language::Italian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Arabic => "Arabic",
            Language::Chinese => "Chinese",
            Language::Russian => "Russian",
            Language::Italian => "Italian",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Arabic => "ar",
            Language::Chinese => "zh-cn",
            Language::Russian => "ru",
            Language::Italian => "it",
        }
    }

    /// Code with the region upper-cased (`zh-CN`), as the Google endpoints expect.
    pub fn service_code(&self) -> String {
        match self.code().split_once('-') {
            Some((lang, region)) => format!("{}-{}", lang, region.to_uppercase()),
            None => self.code().to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| {
                lang.name().eq_ignore_ascii_case(needle) || lang.code().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                let names: Vec<&str> = Language::ALL.iter().map(|l| l.name()).collect();
                format!(
                    "unknown language '{}' (expected one of: {})",
                    needle,
                    names.join(", ")
                )
            })
    }
}
