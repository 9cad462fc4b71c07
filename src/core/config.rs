//! API keys and endpoints
//!
//! Keys come from an optional TOML secrets file, then the environment. An
//! environment variable always wins over the file.

use std::path::Path;

use serde::Deserialize;

use crate::core::assistant::{DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use crate::core::error::{Error, Result};
use crate::core::google::DEFAULT_DIRECTIONS_BASE_URL;

pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const GROQ_MODEL: &str = "GROQ_MODEL";
pub const DIRECTIONS_BASE_URL: &str = "DIRECTIONS_BASE_URL";
pub const LLM_BASE_URL: &str = "LLM_BASE_URL";

/// Layout of the secrets file
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GOOGLE_MAPS_API_KEY")]
    google_maps_api_key: Option<String>,
    #[serde(rename = "GROQ_API_KEY")]
    groq_api_key: Option<String>,
    #[serde(rename = "GROQ_MODEL")]
    groq_model: Option<String>,
    #[serde(rename = "DIRECTIONS_BASE_URL")]
    directions_base_url: Option<String>,
    #[serde(rename = "LLM_BASE_URL")]
    llm_base_url: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub google_maps_api_key: String,
    /// Q&A is disabled when no key is configured
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub directions_base_url: String,
    pub llm_base_url: String,
}

impl Config {
    /// Load from `secrets` (if given) and the process environment
    pub fn load(secrets: Option<&Path>) -> Result<Self> {
        Self::resolve(secrets, |name| std::env::var(name).ok())
    }

    /// Load with a custom variable lookup instead of the process environment
    pub fn resolve<F>(secrets: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match secrets {
            Some(path) => read_secrets(path)?,
            None => SecretsFile::default(),
        };
        let pick = |name: &str, from_file: Option<String>| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .or(from_file.filter(|value| !value.trim().is_empty()))
        };

        let google_maps_api_key = pick(GOOGLE_MAPS_API_KEY, file.google_maps_api_key)
            .ok_or_else(|| Error::ConfigError(format!("{GOOGLE_MAPS_API_KEY} is not set")))?;

        Ok(Self {
            google_maps_api_key,
            groq_api_key: pick(GROQ_API_KEY, file.groq_api_key),
            groq_model: pick(GROQ_MODEL, file.groq_model)
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            directions_base_url: pick(DIRECTIONS_BASE_URL, file.directions_base_url)
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_BASE_URL.to_string()),
            llm_base_url: pick(LLM_BASE_URL, file.llm_base_url)
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
        })
    }
}

fn read_secrets(path: &Path) -> Result<SecretsFile> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("Cannot read secrets file {}: {e}", path.display()))
    })?;
    toml::from_str(&text).map_err(|e| {
        Error::ConfigError(format!("Invalid secrets file {}: {e}", path.display()))
    })
}
