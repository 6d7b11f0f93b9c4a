//! Configuration for padelcoach
//!
//! Data directory precedence:
//! 1. PADELCOACH_DATA_DIR environment variable
//! 2. ~/.config/padelcoach/data (production default)
//! 3. ./data (fallback for development)
//!
//! The coaching service is configured from GEMINI_API_KEY (or API_KEY),
//! PADELCOACH_MODEL and PADELCOACH_API_BASE.

use coach_client::{ApiKey, ClientError, GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = ".config/padelcoach/data";
const DEV_DATA_DIR: &str = "./data";

/// Get the data directory for persistence.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(|name| std::env::var(name).ok())
}

fn data_dir_from(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = lookup("PADELCOACH_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = lookup("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Settings for the generative coaching service.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub base_url: String,
}

impl CoachConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("GEMINI_API_KEY")
            .and_then(ApiKey::new)
            .or_else(|| lookup("API_KEY").and_then(ApiKey::new));

        Self {
            api_key,
            model: lookup("PADELCOACH_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("PADELCOACH_API_BASE")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Build the HTTP client; fails without a credential.
    pub fn client(&self) -> Result<GeminiClient, ClientError> {
        let key = self.api_key.clone().ok_or(ClientError::MissingApiKey)?;
        Ok(GeminiClient::new(key)
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone()))
    }
}
