//! CoachService trait abstraction for client implementations

use crate::error::ClientResult;
use async_trait::async_trait;
use serde_json::Value;

/// One piece of a multi-part request.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Binary payload, already base64-encoded.
    InlineData { mime_type: String, data: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerateRequest {
    pub parts: Vec<Part>,
    /// When set, the service is asked to answer with JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(prompt.into())],
            response_schema: None,
        }
    }

    /// Concatenated text parts, mostly useful for assertions and logging.
    pub fn prompt(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Generative coaching service.
/// Implemented by both the real GeminiClient and MockCoachService
#[async_trait]
pub trait CoachService: Send + Sync {
    /// Send one request and return the text payload, if the service sent any.
    async fn generate(&self, request: GenerateRequest) -> ClientResult<Option<String>>;
}
