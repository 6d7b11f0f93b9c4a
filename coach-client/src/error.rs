//! Error types for the coaching client

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Analysis unavailable: the service returned no content")]
    AnalysisUnavailable,

    #[error("Service returned an invalid analysis: {0}")]
    InvalidResponse(#[from] training::AnalysisShapeError),

    #[error("Could not read video: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}
