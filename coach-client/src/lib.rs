//! Coaching-service client library
//!
//! Sends technique videos and training history to a generative-AI service
//! and turns its answers into [`training`] types. The transport sits behind
//! the [`CoachService`] trait so callers and tests can swap in
//! [`MockCoachService`] (with the `mock` feature).
//!
//! # Example
//!
//! ```no_run
//! use coach_client::{request_analysis, ApiKey, GeminiClient, VideoClip};
//! use training::ShotType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new(ApiKey::new("...").unwrap());
//!     let clip = VideoClip::from_path("bandeja.mp4".as_ref(), None)?;
//!     let result = request_analysis(&client, &clip, ShotType::Bandeja).await?;
//!     println!("Score: {}", result.overall_score);
//!     Ok(())
//! }
//! ```

mod error;
mod gemini;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod requester;
mod traits;
mod video;

pub use error::{ClientError, ClientResult};
pub use gemini::{ApiKey, GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCoachService;
pub use requester::{
    advice_prompt, analysis_prompt, analysis_schema, request_analysis, request_daily_advice,
    ADVICE_HISTORY_LIMIT, FALLBACK_ADVICE,
};
pub use traits::{CoachService, GenerateRequest, Part};
pub use video::{guess_mime, VideoClip};
