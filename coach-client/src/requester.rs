//! Video-analysis and daily-advice requests on top of a [`CoachService`].
//!
//! Neither request is retried or cached: every call goes to the service and
//! may come back with different text or scores for the same input.

use crate::error::{ClientError, ClientResult};
use crate::traits::{CoachService, GenerateRequest, Part};
use crate::video::VideoClip;
use serde_json::{json, Value};
use training::{AnalysisResult, ShotType, TrainingSession};

/// Shown when the advice request fails or comes back empty.
pub const FALLBACK_ADVICE: &str = "Today is a great day to train your bandeja!";

/// Most sessions embedded in the advice prompt.
pub const ADVICE_HISTORY_LIMIT: usize = 5;

/// Drills the service is asked for. Passed through unchecked.
pub const EXPECTED_DRILLS: usize = 3;

/// JSON schema asserted to the service for [`AnalysisResult`].
pub fn analysis_schema() -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "pros": string_list,
            "cons": string_list,
            "drills": string_list,
            "overallScore": { "type": "NUMBER" },
            "coachFeedback": { "type": "STRING" }
        },
        "required": ["pros", "cons", "drills", "overallScore", "coachFeedback"]
    })
}

pub fn analysis_prompt(shot: ShotType) -> String {
    format!(
        "Act as a professional padel coach at world-tour level. \
Analyse this video of a player performing a \"{label}\" ({stored}).
Evaluate specifically:
1. Body position and footwork (split step, adjustment steps).
2. Paddle preparation.
3. Contact point (height, in front of the body).
4. Follow-through and recovery.

Answer with structured JSON containing:
- pros: list of strengths.
- cons: list of technical faults found.
- drills: {EXPECTED_DRILLS} specific exercises to improve this shot.
- overallScore: a mark from 1 to 10.
- coachFeedback: a motivating, technical summary.",
        label = shot.label(),
        stored = shot.stored_label(),
    )
}

/// Ask the service to critique one clip of `shot`.
///
/// Fails with [`ClientError::AnalysisUnavailable`] when the service sends no
/// text and [`ClientError::InvalidResponse`] when the text is not a complete
/// analysis. Transport errors pass through.
pub async fn request_analysis<S>(
    service: &S,
    clip: &VideoClip,
    shot: ShotType,
) -> ClientResult<AnalysisResult>
where
    S: CoachService + ?Sized,
{
    tracing::info!(
        shot = %shot,
        mime_type = %clip.mime_type,
        bytes = clip.bytes.len(),
        "Requesting video analysis"
    );

    let request = GenerateRequest {
        parts: vec![
            Part::InlineData {
                mime_type: clip.mime_type.clone(),
                data: clip.to_base64(),
            },
            Part::Text(analysis_prompt(shot)),
        ],
        response_schema: Some(analysis_schema()),
    };

    let text = service
        .generate(request)
        .await?
        .filter(|text| !text.trim().is_empty())
        .ok_or(ClientError::AnalysisUnavailable)?;

    let result = AnalysisResult::from_response_text(&text)?;
    if result.drills.len() != EXPECTED_DRILLS {
        tracing::warn!(
            drills = result.drills.len(),
            "Analysis returned an unexpected number of drills"
        );
    }
    tracing::info!(score = result.overall_score, "Video analysis received");
    Ok(result)
}

pub fn advice_prompt(recent: &[TrainingSession]) -> serde_json::Result<String> {
    let limit = recent.len().min(ADVICE_HISTORY_LIMIT);
    let history = serde_json::to_string(&recent[..limit])?;
    Ok(format!(
        "Based on this training history: {history}. \
Give me one short tip (at most 2 sentences) for today's training of a padel \
player who wants to improve."
    ))
}

/// One short coaching tip for today. Never fails: any error or empty answer
/// yields [`FALLBACK_ADVICE`].
pub async fn request_daily_advice<S>(service: &S, recent: &[TrainingSession]) -> String
where
    S: CoachService + ?Sized,
{
    let prompt = match advice_prompt(recent) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::warn!("Failed to encode session history for advice: {}", e);
            return FALLBACK_ADVICE.to_string();
        }
    };

    match service.generate(GenerateRequest::text(prompt)).await {
        Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("Advice request returned no text, using fallback");
            FALLBACK_ADVICE.to_string()
        }
        Err(e) => {
            tracing::warn!("Advice request failed, using fallback: {}", e);
            FALLBACK_ADVICE.to_string()
        }
    }
}
