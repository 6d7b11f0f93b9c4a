//! Persisted record types.
//!
//! Field and variant names on the wire match the labels the browser build of
//! the app wrote to local storage, so an exported collection deserializes
//! without a migration step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shot-type label, drawn from a fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    #[serde(rename = "Derecha")]
    Forehand,
    #[serde(rename = "Revés")]
    Backhand,
    #[serde(rename = "Volea")]
    Volley,
    #[serde(rename = "Bandeja")]
    Bandeja,
    #[serde(rename = "Víbora")]
    Vibora,
    #[serde(rename = "Remate")]
    Smash,
    #[serde(rename = "Globo")]
    Lob,
    #[serde(rename = "Bajada de pared")]
    WallRebound,
}

impl ShotType {
    /// Form order.
    pub const ALL: [ShotType; 8] = [
        Self::Forehand,
        Self::Backhand,
        Self::Volley,
        Self::Bandeja,
        Self::Vibora,
        Self::Smash,
        Self::Lob,
        Self::WallRebound,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Forehand => "Forehand",
            Self::Backhand => "Backhand",
            Self::Volley => "Volley",
            Self::Bandeja => "Bandeja",
            Self::Vibora => "Víbora",
            Self::Smash => "Smash",
            Self::Lob => "Lob",
            Self::WallRebound => "Wall rebound",
        }
    }

    /// Label as stored on disk (and used in coaching prompts).
    pub fn stored_label(self) -> &'static str {
        match self {
            Self::Forehand => "Derecha",
            Self::Backhand => "Revés",
            Self::Volley => "Volea",
            Self::Bandeja => "Bandeja",
            Self::Vibora => "Víbora",
            Self::Smash => "Remate",
            Self::Lob => "Globo",
            Self::WallRebound => "Bajada de pared",
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown shot type: {0}")]
pub struct UnknownShotType(pub String);

impl FromStr for ShotType {
    type Err = UnknownShotType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_label(s);
        ShotType::ALL
            .into_iter()
            .find(|shot| {
                normalize_label(shot.label()) == key || normalize_label(shot.stored_label()) == key
            })
            .ok_or_else(|| UnknownShotType(s.to_string()))
    }
}

/// Lowercase, accent-free, with `-`/`_` folded to spaces.
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Training-session effort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Intensity {
    #[serde(rename = "Baja")]
    Low,
    #[default]
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "baja" => Ok(Self::Low),
            "medium" | "media" => Ok(Self::Medium),
            "high" | "alta" => Ok(Self::High),
            _ => Err(format!("Unknown intensity: {s}")),
        }
    }
}

/// Match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchResult {
    #[default]
    #[serde(rename = "Victoria")]
    Win,
    #[serde(rename = "Derrota")]
    Loss,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Win => "Win",
            Self::Loss => "Loss",
        })
    }
}

impl FromStr for MatchResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "w" | "victoria" => Ok(Self::Win),
            "loss" | "l" | "derrota" => Ok(Self::Loss),
            _ => Err(format!("Unknown match result: {s}")),
        }
    }
}

/// Games won by the user and by the opponent in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    #[serde(rename = "myScore")]
    pub mine: u32,
    #[serde(rename = "opponentScore")]
    pub opponent: u32,
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.mine, self.opponent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub date: NaiveDate,
    pub shots: Vec<ShotType>,
    /// Minutes on court.
    pub duration: u32,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub date: NaiveDate,
    pub result: MatchResult,
    /// Set 1 first.
    pub sets: Vec<SetScore>,
    pub positive_shots: Vec<ShotType>,
    pub improvement_shots: Vec<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Match {
    /// Sets written as `6-3, 4-6`.
    pub fn score_line(&self) -> String {
        self.sets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One requested technique review. `analysis` stays empty until the coaching
/// service answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistory {
    pub id: String,
    pub date: DateTime<Utc>,
    pub shot_type: ShotType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl AnalysisHistory {
    /// A fresh, not yet answered entry stamped now.
    pub fn pending(shot_type: ShotType) -> Self {
        Self {
            id: crate::ids::new_record_id(),
            date: Utc::now(),
            shot_type,
            video_url: None,
            analysis: None,
        }
    }

    pub fn completed(shot_type: ShotType, analysis: AnalysisResult) -> Self {
        Self {
            analysis: Some(analysis),
            ..Self::pending(shot_type)
        }
    }
}

/// Technique critique as returned by the coaching service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub drills: Vec<String>,
    /// Nominally 1-10, not clamped.
    pub overall_score: f64,
    pub coach_feedback: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisShapeError {
    #[error("Response is not the expected JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("overallScore is not a finite number")]
    NonFiniteScore,
}

impl AnalysisResult {
    /// Parse the service's text payload. All five fields are required and the
    /// score must be finite; nothing else is checked.
    pub fn from_response_text(text: &str) -> Result<Self, AnalysisShapeError> {
        let result: AnalysisResult = serde_json::from_str(text.trim())?;
        if !result.overall_score.is_finite() {
            return Err(AnalysisShapeError::NonFiniteScore);
        }
        Ok(result)
    }
}
