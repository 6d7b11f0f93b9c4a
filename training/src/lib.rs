pub mod form;
pub mod ids;
pub mod learning;
pub mod model;
pub mod stats;

pub use form::{FormError, MatchForm, SessionForm, SetInput, MAX_SETS};
pub use learning::{LearningClip, CATALOG};
pub use model::{
    AnalysisHistory, AnalysisResult, AnalysisShapeError, Intensity, Match, MatchResult, SetScore,
    ShotType, TrainingSession, UnknownShotType,
};
pub use stats::DashboardStats;
