//! Dashboard aggregates over the three record collections.

use crate::model::{AnalysisHistory, Match, MatchResult, ShotType, TrainingSession};
use serde::Serialize;

/// Number of sessions the dashboard lists.
pub const RECENT_SESSIONS: usize = 3;

/// Number of analyses the dashboard lists.
pub const RECENT_ANALYSES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub session_count: usize,
    pub total_minutes: u64,
    /// Highest `overallScore` among answered analyses, 0 when there are none.
    pub best_score: f64,
    pub analysis_count: usize,
    pub wins: usize,
    pub losses: usize,
    /// How many sessions trained each shot, most trained first.
    pub shot_frequency: Vec<(ShotType, usize)>,
}

impl DashboardStats {
    pub fn compute(
        sessions: &[TrainingSession],
        analyses: &[AnalysisHistory],
        matches: &[Match],
    ) -> Self {
        let total_minutes = sessions.iter().map(|s| u64::from(s.duration)).sum();

        let best_score = analyses
            .iter()
            .filter_map(|a| a.analysis.as_ref().map(|r| r.overall_score))
            .fold(0.0_f64, f64::max);

        let wins = matches
            .iter()
            .filter(|m| m.result == MatchResult::Win)
            .count();

        let mut shot_frequency: Vec<(ShotType, usize)> = ShotType::ALL
            .into_iter()
            .map(|shot| {
                let count = sessions.iter().filter(|s| s.shots.contains(&shot)).count();
                (shot, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        // Stable sort keeps form order among ties.
        shot_frequency.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            session_count: sessions.len(),
            total_minutes,
            best_score,
            analysis_count: analyses.len(),
            wins,
            losses: matches.len() - wins,
            shot_frequency,
        }
    }

    /// Share of matches won, `None` before the first match.
    pub fn win_rate(&self) -> Option<f64> {
        let played = self.wins + self.losses;
        (played > 0).then(|| self.wins as f64 / played as f64)
    }
}

/// The first `n` records. Collections are stored newest first.
pub fn recent<T>(records: &[T], n: usize) -> &[T] {
    &records[..records.len().min(n)]
}
