//! Plain-text rendering of records for the terminal.

use std::fmt::Write;
use training::stats::{recent, RECENT_ANALYSES, RECENT_SESSIONS};
use training::{AnalysisHistory, DashboardStats, LearningClip, Match, TrainingSession};

fn shot_list<'a>(shots: impl IntoIterator<Item = &'a training::ShotType>) -> String {
    shots
        .into_iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn session_line(session: &TrainingSession) -> String {
    let mut line = format!(
        "{}  {:>3} min  {:<6}  {}",
        session.date,
        session.duration,
        session.intensity.to_string(),
        shot_list(&session.shots)
    );
    if let Some(notes) = &session.notes {
        let _ = write!(line, "  ({notes})");
    }
    line
}

pub fn match_line(m: &Match) -> String {
    let mut line = format!(
        "{}  {:<4}  {}",
        m.date,
        m.result.to_string(),
        m.score_line()
    );
    if !m.positive_shots.is_empty() {
        let _ = write!(line, "  good: {}", shot_list(&m.positive_shots));
    }
    if !m.improvement_shots.is_empty() {
        let _ = write!(line, "  improve: {}", shot_list(&m.improvement_shots));
    }
    line
}

pub fn analysis_line(entry: &AnalysisHistory) -> String {
    let score = entry
        .analysis
        .as_ref()
        .map_or_else(|| "pending".to_string(), |a| format!("{}/10", a.overall_score));
    format!(
        "{}  {}  {:<14}  {}",
        entry.id,
        entry.date.format("%Y-%m-%d %H:%M"),
        entry.shot_type.label(),
        score
    )
}

pub fn analysis_detail(entry: &AnalysisHistory) -> String {
    let mut out = format!(
        "{} analysis from {}\n",
        entry.shot_type.label(),
        entry.date.format("%Y-%m-%d %H:%M")
    );
    let Some(result) = &entry.analysis else {
        out.push_str("No feedback was received for this clip.\n");
        return out;
    };

    let _ = writeln!(out, "Score: {}/10\n", result.overall_score);
    for (title, items) in [
        ("Strengths", &result.pros),
        ("To fix", &result.cons),
        ("Drills", &result.drills),
    ] {
        let _ = writeln!(out, "{title}:");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }
    let _ = writeln!(out, "\nCoach: {}", result.coach_feedback);
    out
}

pub fn dashboard(
    stats: &DashboardStats,
    sessions: &[TrainingSession],
    analyses: &[AnalysisHistory],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sessions:        {}", stats.session_count);
    let _ = writeln!(out, "Minutes trained: {}", stats.total_minutes);
    let _ = writeln!(out, "Best analysis:   {}/10", stats.best_score);
    let _ = writeln!(out, "Analyses:        {}", stats.analysis_count);
    let _ = write!(out, "Matches:         {}W / {}L", stats.wins, stats.losses);
    if let Some(rate) = stats.win_rate() {
        let _ = write!(out, " ({:.0}%)", rate * 100.0);
    }
    out.push('\n');

    if !stats.shot_frequency.is_empty() {
        out.push_str("\nMost trained shots:\n");
        for (shot, count) in &stats.shot_frequency {
            let _ = writeln!(out, "  {:<14} {count}", shot.label());
        }
    }

    let latest = recent(sessions, RECENT_SESSIONS);
    if !latest.is_empty() {
        out.push_str("\nRecent sessions:\n");
        for session in latest {
            let _ = writeln!(out, "  {}", session_line(session));
        }
    }

    let latest = recent(analyses, RECENT_ANALYSES);
    if !latest.is_empty() {
        out.push_str("\nRecent analyses:\n");
        for entry in latest {
            let _ = writeln!(out, "  {}", analysis_line(entry));
        }
    }
    out
}

pub fn clip(clip: &LearningClip) -> String {
    format!(
        "{}\n  {}\n  {}",
        clip.shot.label(),
        clip.description,
        clip.watch_url()
    )
}
