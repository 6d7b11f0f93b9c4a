//! Application context owning the three record stores.

use crate::persistence::{decode, FileSlots, PersistenceError, Record, RecordStore, SlotBackend};
use coach_client::{request_analysis, request_daily_advice, ClientError, CoachService, VideoClip};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use training::stats::recent;
use training::{
    AnalysisHistory, DashboardStats, FormError, Match, MatchForm, SessionForm, ShotType,
    TrainingSession,
};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Coach(#[from] ClientError),
    #[error("Import data could not be read: {0}")]
    Import(#[from] crate::persistence::DecodeError),
}

/// Which collection a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Sessions,
    Analyses,
    Matches,
}

impl SlotKind {
    pub fn slot(self) -> &'static str {
        match self {
            Self::Sessions => TrainingSession::SLOT,
            Self::Analyses => AnalysisHistory::SLOT,
            Self::Matches => Match::SLOT,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sessions => "sessions",
            Self::Analyses => "analyses",
            Self::Matches => "matches",
        })
    }
}

impl FromStr for SlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sessions" | "padel_sessions" => Ok(Self::Sessions),
            "analyses" | "padel_analyses" => Ok(Self::Analyses),
            "matches" | "padel_matches" => Ok(Self::Matches),
            _ => Err(format!(
                "Unknown collection '{s}' (expected sessions, analyses or matches)"
            )),
        }
    }
}

/// Owns the session, analysis and match stores. Components get read or
/// append access through this handle; there is no global state.
pub struct Tracker<B: SlotBackend> {
    sessions: RecordStore<TrainingSession, B>,
    analyses: RecordStore<AnalysisHistory, B>,
    matches: RecordStore<Match, B>,
}

impl Tracker<FileSlots> {
    /// Open the stores kept as JSON files in `data_dir`.
    pub fn open_dir(data_dir: PathBuf) -> Self {
        tracing::info!("Using data directory: {}", data_dir.display());
        Self::open(FileSlots::new(data_dir))
    }
}

impl<B: SlotBackend> Tracker<B> {
    pub fn open(backend: B) -> Self {
        Self {
            sessions: RecordStore::load(backend.clone()),
            analyses: RecordStore::load(backend.clone()),
            matches: RecordStore::load(backend),
        }
    }

    pub fn sessions(&self) -> &[TrainingSession] {
        self.sessions.records()
    }

    pub fn analyses(&self) -> &[AnalysisHistory] {
        self.analyses.records()
    }

    pub fn matches(&self) -> &[Match] {
        self.matches.records()
    }

    pub fn analysis(&self, id: &str) -> Option<&AnalysisHistory> {
        self.analyses.get(id)
    }

    /// Validate and store a training session.
    pub fn log_session(&mut self, form: SessionForm) -> Result<&TrainingSession, TrackerError> {
        let session = form.submit()?;
        let records = self.sessions.append(session)?;
        Ok(&records[0])
    }

    /// Validate and store a match result.
    pub fn log_match(&mut self, form: MatchForm) -> Result<&Match, TrackerError> {
        let m = form.submit()?;
        let records = self.matches.append(m)?;
        Ok(&records[0])
    }

    pub fn record_analysis(
        &mut self,
        entry: AnalysisHistory,
    ) -> Result<&AnalysisHistory, PersistenceError> {
        let records = self.analyses.append(entry)?;
        Ok(&records[0])
    }

    /// Request a critique of `clip` and store it. Nothing is stored when the
    /// request fails.
    pub async fn analyze_video<S>(
        &mut self,
        service: &S,
        clip: &VideoClip,
        shot: ShotType,
    ) -> Result<&AnalysisHistory, TrackerError>
    where
        S: CoachService + ?Sized,
    {
        let result = request_analysis(service, clip, shot).await?;
        Ok(self.record_analysis(AnalysisHistory::completed(shot, result))?)
    }

    /// Today's tip based on the latest sessions. Falls back to a fixed
    /// sentence rather than failing.
    pub async fn daily_advice<S>(&self, service: &S) -> String
    where
        S: CoachService + ?Sized,
    {
        let latest = recent(self.sessions(), coach_client::ADVICE_HISTORY_LIMIT);
        request_daily_advice(service, latest).await
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(self.sessions(), self.analyses(), self.matches())
    }

    /// Import a collection exported from another installation (envelope or
    /// the browser's bare array). Records already present are skipped.
    pub fn import(&mut self, kind: SlotKind, contents: &str) -> Result<usize, TrackerError> {
        let added = match kind {
            SlotKind::Sessions => {
                let incoming = decode::<TrainingSession>(contents)?.records;
                self.sessions.merge_missing(incoming)?
            }
            SlotKind::Analyses => {
                let incoming = decode::<AnalysisHistory>(contents)?.records;
                self.analyses.merge_missing(incoming)?
            }
            SlotKind::Matches => {
                let incoming = decode::<Match>(contents)?.records;
                self.matches.merge_missing(incoming)?
            }
        };
        tracing::info!(collection = %kind, added, "Imported records");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySlots;
    use chrono::NaiveDate;
    use coach_client::{MockCoachService, FALLBACK_ADVICE};
    use training::{AnalysisResult, Intensity, SetInput};

    const GOOD_RESPONSE: &str = r#"{"pros":["p1"],"cons":["c1"],"drills":["d1","d2","d3"],"overallScore":8,"coachFeedback":"good"}"#;

    fn session_form(shot: ShotType) -> SessionForm {
        SessionForm {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            shots: vec![shot],
            duration: 60,
            intensity: Intensity::Low,
            notes: String::new(),
        }
    }

    #[test]
    fn test_log_session_persists() {
        let slots = MemorySlots::new();
        let mut tracker = Tracker::open(slots.clone());
        let id = tracker
            .log_session(session_form(ShotType::Bandeja))
            .unwrap()
            .id
            .clone();

        let reopened = Tracker::open(slots);
        assert_eq!(reopened.sessions().len(), 1);
        assert_eq!(reopened.sessions()[0].id, id);
    }

    #[test]
    fn test_rejected_session_creates_nothing() {
        let mut tracker = Tracker::open(MemorySlots::new());
        let err = tracker.log_session(SessionForm::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Form(FormError::NoShotsSelected)));
        assert!(tracker.sessions().is_empty());
    }

    #[test]
    fn test_log_match_filters_incomplete_sets() {
        let mut tracker = Tracker::open(MemorySlots::new());
        let form = MatchForm {
            sets: vec![
                SetInput::new("3", "6"),
                SetInput::new("", "2"),
                SetInput::new("4", "4"),
            ],
            ..MatchForm::default()
        };
        let m = tracker.log_match(form).unwrap();
        assert_eq!(m.score_line(), "3-6, 4-4");
    }

    #[test]
    fn test_rejected_match_creates_nothing() {
        let mut tracker = Tracker::open(MemorySlots::new());
        let form = MatchForm {
            sets: vec![SetInput::new("x", "2")],
            ..MatchForm::default()
        };
        assert!(matches!(
            tracker.log_match(form),
            Err(TrackerError::Form(FormError::InvalidSetScore { .. }))
        ));
        assert!(tracker.matches().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_video_commits_completed_entry() {
        let service = MockCoachService::new().with_text(GOOD_RESPONSE);
        let mut tracker = Tracker::open(MemorySlots::new());
        let clip = VideoClip::new(vec![1, 2, 3], "video/mp4");

        let entry = tracker
            .analyze_video(&service, &clip, ShotType::Vibora)
            .await
            .unwrap()
            .clone();

        assert_eq!(entry.shot_type, ShotType::Vibora);
        assert_eq!(
            entry.analysis,
            Some(AnalysisResult {
                pros: vec!["p1".to_string()],
                cons: vec!["c1".to_string()],
                drills: vec!["d1".to_string(), "d2".to_string(), "d3".to_string()],
                overall_score: 8.0,
                coach_feedback: "good".to_string(),
            })
        );
        assert_eq!(tracker.analysis(&entry.id), Some(&entry));
    }

    #[tokio::test]
    async fn test_failed_analysis_commits_nothing() {
        let service = MockCoachService::new().with_response(|_| Ok(None));
        let mut tracker = Tracker::open(MemorySlots::new());
        let clip = VideoClip::new(vec![0], "video/mp4");

        let err = tracker
            .analyze_video(&service, &clip, ShotType::Smash)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Coach(ClientError::AnalysisUnavailable)
        ));
        assert!(tracker.analyses().is_empty());
    }

    #[tokio::test]
    async fn test_daily_advice_uses_latest_five_sessions() {
        let service = MockCoachService::new().with_text("Keep your paddle up.");
        let mut tracker = Tracker::open(MemorySlots::new());
        for _ in 0..7 {
            tracker.log_session(session_form(ShotType::Lob)).unwrap();
        }
        let newest = tracker.sessions()[0].id.clone();
        let oldest = tracker.sessions()[6].id.clone();

        assert_eq!(tracker.daily_advice(&service).await, "Keep your paddle up.");
        let prompt = service.get_calls()[0].prompt();
        assert!(prompt.contains(&newest));
        assert!(!prompt.contains(&oldest));
    }

    #[tokio::test]
    async fn test_daily_advice_failure_is_invisible() {
        let service = MockCoachService::new();
        let tracker = Tracker::open(MemorySlots::new());
        assert_eq!(tracker.daily_advice(&service).await, FALLBACK_ADVICE);
    }

    #[test]
    fn test_import_browser_export() {
        let mut tracker = Tracker::open(MemorySlots::new());
        let export = r#"[
            {"id":"a2","date":"2024-02-02","shots":["Globo"],"duration":30,"intensity":"Baja"},
            {"id":"a1","date":"2024-02-01","shots":["Derecha","Revés"],"duration":90,"intensity":"Alta","notes":"drills"}
        ]"#;

        assert_eq!(tracker.import(SlotKind::Sessions, export).unwrap(), 2);
        assert_eq!(tracker.import(SlotKind::Sessions, export).unwrap(), 0);
        let ids: Vec<_> = tracker.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
        assert_eq!(tracker.stats().total_minutes, 120);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut tracker = Tracker::open(MemorySlots::new());
        assert!(matches!(
            tracker.import(SlotKind::Matches, "{oops"),
            Err(TrackerError::Import(_))
        ));
    }

    #[test]
    fn test_import_error_names_bad_value() {
        let mut tracker = Tracker::open(MemorySlots::new());
        let export = r#"[{"id":"m1","date":"2024-01-05","result":"Empate","sets":[],"positiveShots":[],"improvementShots":[]}]"#;
        let err = tracker.import(SlotKind::Matches, export).unwrap_err();
        assert!(err.to_string().contains("Empate"), "{err}");
        assert!(tracker.matches().is_empty());
    }

    #[test]
    fn test_slot_kind_parsing() {
        assert_eq!("matches".parse::<SlotKind>().unwrap(), SlotKind::Matches);
        assert_eq!(
            "padel_analyses".parse::<SlotKind>().unwrap().slot(),
            "padel_analyses"
        );
        assert!("players".parse::<SlotKind>().is_err());
    }
}
