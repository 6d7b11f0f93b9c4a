//! Command-line surface.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracker::SlotKind;
use training::form::DEFAULT_DURATION_MINUTES;
use training::{Intensity, MatchForm, MatchResult, SessionForm, SetInput, ShotType};

/// Top-level CLI arguments.
#[derive(Debug, Parser)]
#[command(
    name = "padelcoach",
    version,
    about = "Padel training log with video coaching"
)]
pub struct Cli {
    /// Directory holding the JSON collections (overrides PADELCOACH_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log or list training sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Log or list match results.
    Match {
        #[command(subcommand)]
        action: MatchAction,
    },
    /// Send a video clip for technical feedback and store the result.
    Analyze {
        /// Path to the video file.
        video: PathBuf,
        /// Shot performed in the clip, e.g. "bandeja" or "Revés".
        #[arg(long)]
        shot: ShotType,
        /// Media type of the clip; guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Browse stored analyses.
    Analyses {
        #[command(subcommand)]
        action: AnalysesAction,
    },
    /// Today's coaching tip based on recent sessions.
    Advice,
    /// Dashboard totals.
    Stats {
        /// Print the totals as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Instructional clips by professional players.
    Learn {
        /// Only show clips for this shot.
        #[arg(long)]
        shot: Option<ShotType>,
    },
    /// Merge an exported collection into local storage.
    Import {
        /// sessions, analyses or matches
        slot: SlotKind,
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    Add(SessionArgs),
    List {
        /// Show at most this many sessions.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Subcommand)]
pub enum MatchAction {
    Add(MatchArgs),
    List,
}

#[derive(Debug, Subcommand)]
pub enum AnalysesAction {
    List,
    Show { id: String },
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session date (YYYY-MM-DD), today when omitted.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Trained shot; repeat for several.
    #[arg(long = "shot")]
    pub shots: Vec<ShotType>,
    /// Duration in minutes.
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    pub duration: u32,
    #[arg(long, default_value_t = Intensity::Medium)]
    pub intensity: Intensity,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl SessionArgs {
    pub fn into_form(self) -> SessionForm {
        let defaults = SessionForm::default();
        SessionForm {
            date: self.date.unwrap_or(defaults.date),
            shots: self.shots,
            duration: self.duration,
            intensity: self.intensity,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Victoria/win or Derrota/loss.
    #[arg(long, default_value_t = MatchResult::Win)]
    pub result: MatchResult,
    /// Set score as MINE-THEIRS, e.g. 6-4; repeat per set. A blank side
    /// ("6-") leaves the set out.
    #[arg(long = "set", value_parser = parse_set, allow_hyphen_values = true)]
    pub sets: Vec<SetInput>,
    /// Shot that worked well; repeat for several.
    #[arg(long = "good")]
    pub positive_shots: Vec<ShotType>,
    /// Shot to improve; repeat for several.
    #[arg(long = "improve")]
    pub improvement_shots: Vec<ShotType>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl MatchArgs {
    pub fn into_form(self) -> MatchForm {
        let defaults = MatchForm::default();
        MatchForm {
            date: self.date.unwrap_or(defaults.date),
            result: self.result,
            sets: self.sets,
            positive_shots: self.positive_shots,
            improvement_shots: self.improvement_shots,
            notes: self.notes,
        }
    }
}

/// Split `MINE-THEIRS` into the two raw inputs. Numbers are checked by the
/// match form so its error names the offending set.
fn parse_set(value: &str) -> Result<SetInput, String> {
    match value.split_once('-') {
        Some((mine, opponent)) => Ok(SetInput::new(mine, opponent)),
        None => Err(format!("'{value}' is not a set score like 6-4")),
    }
}
