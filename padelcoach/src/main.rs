//! padelcoach - padel training log with video coaching.
//!
//! Every subcommand opens the three local collections (sessions, analyses,
//! matches), performs one action and exits. Video analysis and daily advice
//! go to the generative coaching service configured through the environment
//! (see [`tracker::config`]); everything else works offline.
//!
//! Logs are written to `<data dir>/logs/padelcoach.YYYY-MM-DD` so terminal
//! output stays limited to the requested data.

mod cli;
mod render;

use anyhow::Context;
use clap::Parser;
use cli::{AnalysesAction, Cli, Commands, MatchAction, SessionAction};
use coach_client::{VideoClip, FALLBACK_ADVICE};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracker::config::{self, CoachConfig};
use tracker::{SlotBackend, Tracker};
use training::learning::clips_for;
use training::stats::recent;
use training::CATALOG;

/// Install the file logger. The returned guard flushes on drop.
fn init_logging(data_dir: &Path) -> WorkerGuard {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&log_dir, "padelcoach");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    guard
}

async fn run<B: SlotBackend>(command: Commands, tracker: &mut Tracker<B>) -> anyhow::Result<()> {
    match command {
        Commands::Session { action } => match action {
            SessionAction::Add(args) => {
                let session = tracker.log_session(args.into_form())?;
                println!("Saved session {}", session.id);
                println!("{}", render::session_line(session));
            }
            SessionAction::List { limit } => {
                let sessions = recent(tracker.sessions(), limit.unwrap_or(usize::MAX));
                if sessions.is_empty() {
                    println!("No sessions logged yet.");
                }
                for session in sessions {
                    println!("{}", render::session_line(session));
                }
            }
        },
        Commands::Match { action } => match action {
            MatchAction::Add(args) => {
                let m = tracker.log_match(args.into_form())?;
                println!("Saved match {}", m.id);
                println!("{}", render::match_line(m));
            }
            MatchAction::List => {
                if tracker.matches().is_empty() {
                    println!("No matches logged yet.");
                }
                for m in tracker.matches() {
                    println!("{}", render::match_line(m));
                }
            }
        },
        Commands::Analyze { video, shot, mime } => {
            let clip = VideoClip::from_path(&video, mime.as_deref())
                .with_context(|| format!("Failed to read video {}", video.display()))?;
            let client = CoachConfig::from_env().client()?;

            println!("Analysing your {} ...", shot.label());
            match tracker.analyze_video(&client, &clip, shot).await {
                Ok(entry) => {
                    println!("{}", render::analysis_detail(entry));
                    println!("Saved as {}", entry.id);
                }
                Err(e) => {
                    tracing::error!("Video analysis failed: {}", e);
                    anyhow::bail!("The video could not be analysed, please try again ({e})");
                }
            }
        }
        Commands::Analyses { action } => match action {
            AnalysesAction::List => {
                if tracker.analyses().is_empty() {
                    println!("No analyses yet.");
                }
                for entry in tracker.analyses() {
                    println!("{}", render::analysis_line(entry));
                }
            }
            AnalysesAction::Show { id } => {
                let entry = tracker
                    .analysis(&id)
                    .with_context(|| format!("No analysis with id {id}"))?;
                print!("{}", render::analysis_detail(entry));
            }
        },
        Commands::Advice => {
            let advice = match CoachConfig::from_env().client() {
                Ok(client) => tracker.daily_advice(&client).await,
                Err(e) => {
                    tracing::warn!("Advice unavailable, using fallback: {}", e);
                    FALLBACK_ADVICE.to_string()
                }
            };
            println!("{advice}");
        }
        Commands::Stats { json } => {
            let stats = tracker.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let text = render::dashboard(&stats, tracker.sessions(), tracker.analyses());
                print!("{text}");
            }
        }
        Commands::Learn { shot } => {
            let clips: Vec<_> = match shot {
                Some(shot) => clips_for(shot).collect(),
                None => CATALOG.iter().collect(),
            };
            if clips.is_empty() {
                println!("No clips for that shot yet.");
            }
            for clip in clips {
                println!("{}\n", render::clip(clip));
            }
        }
        Commands::Import { slot, file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let added = tracker.import(slot, &contents)?;
            println!("Imported {added} new {slot}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(config::get_data_dir);
    let _guard = init_logging(&data_dir);

    tracing::info!("padelcoach starting");
    let mut tracker = Tracker::open_dir(data_dir);
    let outcome = run(cli.command, &mut tracker).await;
    if let Err(e) = &outcome {
        tracing::warn!("Command failed: {:#}", e);
    }
    outcome
}
