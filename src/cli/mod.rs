use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config;
use crate::domain::waveform::Waveform;
use crate::session::{Session, stats::SessionSummary};

#[derive(Parser)]
#[command(name = "djcache")]
#[command(version = "0.1")]
#[command(about = "DJ session simulator with an LRU track cache and two decks")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "dj_config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List library tracks
    Library {
        /// Also print the first SAMPLES waveform values of each track
        #[arg(long, value_name = "SAMPLES")]
        waveform: Option<usize>,
    },
    /// List configured playlists
    Playlists,
    /// Play one playlist through the cache and decks
    Play {
        /// Playlist name from the config
        name: String,
        /// Leave a title out of this run (repeatable)
        #[arg(long, value_name = "TITLE")]
        skip: Vec<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play every playlist in name order
    PlayAll {
        /// Print the summaries as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::Config::load(&cli.config)?;
    let mut session = Session::new(cfg).with_context(|| "Failed to start session")?;

    match &cli.command {
        Commands::Library { waveform } => {
            let library = session.library();
            println!("Library contains {} tracks", library.len());
            for (i, track) in library.tracks().enumerate() {
                let meta = track.metadata();
                println!(
                    "  {:>2}. [{}] {} - {} ({}s, {} BPM, quality {:.1})",
                    i + 1,
                    track.format(),
                    meta.title(),
                    meta.artists().join(", "),
                    meta.duration_secs(),
                    meta.bpm(),
                    track.quality_score()
                );
                if let Some(count) = *waveform {
                    println!("      {}", waveform_preview(meta.waveform(), count));
                }
            }
        }

        Commands::Playlists => {
            let names = session.playlist_names().map(str::to_string).collect::<Vec<_>>();
            if names.is_empty() {
                println!("No playlists configured");
            }
            for name in names {
                match session.load_playlist(&name) {
                    Ok(playlist) => println!(
                        "  {} ({} tracks, {} seconds)",
                        name,
                        playlist.len(),
                        playlist.total_duration(session.library())
                    ),
                    Err(e) => println!("  {name} [unplayable: {e}]"),
                }
            }
        }

        Commands::Play { name, skip, json } => {
            let summary = session
                .play_playlist_skipping(name, skip)
                .with_context(|| format!("Failed to play playlist '{name}'"))?;
            println!("{}", render_summaries(&[summary], *json)?);
        }

        Commands::PlayAll { json } => {
            let summaries = session.play_all();
            println!("{}", render_summaries(&summaries, *json)?);
            if !*json {
                println!("All playlists played");
            }
        }
    }

    Ok(())
}

/// JSON array of summaries, or one text block per summary
fn render_summaries(summaries: &[SessionSummary], json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(summaries)?);
    }
    Ok(summaries
        .iter()
        .map(|summary| format!("\n{summary}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn waveform_preview(waveform: &Waveform, count: usize) -> String {
    match waveform.copy_prefix(count) {
        Some(samples) => {
            let values = samples.iter().map(|s| format!("{s:.3}")).collect::<Vec<_>>();
            format!("waveform: [{}]", values.join(", "))
        }
        None => format!("waveform: only {} samples available", waveform.len()),
    }
}
