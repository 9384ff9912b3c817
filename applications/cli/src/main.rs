/// Mixtape - terminal music player
use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use mixtape::{
    view::{now_playing, PlaylistView},
    AppConfig, Command, Outcome, RodioMedia, Shell,
};
use mixtape_core::KeyValueStore;
use mixtape_playback::{MediaPrimitive, PlaybackEvent};
use mixtape_storage::{JsonFileStore, MemoryStore, ObjectUrlRegistry};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often media progress is polled between commands
const TICK: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "mixtape")]
#[command(about = "Upload audio files, build a playlist and play it", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MIXTAPE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file holding the playlist and last-played position
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    /// Keep the playlist in memory only; nothing is saved on exit
    #[arg(long, conflicts_with = "state_file")]
    in_memory: bool,

    /// Files or directories to add at start
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = cli.state_file {
        config.storage.state_file = Some(path);
    }
    if cli.in_memory {
        config.storage.in_memory = true;
    }
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let store: Arc<dyn KeyValueStore> = match config.state_file() {
        Some(path) => {
            tracing::info!("State file: {}", path.display());
            Arc::new(JsonFileStore::open(path))
        }
        None if config.storage.in_memory => {
            tracing::info!("In-memory mode, playlist is not saved");
            Arc::new(MemoryStore::new())
        }
        None => {
            tracing::warn!("No data directory found, playlist is kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let registry = Arc::new(ObjectUrlRegistry::new());
    let media = RodioMedia::open(Arc::clone(&registry)).context("failed to open audio output")?;
    let mut shell = Shell::new(media, store, registry, &config);

    if !cli.files.is_empty() {
        let added = shell.add_paths(&cli.files);
        tracing::info!("Added {} tracks from the command line", added.len());
    }

    run(&mut shell)?;

    // Leaving pauses, which persists the position
    shell.controller_mut().pause();
    tracing::info!("Bye");
    Ok(())
}

fn run<S: KeyValueStore + Clone>(shell: &mut Shell<RodioMedia, S>) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    write!(
        stdout,
        "{}",
        PlaylistView::render(shell.tracks(), shell.controller().current_index())
    )?;
    writeln!(stdout, "{}", now_playing(&shell.snapshot()))?;
    writeln!(stdout, "Type `help` for commands.")?;
    shell.drain_events();

    let lines = spawn_stdin_reader();

    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => match Command::parse(&line) {
                Ok(Some(command)) => match shell.execute(command, &mut stdout) {
                    Ok(Outcome::Quit) => return Ok(()),
                    Ok(Outcome::Continue) => report(&mut stdout, shell, false)?,
                    Err(e) => {
                        writeln!(stdout, "error: {}", e)?;
                        shell.drain_events();
                    }
                },
                Ok(None) => {}
                Err(e) => writeln!(stdout, "{}", e)?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("stdin closed");
                return Ok(());
            }
        }

        let signals = shell.controller_mut().media_mut().poll_signals();
        shell.pump(signals);
        report(&mut stdout, shell, true)?;
    }
}

/// Print queued playback events
///
/// Track changes are only announced when they were not caused by a command
/// (auto-advance), since commands already print the status line.
fn report<M: MediaPrimitive, S: KeyValueStore + Clone>(
    out: &mut impl Write,
    shell: &mut Shell<M, S>,
    from_media: bool,
) -> io::Result<()> {
    let mut track_changed = false;

    for event in shell.drain_events() {
        tracing::trace!(?event, "Playback event");
        match event {
            PlaybackEvent::Error { message } => writeln!(out, "error: {}", message)?,
            PlaybackEvent::TrackChanged { .. } => track_changed = true,
            _ => {}
        }
    }

    if from_media && track_changed {
        writeln!(out, "{}", now_playing(&shell.snapshot()))?;
    }
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = bounded(16);

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}
