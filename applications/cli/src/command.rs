//! Text commands read from stdin

use crate::error::{CliError, Result};
use mixtape_core::TrackId;
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  add <path>...    upload files or directories
  list             show the playlist
  select <id>      play the track with this id
  delete <id>      remove the track with this id
  play | pause     start or pause playback
  toggle           play/pause
  next | prev      skip forward or back (wraps)
  volume <0-100>   set volume (unmutes)
  mute             toggle mute
  seek <secs>      jump to a position
  status           show the current track
  help             show this help
  quit             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Vec<PathBuf>),
    List,
    Select(TrackId),
    Delete(TrackId),
    Play,
    Pause,
    Toggle,
    Next,
    Previous,
    Volume(u8),
    Mute,
    Seek(f64),
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "add" | "upload" => {
                if args.is_empty() {
                    return Err(CliError::invalid_command("add needs at least one path"));
                }
                Command::Add(args.iter().map(PathBuf::from).collect())
            }
            "list" | "ls" => Command::List,
            "select" => Command::Select(track_id(&args)?),
            "delete" | "rm" => Command::Delete(track_id(&args)?),
            "play" => Command::Play,
            "pause" => Command::Pause,
            "toggle" | "p" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "previous" => Command::Previous,
            "volume" | "vol" => {
                let level = single(&args, "volume")?
                    .parse::<u8>()
                    .ok()
                    .filter(|v| *v <= 100)
                    .ok_or_else(|| CliError::invalid_command("volume must be 0-100"))?;
                Command::Volume(level)
            }
            "mute" => Command::Mute,
            "seek" => {
                let secs = single(&args, "seek")?
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .ok_or_else(|| CliError::invalid_command("seek needs a number of seconds"))?;
                Command::Seek(secs)
            }
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(CliError::invalid_command(format!(
                    "unknown command {:?} (try `help`)",
                    other
                )))
            }
        };

        Ok(Some(command))
    }
}

fn single<'a>(args: &[&'a str], name: &str) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(CliError::invalid_command(format!(
            "{} takes exactly one argument",
            name
        ))),
    }
}

fn track_id(args: &[&str]) -> Result<TrackId> {
    single(args, "track command")?
        .parse::<u64>()
        .map(TrackId::new)
        .map_err(|_| CliError::invalid_command("track id must be a number"))
}
