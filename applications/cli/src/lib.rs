//! Mixtape terminal player
//!
//! Application shell, playlist view, text commands and a rodio-backed
//! media primitive around the Mixtape libraries.

pub mod command;
pub mod config;
pub mod error;
pub mod media;
pub mod shell;
pub mod view;

pub use command::Command;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use media::RodioMedia;
pub use shell::{collect_uploads, Outcome, Shell};
