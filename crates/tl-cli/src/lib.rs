//! Time log CLI library.
//!
//! This crate provides the CLI interface for the time log.

mod cli;
pub mod commands;
mod config;
mod prompt;
mod session;

pub use cli::{Cli, Commands, DayAction, JobAction};
pub use config::Config;
pub use prompt::LinePrompt;
pub use session::Session;
