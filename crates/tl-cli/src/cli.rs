//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal day and job time log.
///
/// Records when the working day starts, pauses and ends, and which job is
/// being worked on, then reports how the day was spent.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start, pause, resume or end the working day.
    #[command(subcommand)]
    Day(DayAction),

    /// Start or stop a job.
    #[command(subcommand)]
    Job(JobAction),

    /// List today's events.
    Print,

    /// Show today's working, pause and per-job time.
    Times {
        /// Also list the jobs whose name starts with this prefix.
        prefix: Option<String>,
    },
}

/// Day-level transitions.
///
/// OFFSET is either whole minutes relative to now (`-15`, `30`) or a clock
/// time today (`08:45`). Numbers are written with at least two digits.
#[derive(Debug, Clone, Subcommand)]
pub enum DayAction {
    /// Start the day.
    Start {
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// Start a pause.
    Away {
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// Come back from a pause.
    Back {
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// End the day, stopping any running job.
    End {
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
}

impl DayAction {
    pub fn offset(&self) -> Option<&str> {
        match self {
            Self::Start { offset }
            | Self::Away { offset }
            | Self::Back { offset }
            | Self::End { offset } => offset.as_deref(),
        }
    }
}

/// Job-level transitions. OFFSET works as for `day`.
#[derive(Debug, Clone, Subcommand)]
pub enum JobAction {
    /// Start a job. Running jobs are stopped first.
    Start {
        /// The job name.
        id: String,
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
    /// Stop a running job.
    Stop {
        /// The job name.
        id: String,
        #[arg(allow_hyphen_values = true)]
        offset: Option<String>,
    },
}

impl JobAction {
    pub fn id(&self) -> &str {
        match self {
            Self::Start { id, .. } | Self::Stop { id, .. } => id,
        }
    }

    pub fn offset(&self) -> Option<&str> {
        match self {
            Self::Start { offset, .. } | Self::Stop { offset, .. } => offset.as_deref(),
        }
    }
}
