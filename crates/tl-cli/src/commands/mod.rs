//! CLI subcommand implementations.

pub mod day;
pub mod job;
pub mod print;
pub mod times;
mod util;
