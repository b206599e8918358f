//! Interactive answers for the controller's questions.

use std::io::{BufRead, Write};

use tl_core::{JobId, Prompt};

use crate::Config;

/// Asks on a line-oriented terminal.
///
/// Each question can be switched off in the configuration, in which case the
/// non-interactive answer is used without reading input.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
    ask_for_job: bool,
    confirm_parallel_jobs: bool,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub const fn new(input: R, output: W, config: &Config) -> Self {
        Self {
            input,
            output,
            ask_for_job: config.prompt_for_job,
            confirm_parallel_jobs: config.confirm_parallel_jobs,
        }
    }

    /// Prints `question` and reads one trimmed line. `None` on end of input.
    fn ask(&mut self, question: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{question}").and_then(|()| self.output.flush()) {
            tracing::warn!(error = %e, "failed to write prompt");
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn job_after_day_start(&mut self) -> Option<JobId> {
        if !self.ask_for_job {
            return None;
        }
        let answer = self.ask("Start a job (or leave empty not to): ")?;
        JobId::new(answer).ok()
    }

    fn stop_running_jobs(&mut self, running: &[JobId]) -> bool {
        if !self.confirm_parallel_jobs {
            return true;
        }

        let list = running
            .iter()
            .map(JobId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let question = format!("Jobs in progress: {list}\nStop them first? (y/n)> ");
        loop {
            match self.ask(&question).as_deref() {
                Some("y") | None => return true,
                Some("n") => return false,
                Some(_) => {}
            }
        }
    }
}
