//! `tl day start|away|back|end`.

use std::io::Write;

use anyhow::Result;
use tl_core::{Prompt, effective_timestamp};

use super::util::write_outcomes;
use crate::DayAction;
use crate::session::Session;

/// Applies a day-level transition to today's log.
pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    action: &DayAction,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let at = effective_timestamp(session.clock(), action.offset())?;

    let outcomes = session.update_today(|controller| match action {
        DayAction::Start { .. } => controller.start_day(at, prompt),
        DayAction::Away { .. } => controller.pause_day(at),
        DayAction::Back { .. } => controller.resume_day(at),
        DayAction::End { .. } => controller.stop_day(at),
    })?;

    write_outcomes(writer, &outcomes)?;
    Ok(())
}
