//! Progress checkpoints for long-running operations
//!
//! Every pipeline reports at its phase boundaries. A reporter can stop the
//! operation by answering [`Checkpoint::Cancel`]; the pipeline then returns
//! [`BookletError::Cancelled`] without producing output.

use crate::types::{BookletError, Result};
use std::fmt;
use tokio::sync::mpsc;

/// Pipeline phase reached at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Numbering,
    Padding,
    Reordering,
    Merging,
    Serializing,
    Complete,
}

impl Phase {
    /// Nominal completion percentage when this phase starts
    pub fn percent(self) -> u8 {
        match self {
            Phase::Loading => 0,
            Phase::Numbering => 20,
            Phase::Padding => 40,
            Phase::Reordering | Phase::Merging => 60,
            Phase::Serializing => 80,
            Phase::Complete => 100,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Loading => "loading",
            Phase::Numbering => "numbering",
            Phase::Padding => "padding",
            Phase::Reordering => "reordering",
            Phase::Merging => "merging",
            Phase::Serializing => "serializing",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub phase: Phase,
    pub percent: u8,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            percent: phase.percent(),
            message: message.into(),
        }
    }
}

/// Answer from a reporter at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Continue,
    Cancel,
}

/// Receives progress at phase boundaries
pub trait ProgressReporter: Send {
    fn checkpoint(&mut self, update: ProgressUpdate) -> Checkpoint;
}

/// Reporter that ignores all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn checkpoint(&mut self, _update: ProgressUpdate) -> Checkpoint {
        Checkpoint::Continue
    }
}

/// Forwards updates over a channel; a dropped receiver cancels the operation.
impl ProgressReporter for mpsc::UnboundedSender<ProgressUpdate> {
    fn checkpoint(&mut self, update: ProgressUpdate) -> Checkpoint {
        match self.send(update) {
            Ok(()) => Checkpoint::Continue,
            Err(_) => Checkpoint::Cancel,
        }
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &mut R {
    fn checkpoint(&mut self, update: ProgressUpdate) -> Checkpoint {
        (**self).checkpoint(update)
    }
}

/// Report `phase` and turn a cancel answer into an error
pub(crate) fn checkpoint<R: ProgressReporter + ?Sized>(
    reporter: &mut R,
    phase: Phase,
    message: impl Into<String>,
) -> Result<()> {
    let update = ProgressUpdate::new(phase, message);
    log::debug!("[{:>3}%] {}", update.percent, update.message);
    match reporter.checkpoint(update) {
        Checkpoint::Continue => Ok(()),
        Checkpoint::Cancel => Err(BookletError::Cancelled(phase)),
    }
}
