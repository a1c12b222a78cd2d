//! Intermediate-result checkpointing.
//!
//! Every Nth successfully analyzed page, the whole aggregate is rewritten
//! to one JSON file, wholesale, not appended. This is a crash-recovery and
//! observability measure, not a correctness requirement: there is no
//! resume-from-checkpoint logic, it exists so partial progress is
//! inspectable if the run is killed.

use crate::error::Result;
use sitescope_core::AggregateResult;
use std::fs;
use std::path::PathBuf;

/// Pages between checkpoint writes.
pub const CHECKPOINT_EVERY: usize = 5;

/// Rewrites the aggregate to disk on a fixed page cadence.
pub struct Checkpointer {
    path: PathBuf,
    every: usize,
    analyzed: usize,
}

impl Checkpointer {
    /// Checkpoint to `path` every [`CHECKPOINT_EVERY`] analyzed pages.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_interval(path, CHECKPOINT_EVERY)
    }

    /// Checkpoint on a custom cadence.
    #[must_use]
    pub fn with_interval(path: PathBuf, every: usize) -> Self {
        Self {
            path,
            every: every.max(1),
            analyzed: 0,
        }
    }

    /// Count one successfully analyzed page; write when the count is due.
    ///
    /// Returns whether a checkpoint was written.
    pub fn record_analyzed(&mut self, aggregate: &AggregateResult) -> Result<bool> {
        self.analyzed += 1;
        if self.analyzed % self.every == 0 {
            self.write(aggregate)?;
            tracing::debug!(
                "Checkpoint written after {} analyzed pages: {}",
                self.analyzed,
                self.path.display()
            );
            return Ok(true);
        }
        Ok(false)
    }

    /// Rewrite the checkpoint file wholesale.
    pub fn write(&self, aggregate: &AggregateResult) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(aggregate)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Where the checkpoint lands.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
