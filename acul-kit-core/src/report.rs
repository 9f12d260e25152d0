//! Per-screen outcomes and the tally every command prints at the end.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ItemStatus {
    Succeeded,
    /// Produced something usable after a fallback (e.g. placeholder bundle).
    Recovered(String),
    /// Nothing to do for this item; not counted as a failure.
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub screen: String,
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn succeeded(screen: &str) -> Self {
        Self::new(screen, ItemStatus::Succeeded)
    }

    pub fn recovered(screen: &str, reason: impl Into<String>) -> Self {
        Self::new(screen, ItemStatus::Recovered(reason.into()))
    }

    pub fn skipped(screen: &str, reason: impl Into<String>) -> Self {
        Self::new(screen, ItemStatus::Skipped(reason.into()))
    }

    pub fn failed(screen: &str, reason: impl Into<String>) -> Self {
        Self::new(screen, ItemStatus::Failed(reason.into()))
    }

    fn new(screen: &str, status: ItemStatus) -> Self {
        Self {
            screen: screen.to_string(),
            status,
        }
    }
}

/// `succeeded` counts clean and recovered items; skipped items count only in `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[ItemOutcome]) -> Self {
        outcomes.iter().fold(
            RunSummary {
                total: outcomes.len(),
                ..Default::default()
            },
            |mut acc, outcome| {
                match outcome.status {
                    ItemStatus::Succeeded | ItemStatus::Recovered(_) => acc.succeeded += 1,
                    ItemStatus::Skipped(_) => acc.skipped += 1,
                    ItemStatus::Failed(_) => acc.failed += 1,
                }
                acc
            },
        )
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "  Succeeded: {}", self.succeeded)?;
        writeln!(f, "  Failed:    {}", self.failed)?;
        if self.skipped > 0 {
            writeln!(f, "  Skipped:   {}", self.skipped)?;
        }
        writeln!(f, "  Total:     {}", self.total)?;
        write!(f, "{rule}")
    }
}
