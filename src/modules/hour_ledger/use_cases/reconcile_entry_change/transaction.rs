// Phases of one reconciliation attempt.
//
// Start -> ReadsComplete -> TargetResolved -> Recomputed -> WritesQueued -> Committed, with
// Aborted reachable from any phase before WritesQueued. A retried attempt starts over at Start.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPhase {
    Start,
    ReadsComplete,
    TargetResolved,
    Recomputed,
    WritesQueued,
    Committed,
    Aborted,
}

impl TransactionPhase {
    pub fn permits(self, next: TransactionPhase) -> bool {
        use TransactionPhase::*;
        matches!(
            (self, next),
            (Start, ReadsComplete)
                | (ReadsComplete, TargetResolved)
                | (TargetResolved, Recomputed)
                | (Recomputed, WritesQueued)
                | (WritesQueued, Committed)
                | (Start | ReadsComplete | TargetResolved | Recomputed, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionPhase::Committed | TransactionPhase::Aborted)
    }
}

impl fmt::Display for TransactionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionPhase::Start => "start",
            TransactionPhase::ReadsComplete => "reads_complete",
            TransactionPhase::TargetResolved => "target_resolved",
            TransactionPhase::Recomputed => "recomputed",
            TransactionPhase::WritesQueued => "writes_queued",
            TransactionPhase::Committed => "committed",
            TransactionPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("illegal transaction transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: TransactionPhase,
    pub to: TransactionPhase,
}

/// Tracks the phase of one attempt and logs every transition.
#[derive(Debug)]
pub struct Transaction<'a> {
    entry_id: &'a str,
    attempt: u32,
    phase: TransactionPhase,
}

impl<'a> Transaction<'a> {
    pub fn begin(entry_id: &'a str, attempt: u32) -> Self {
        tracing::debug!(entry_id, attempt, phase = %TransactionPhase::Start, "transaction phase");
        Self {
            entry_id,
            attempt,
            phase: TransactionPhase::Start,
        }
    }

    pub fn phase(&self) -> TransactionPhase {
        self.phase
    }

    pub fn advance(&mut self, next: TransactionPhase) -> Result<(), IllegalTransition> {
        if !self.phase.permits(next) {
            return Err(IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(
            entry_id = self.entry_id,
            attempt = self.attempt,
            from = %self.phase,
            phase = %next,
            "transaction phase"
        );
        self.phase = next;
        Ok(())
    }
}
