use crate::modules::hour_ledger::core::client::{ClientRecord, ClientTotals};
use crate::modules::hour_ledger::core::locate::{LedgerTarget, LocateError};
use crate::modules::hour_ledger::core::overage::Overage;
use thiserror::Error;

/// Input errors that stop one entry's processing without failing the delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("entry has no clientId")]
    MissingClientId,

    #[error("entry carries negative minutes ({minutes})")]
    NegativeMinutes { minutes: i64 },

    #[error("client {client_id} not found")]
    ClientNotFound { client_id: String },

    #[error(transparent)]
    Locate(#[from] LocateError),
}

impl SkipReason {
    /// True when the entry references documents that do not exist or do not match.
    pub fn is_data_inconsistency(&self) -> bool {
        match self {
            SkipReason::MissingClientId | SkipReason::NegativeMinutes { .. } => false,
            SkipReason::ClientNotFound { .. } => true,
            SkipReason::Locate(error) => !error.is_caller_error(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub target: LedgerTarget,
    /// Next version of the client, tree and totals recomputed.
    pub client: ClientRecord,
    pub totals: ClientTotals,
    pub overage: Overage,
    /// Flags to write onto the entry document, if any.
    pub entry_flags: Option<Overage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Accepted { reconciliation: Reconciliation },
    Skipped { reason: SkipReason },
}
