use thiserror::Error;

use crate::models::AdvancementStatus;
use crate::store::StoreError;

/// Errors surfaced by the advancement engine.
///
/// Transition and input errors are recoverable: the caller rejects the
/// request and state is untouched. Store errors from a coordinated commit
/// are all-or-nothing at the record/member-pair granularity.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid transition: {from} -> {to} (expected the immediate successor)")]
    InvalidTransition {
        from: AdvancementStatus,
        to: AdvancementStatus,
    },

    #[error("unknown advancement status: {0}")]
    UnknownStatus(String),

    #[error("unknown rank: {0}")]
    UnknownRank(String),

    #[error("requirement {id} is not defined for rank {rank}")]
    UnknownRequirement { rank: String, id: String },

    #[error("record {id} violates an invariant: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
