//! Gateways between the engine and persisted troop state.
//!
//! Members and advancement records live together in one troop document,
//! so a naive fetch-mutate-put cycle loses updates under concurrent
//! writers. Every read here carries the document version it was taken
//! at, and every write is conditional on that version. A stale write
//! fails with `VersionConflict` and the caller re-reads and reapplies.

pub mod document;
pub mod error;

pub use document::{DocumentStore, TroopDocument};
pub use error::StoreError;

use crate::catalog::Rank;
use crate::models::{AdvancementRecord, Member};

/// An entity together with the troop-document version it was read at.
/// Pass the version back to the conditional write that follows.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Read access to the member roster, plus the single rank write the
/// engine performs. Roster maintenance is not the engine's concern.
pub trait MemberDirectory {
    fn get_member(&self, member_id: &str) -> Result<Versioned<Member>, StoreError>;

    /// Conditionally write a member's rank. Only used outside the
    /// coordinated pair-commit; the coordinator goes through
    /// [`RecordStore::commit_pair`] instead.
    fn set_rank(&self, member_id: &str, rank: Rank, expected_version: u64)
        -> Result<(), StoreError>;
}

/// Read/write access to advancement records.
pub trait RecordStore {
    fn get_record(&self, record_id: &str) -> Result<Versioned<AdvancementRecord>, StoreError>;

    fn list_records(&self) -> Result<Versioned<Vec<AdvancementRecord>>, StoreError>;

    /// Conditionally write a single record (requirement toggles, notes,
    /// non-terminal status transitions).
    fn save_record(
        &self,
        record: &AdvancementRecord,
        expected_version: u64,
    ) -> Result<(), StoreError>;

    /// Atomically commit a record and its member as one unit. A reader
    /// must never observe one applied without the other.
    fn commit_pair(
        &self,
        record: &AdvancementRecord,
        member: &Member,
        expected_version: u64,
    ) -> Result<(), StoreError>;
}
