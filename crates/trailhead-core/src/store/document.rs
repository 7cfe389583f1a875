//! A versioned troop document and the gateway adapter over it.
//!
//! The whole troop (roster plus advancement records) is stored as one
//! JSON document, the same shape the troop's existing data files use.
//! `DocumentStore` wraps the document in a mutex and exposes the gateway
//! traits with conditional, version-checked writes: within a process the
//! lock serializes writers, and the version check rejects any write built
//! from a stale snapshot.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Rank;
use crate::models::{AdvancementRecord, AdvancementStatus, Member};
use crate::store::{MemberDirectory, RecordStore, StoreError, Versioned};

/// Application name used for the default document path
const APP_NAME: &str = "trailhead";

/// Document file name
const DOCUMENT_FILE: &str = "troop.json";

/// The shared troop document: everything one troop tracks, plus a
/// monotonically increasing version bumped on every committed write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TroopDocument {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub records: Vec<AdvancementRecord>,
}

pub struct DocumentStore {
    inner: Mutex<TroopDocument>,
    path: Option<PathBuf>,
}

impl DocumentStore {
    /// A store with no backing file. Useful for tests and callers that
    /// handle persistence themselves.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(TroopDocument::default()),
            path: None,
        }
    }

    /// Open (or create) a file-backed store at `path`.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let document = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            TroopDocument::default()
        };
        debug!(path = %path.display(), version = document.version, "Opened troop document");
        Ok(Self {
            inner: Mutex::new(document),
            path: Some(path),
        })
    }

    /// Default document location under the platform data directory,
    /// e.g. `~/.local/share/trailhead/troop.json`.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not find data directory",
            ))
        })?;
        Ok(data_dir.join(APP_NAME).join(DOCUMENT_FILE))
    }

    /// Current document version.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Add a member to the roster. Roster CRUD belongs to the calling
    /// application; this exists so a store can be seeded.
    pub fn insert_member(&self, member: Member) -> Result<(), StoreError> {
        let version = self.version();
        self.commit(version, |doc| {
            doc.members.push(member.clone());
            Ok(())
        })
    }

    /// Add a new advancement record after validating its invariants.
    pub fn insert_record(&self, record: AdvancementRecord) -> Result<(), StoreError> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        let version = self.version();
        self.commit(version, |doc| {
            Self::check_duplicate_award(doc, &record)?;
            doc.records.push(record.clone());
            Ok(())
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TroopDocument> {
        // A poisoned lock means a writer panicked mid-apply; the document
        // itself is only replaced after a successful apply, so it is safe
        // to keep using.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a mutation to the document if and only if it is still at
    /// `expected_version`, then bump the version and persist. The
    /// mutation runs against a scratch copy, so a failed apply or a
    /// failed write leaves the document untouched.
    fn commit<F>(&self, expected_version: u64, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut TroopDocument) -> Result<(), StoreError>,
    {
        let mut doc = self.lock();
        if doc.version != expected_version {
            warn!(
                expected = expected_version,
                actual = doc.version,
                "Rejected write against a stale snapshot"
            );
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: doc.version,
            });
        }

        let mut next = doc.clone();
        apply(&mut next)?;
        next.version += 1;

        if let Some(ref path) = self.path {
            persist(&next, path)?;
        }

        debug!(version = next.version, "Committed troop document");
        *doc = next;
        Ok(())
    }

    /// Reject a record that would give a member a second awarded
    /// advancement for the same rank.
    fn check_duplicate_award(
        doc: &TroopDocument,
        record: &AdvancementRecord,
    ) -> Result<(), StoreError> {
        if record.status != AdvancementStatus::Awarded {
            return Ok(());
        }
        let duplicate = doc.records.iter().any(|r| {
            r.id != record.id
                && r.member_id == record.member_id
                && r.rank == record.rank
                && r.status == AdvancementStatus::Awarded
        });
        if duplicate {
            return Err(StoreError::DuplicateAward {
                member_id: record.member_id.clone(),
                rank: record.rank.to_string(),
            });
        }
        Ok(())
    }

    fn replace_record(
        doc: &mut TroopDocument,
        record: &AdvancementRecord,
    ) -> Result<(), StoreError> {
        let slot = doc
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::RecordNotFound(record.id.clone()))?;
        *slot = record.clone();
        Ok(())
    }
}

fn persist(document: &TroopDocument, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(document)?;
    std::fs::write(path, contents)?;
    Ok(())
}

impl MemberDirectory for DocumentStore {
    fn get_member(&self, member_id: &str) -> Result<Versioned<Member>, StoreError> {
        let doc = self.lock();
        let member = doc
            .members
            .iter()
            .find(|m| m.id == member_id)
            .cloned()
            .ok_or_else(|| StoreError::MemberNotFound(member_id.to_string()))?;
        Ok(Versioned {
            value: member,
            version: doc.version,
        })
    }

    fn set_rank(
        &self,
        member_id: &str,
        rank: Rank,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        self.commit(expected_version, |doc| {
            let member = doc
                .members
                .iter_mut()
                .find(|m| m.id == member_id)
                .ok_or_else(|| StoreError::MemberNotFound(member_id.to_string()))?;
            member.rank = rank;
            Ok(())
        })
    }
}

impl RecordStore for DocumentStore {
    fn get_record(&self, record_id: &str) -> Result<Versioned<AdvancementRecord>, StoreError> {
        let doc = self.lock();
        let record = doc
            .records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| StoreError::RecordNotFound(record_id.to_string()))?;
        Ok(Versioned {
            value: record,
            version: doc.version,
        })
    }

    fn list_records(&self) -> Result<Versioned<Vec<AdvancementRecord>>, StoreError> {
        let doc = self.lock();
        Ok(Versioned {
            value: doc.records.clone(),
            version: doc.version,
        })
    }

    fn save_record(
        &self,
        record: &AdvancementRecord,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        self.commit(expected_version, |doc| {
            Self::check_duplicate_award(doc, record)?;
            Self::replace_record(doc, record)
        })
    }

    fn commit_pair(
        &self,
        record: &AdvancementRecord,
        member: &Member,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        self.commit(expected_version, |doc| {
            Self::check_duplicate_award(doc, record)?;
            Self::replace_record(doc, record)?;
            let slot = doc
                .members
                .iter_mut()
                .find(|m| m.id == member.id)
                .ok_or_else(|| StoreError::MemberNotFound(member.id.clone()))?;
            *slot = member.clone();
            Ok(())
        })
    }
}
