use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("advancement record not found: {0}")]
    RecordNotFound(String),

    #[error("version conflict: wrote against version {expected}, document is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("member {member_id} already has an awarded {rank} advancement")]
    DuplicateAward { member_id: String, rank: String },

    #[error("record rejected: {0}")]
    InvalidRecord(String),

    #[error("failed to read or write troop document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse troop document: {0}")]
    Parse(#[from] serde_json::Error),
}
