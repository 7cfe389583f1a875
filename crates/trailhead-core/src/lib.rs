//! Advancement workflow engine for troop rank tracking.
//!
//! This crate owns the core logic behind a troop's rank advancement
//! workflow:
//!
//! - `catalog`: the fixed rank progression and per-rank requirement ids
//! - `models`: members, advancement records, and the workflow status
//! - `engine`: the checklist evaluator, the forward-only status state
//!   machine, and the coordinator that awards a rank on board-of-review
//!   completion
//! - `store`: version-checked gateways over the shared troop document
//! - `summary`: pure roster summaries for dashboard views
//!
//! The calling application (forms, REST endpoints, terminal UI) owns
//! presentation, auth, and roster CRUD; the engine only reads members,
//! writes a member's rank, and reads/writes advancement records.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
pub mod summary;

pub use catalog::{requirements_for, Rank, ALL_RANKS};
pub use engine::{advisory_next, evaluate, transition, ChecklistProgress, Coordinator};
pub use engine::coordinator::ReviewOutcome;
pub use error::EngineError;
pub use models::{AdvancementRecord, AdvancementStatus, Member};
pub use store::{DocumentStore, MemberDirectory, RecordStore, StoreError, TroopDocument, Versioned};
