//! Data models for troop advancement tracking:
//!
//! - `Member`: the person whose rank is being tracked
//! - `AdvancementRecord`: one member's attempt at one rank
//! - `AdvancementStatus`: the forward-only workflow status

pub mod member;
pub mod record;

pub use member::Member;
pub use record::{AdvancementRecord, AdvancementStatus, ALL_STATUSES};
