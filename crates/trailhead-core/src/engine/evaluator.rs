//! Requirement checklist evaluation.
//!
//! Pure functions over a record's requirement map and the catalog set
//! for its rank. Results are informational: a full checklist suggests
//! the next step but never triggers a transition by itself.

use crate::catalog;
use crate::models::{AdvancementRecord, AdvancementStatus};

/// Completion summary for one record's requirement checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 when the set is empty.
    pub percent: u8,
    pub is_fully_satisfied: bool,
}

/// Compute checklist progress for `record` against the catalog set for
/// its rank. Identifiers missing from the record count as incomplete;
/// identifiers outside the catalog set are ignored.
pub fn evaluate(record: &AdvancementRecord) -> ChecklistProgress {
    let ids = catalog::requirements_for(record.rank);
    let total = ids.len();
    let completed = ids
        .iter()
        .filter(|id| record.requirements.get(**id).copied().unwrap_or(false))
        .count();

    let percent = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };

    ChecklistProgress {
        completed,
        total,
        percent,
        is_fully_satisfied: total > 0 && completed == total,
    }
}

/// The status the record looks ready to move to, if any.
///
/// A full checklist at `In Progress` suggests the scoutmaster conference;
/// a completed conference suggests the board of review. Advisory only:
/// the caller must still request the transition explicitly.
pub fn advisory_next(record: &AdvancementRecord) -> Option<AdvancementStatus> {
    match record.status {
        AdvancementStatus::InProgress if evaluate(record).is_fully_satisfied => {
            Some(AdvancementStatus::ReadyForConference)
        }
        AdvancementStatus::ConferenceComplete => Some(AdvancementStatus::ReadyForReview),
        _ => None,
    }
}
