//! The advancement status state machine.
//!
//! Statuses move forward one step at a time. Each transition returns a
//! new record; nothing is persisted here. Milestone dates are stamped by
//! the transition that reaches them, never by hand.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EngineError;
use crate::models::{AdvancementRecord, AdvancementStatus};

/// Move `record` to `target`, which must be the immediate successor of
/// its current status. No skipping, no regressing, no re-entering.
///
/// Reaching `SM Conference Complete` stamps the conference date;
/// reaching `Board of Review Complete` stamps both the review date and
/// the completion date. The ready states and `Awarded` stamp nothing.
pub fn transition(
    record: &AdvancementRecord,
    target: AdvancementStatus,
    today: NaiveDate,
) -> Result<AdvancementRecord, EngineError> {
    if record.status.successor() != Some(target) {
        return Err(EngineError::InvalidTransition {
            from: record.status,
            to: target,
        });
    }

    let mut next = record.clone();
    next.status = target;
    match target {
        AdvancementStatus::ConferenceComplete => {
            next.scoutmaster_conference_date = Some(today);
        }
        AdvancementStatus::ReviewComplete => {
            next.board_of_review_date = Some(today);
            next.date_completed = Some(today);
        }
        _ => {}
    }

    debug!(
        record = %record.id,
        from = %record.status,
        to = %target,
        "Advancement status transition"
    );
    Ok(next)
}
