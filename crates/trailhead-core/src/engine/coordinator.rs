//! Rank progression on board-of-review completion.
//!
//! Completing the board of review is the one place where two entities
//! change together: the record reaches `Awarded` and the member's rank
//! moves to the next one in the catalog. The pair is committed through
//! the gateway's atomic `commit_pair`; on a version conflict the whole
//! operation is re-read and reapplied, a bounded number of times.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::engine::transition::transition;
use crate::error::EngineError;
use crate::models::{AdvancementRecord, AdvancementStatus, Member};
use crate::store::{MemberDirectory, RecordStore, StoreError};

/// Maximum retries after a version conflict before surfacing it.
/// Conflicts come from other writers on the same troop document and
/// clear quickly, so a small bound is enough.
const MAX_COMMIT_RETRIES: u32 = 3;

/// Initial backoff after a conflicted commit, doubled per retry.
const INITIAL_BACKOFF_MS: u64 = 25;

/// Outcome of a completed board of review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub record: AdvancementRecord,
    pub member: Member,
    /// `false` when the member was already at the top rank; the record
    /// still documents the award.
    pub rank_advanced: bool,
}

pub struct Coordinator<G> {
    gateway: G,
}

impl<G: MemberDirectory + RecordStore> Coordinator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Complete the board of review for `record_id` as of `today`.
    ///
    /// The record must currently be `Ready for Board of Review`. The
    /// review and completion dates are stamped, the record reaches
    /// `Awarded`, and the member advances to the successor of the
    /// record's rank (unchanged when the record is for the top rank).
    /// Record and member are committed as one atomic unit; a reader
    /// never observes one without the other.
    pub fn complete_review(
        &self,
        record_id: &str,
        today: NaiveDate,
    ) -> Result<ReviewOutcome, EngineError> {
        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let mut attempt: u32 = 0;

        loop {
            let snapshot = self.gateway.get_record(record_id)?;
            let version = snapshot.version;
            let record = snapshot.value;

            // Missing member aborts before anything is written
            let mut member = self.gateway.get_member(&record.member_id)?.value;

            if record.status != AdvancementStatus::ReadyForReview {
                return Err(EngineError::InvalidTransition {
                    from: record.status,
                    to: AdvancementStatus::ReviewComplete,
                });
            }

            // Two forward steps: the review completes, then the award
            let record = transition(&record, AdvancementStatus::ReviewComplete, today)?;
            let record = transition(&record, AdvancementStatus::Awarded, today)?;

            let rank_advanced = match record.rank.successor() {
                Some(next) => {
                    member.rank = next;
                    true
                }
                None => false,
            };

            match self.gateway.commit_pair(&record, &member, version) {
                Ok(()) => {
                    debug!(
                        record = %record.id,
                        member = %member.id,
                        rank = %record.rank,
                        advanced = rank_advanced,
                        "Board of review complete, advancement awarded"
                    );
                    return Ok(ReviewOutcome {
                        record,
                        member,
                        rank_advanced,
                    });
                }
                Err(StoreError::VersionConflict { expected, actual })
                    if attempt < MAX_COMMIT_RETRIES =>
                {
                    attempt += 1;
                    warn!(
                        record = %record_id,
                        expected,
                        actual,
                        attempt,
                        "Commit conflicted, re-reading and reapplying"
                    );
                    std::thread::sleep(Duration::from_millis(backoff_ms));
                    backoff_ms *= 2;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rank;
    use crate::store::DocumentStore;
    use std::sync::Arc;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn store_with(member: Member, mut record: AdvancementRecord) -> DocumentStore {
        // Walk the record to Ready for Board of Review with valid stamps
        record.status = AdvancementStatus::ReadyForReview;
        record.scoutmaster_conference_date = Some(day("2026-04-01"));
        let store = DocumentStore::in_memory();
        store.insert_member(member).unwrap();
        store.insert_record(record).unwrap();
        store
    }

    #[test]
    fn test_award_advances_member_to_successor_rank() {
        // Scenario: Life record for a Life member awards Eagle
        let store = store_with(
            Member::new("m1", "Alex", "Rivera", Rank::Life),
            AdvancementRecord::new("a1", "m1", Rank::Life, day("2026-03-01")),
        );
        let coordinator = Coordinator::new(store);

        let outcome = coordinator.complete_review("a1", day("2026-06-10")).unwrap();
        assert!(outcome.rank_advanced);
        assert_eq!(outcome.member.rank, Rank::Eagle);
        assert_eq!(outcome.record.status, AdvancementStatus::Awarded);
        assert_eq!(outcome.record.board_of_review_date, Some(day("2026-06-10")));
        assert_eq!(outcome.record.date_completed, Some(day("2026-06-10")));

        // Both halves of the commit are visible
        let gateway = coordinator.gateway();
        assert_eq!(gateway.get_member("m1").unwrap().value.rank, Rank::Eagle);
        assert_eq!(
            gateway.get_record("a1").unwrap().value.status,
            AdvancementStatus::Awarded
        );
    }

    #[test]
    fn test_top_rank_award_leaves_member_unchanged() {
        // Scenario: Eagle record for an Eagle member
        let store = store_with(
            Member::new("m1", "Alex", "Rivera", Rank::Eagle),
            AdvancementRecord::new("a1", "m1", Rank::Eagle, day("2026-03-01")),
        );
        let coordinator = Coordinator::new(store);

        let outcome = coordinator.complete_review("a1", day("2026-06-10")).unwrap();
        assert!(!outcome.rank_advanced);
        assert_eq!(outcome.member.rank, Rank::Eagle);
        assert_eq!(outcome.record.status, AdvancementStatus::Awarded);
    }

    #[test]
    fn test_wrong_status_is_rejected_without_commit() {
        let store = DocumentStore::in_memory();
        store
            .insert_member(Member::new("m1", "Alex", "Rivera", Rank::Scout))
            .unwrap();
        store
            .insert_record(AdvancementRecord::new(
                "a1",
                "m1",
                Rank::Scout,
                day("2026-03-01"),
            ))
            .unwrap();
        let version_before = store.version();
        let coordinator = Coordinator::new(store);

        let err = coordinator
            .complete_review("a1", day("2026-06-10"))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert_eq!(coordinator.gateway().version(), version_before);
    }

    #[test]
    fn test_missing_member_aborts_whole_operation() {
        let store = DocumentStore::in_memory();
        let mut record = AdvancementRecord::new("a1", "ghost", Rank::Star, day("2026-03-01"));
        record.status = AdvancementStatus::ReadyForReview;
        record.scoutmaster_conference_date = Some(day("2026-04-01"));
        store.insert_record(record).unwrap();
        let coordinator = Coordinator::new(store);

        let err = coordinator
            .complete_review("a1", day("2026-06-10"))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(StoreError::MemberNotFound(_))
        ));
        assert_eq!(
            coordinator.gateway().get_record("a1").unwrap().value.status,
            AdvancementStatus::ReadyForReview
        );
    }

    #[test]
    fn test_concurrent_reviews_both_land() {
        // Two members, two ready records, one shared document
        let store = DocumentStore::in_memory();
        store
            .insert_member(Member::new("m1", "Alex", "Rivera", Rank::Star))
            .unwrap();
        store
            .insert_member(Member::new("m2", "Sam", "Okafor", Rank::Tenderfoot))
            .unwrap();
        for (rec_id, member_id, rank) in
            [("a1", "m1", Rank::Star), ("a2", "m2", Rank::Tenderfoot)]
        {
            let mut rec = AdvancementRecord::new(rec_id, member_id, rank, day("2026-03-01"));
            rec.status = AdvancementStatus::ReadyForReview;
            rec.scoutmaster_conference_date = Some(day("2026-04-01"));
            store.insert_record(rec).unwrap();
        }

        let coordinator = Arc::new(Coordinator::new(store));
        let handles: Vec<_> = ["a1", "a2"]
            .into_iter()
            .map(|rec_id| {
                let coordinator = Arc::clone(&coordinator);
                std::thread::spawn(move || coordinator.complete_review(rec_id, day("2026-06-10")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        // Neither update was lost
        let gateway = coordinator.gateway();
        assert_eq!(gateway.get_member("m1").unwrap().value.rank, Rank::Life);
        assert_eq!(
            gateway.get_member("m2").unwrap().value.rank,
            Rank::SecondClass
        );
        assert_eq!(
            gateway.get_record("a1").unwrap().value.status,
            AdvancementStatus::Awarded
        );
        assert_eq!(
            gateway.get_record("a2").unwrap().value.status,
            AdvancementStatus::Awarded
        );
    }
}
