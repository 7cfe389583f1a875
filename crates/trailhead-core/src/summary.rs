//! Roster summaries derived from members and advancement records.
//!
//! Pure helpers for the dashboard-style views the calling application
//! renders: how many active members hold each rank, and how many of a
//! member's tracked advancements have been awarded.

use std::collections::BTreeMap;

use crate::catalog::{Rank, ALL_RANKS};
use crate::models::{AdvancementRecord, AdvancementStatus, Member};

/// Count of active members at each rank, in progression order.
/// Ranks with no members are included with a zero count.
pub fn rank_distribution(members: &[Member]) -> Vec<(Rank, usize)> {
    ALL_RANKS
        .into_iter()
        .map(|rank| {
            let count = members
                .iter()
                .filter(|m| m.active && m.rank == rank)
                .count();
            (rank, count)
        })
        .collect()
}

/// Awarded-vs-tracked advancement counts for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardedSummary {
    pub member_id: String,
    pub awarded: usize,
    pub total: usize,
}

/// Per-member advancement counts, ordered by member id.
pub fn awarded_counts(records: &[AdvancementRecord]) -> Vec<AwardedSummary> {
    let mut by_member: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_member.entry(record.member_id.as_str()).or_default();
        entry.1 += 1;
        if record.status == AdvancementStatus::Awarded {
            entry.0 += 1;
        }
    }

    by_member
        .into_iter()
        .map(|(member_id, (awarded, total))| AwardedSummary {
            member_id: member_id.to_string(),
            awarded,
            total,
        })
        .collect()
}
