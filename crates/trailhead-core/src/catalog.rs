//! The rank catalog: the fixed progression order and the canonical
//! requirement identifiers for each rank.
//!
//! This is the single source of truth consumed by both the checklist
//! evaluator and the rank progression coordinator. Requirement lists
//! follow the current Scouts BSA rank requirement numbering.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A rank in the fixed advancement sequence.
/// Ordering follows the progression: Scout is lowest, Eagle is highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Scout,
    Tenderfoot,
    #[serde(rename = "Second Class")]
    SecondClass,
    #[serde(rename = "First Class")]
    FirstClass,
    Star,
    Life,
    Eagle,
}

/// All ranks in progression order.
pub const ALL_RANKS: [Rank; 7] = [
    Rank::Scout,
    Rank::Tenderfoot,
    Rank::SecondClass,
    Rank::FirstClass,
    Rank::Star,
    Rank::Life,
    Rank::Eagle,
];

impl Rank {
    /// The next rank in the progression, or `None` at Eagle.
    pub fn successor(self) -> Option<Rank> {
        match self {
            Rank::Scout => Some(Rank::Tenderfoot),
            Rank::Tenderfoot => Some(Rank::SecondClass),
            Rank::SecondClass => Some(Rank::FirstClass),
            Rank::FirstClass => Some(Rank::Star),
            Rank::Star => Some(Rank::Life),
            Rank::Life => Some(Rank::Eagle),
            Rank::Eagle => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Scout => "Scout",
            Rank::Tenderfoot => "Tenderfoot",
            Rank::SecondClass => "Second Class",
            Rank::FirstClass => "First Class",
            Rank::Star => "Star",
            Rank::Life => "Life",
            Rank::Eagle => "Eagle",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Rank {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_RANKS
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| EngineError::UnknownRank(s.to_string()))
    }
}

/// Canonical requirement identifiers for a rank, in presentation order.
pub fn requirements_for(rank: Rank) -> &'static [&'static str] {
    match rank {
        Rank::Scout => &["1a", "1b", "1c", "2", "3", "4", "5", "6", "7"],
        Rank::Tenderfoot => &[
            "1a", "1b", "1c", "1d", "2a", "2b", "2c", "2d", "2e", "2f", "3a", "3b", "3c", "3d",
            "4a", "4b",
        ],
        Rank::SecondClass => &[
            "1a", "1b", "1c", "2a", "2b", "2c", "2d", "2e", "2f", "2g", "3a", "3b", "3c", "3d",
            "4", "5a", "5b", "5c", "5d", "6a", "6b", "6c", "6d", "7a", "7b",
        ],
        Rank::FirstClass => &[
            "1a", "1b", "2a", "2b", "2c", "2d", "2e", "2f", "3a", "3b", "3c", "3d", "4a", "4b",
            "5a", "5b", "5c", "6a", "6b", "6c", "6d", "7a", "7b", "7c", "7d", "8a", "8b", "8c",
            "8d", "8e",
        ],
        Rank::Star => &["1", "2", "3", "4", "5", "6"],
        Rank::Life => &["1", "2", "3", "4", "5", "6", "7"],
        Rank::Eagle => &["1", "2", "3", "4", "5", "6", "7", "8"],
    }
}

/// Whether `id` is a valid requirement identifier for `rank`.
pub fn is_valid_requirement(rank: Rank, id: &str) -> bool {
    requirements_for(rank).contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_chain_covers_all_ranks() {
        let mut walked = vec![Rank::Scout];
        let mut current = Rank::Scout;
        while let Some(next) = current.successor() {
            walked.push(next);
            current = next;
        }
        assert_eq!(walked, ALL_RANKS.to_vec());
        assert_eq!(Rank::Eagle.successor(), None);
    }

    #[test]
    fn test_requirement_counts() {
        assert_eq!(requirements_for(Rank::Scout).len(), 9);
        assert_eq!(requirements_for(Rank::Tenderfoot).len(), 16);
        assert_eq!(requirements_for(Rank::SecondClass).len(), 25);
        assert_eq!(requirements_for(Rank::FirstClass).len(), 30);
        assert_eq!(requirements_for(Rank::Star).len(), 6);
        assert_eq!(requirements_for(Rank::Life).len(), 7);
        assert_eq!(requirements_for(Rank::Eagle).len(), 8);
    }

    #[test]
    fn test_requirement_ids_are_unique() {
        for rank in ALL_RANKS {
            let ids = requirements_for(rank);
            let mut deduped: Vec<&str> = ids.to_vec();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), ids.len(), "duplicate ids for {}", rank);
        }
    }

    #[test]
    fn test_rank_parse_round_trip() {
        for rank in ALL_RANKS {
            assert_eq!(rank.name().parse::<Rank>().unwrap(), rank);
        }
        assert!(matches!(
            "Webelos".parse::<Rank>(),
            Err(EngineError::UnknownRank(_))
        ));
    }

    #[test]
    fn test_rank_serde_names_match_display() {
        let json = serde_json::to_string(&Rank::SecondClass).unwrap();
        assert_eq!(json, "\"Second Class\"");
        let rank: Rank = serde_json::from_str("\"First Class\"").unwrap();
        assert_eq!(rank, Rank::FirstClass);
    }

    #[test]
    fn test_rank_ordering() {
        assert!(Rank::Scout < Rank::Tenderfoot);
        assert!(Rank::Life < Rank::Eagle);
    }
}
