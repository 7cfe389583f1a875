use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, Rank};
use crate::error::EngineError;

/// Workflow status of an advancement record.
///
/// The order is fixed and forward-only: a record never regresses and
/// never skips a state. Serde names match the strings used in troop
/// data files, so existing documents load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdvancementStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Ready for SM Conference")]
    ReadyForConference,
    #[serde(rename = "SM Conference Complete")]
    ConferenceComplete,
    #[serde(rename = "Ready for Board of Review")]
    ReadyForReview,
    #[serde(rename = "Board of Review Complete")]
    ReviewComplete,
    Awarded,
}

/// All statuses in workflow order.
pub const ALL_STATUSES: [AdvancementStatus; 6] = [
    AdvancementStatus::InProgress,
    AdvancementStatus::ReadyForConference,
    AdvancementStatus::ConferenceComplete,
    AdvancementStatus::ReadyForReview,
    AdvancementStatus::ReviewComplete,
    AdvancementStatus::Awarded,
];

impl AdvancementStatus {
    /// The next status in the workflow, or `None` once awarded.
    pub fn successor(self) -> Option<AdvancementStatus> {
        match self {
            AdvancementStatus::InProgress => Some(AdvancementStatus::ReadyForConference),
            AdvancementStatus::ReadyForConference => Some(AdvancementStatus::ConferenceComplete),
            AdvancementStatus::ConferenceComplete => Some(AdvancementStatus::ReadyForReview),
            AdvancementStatus::ReadyForReview => Some(AdvancementStatus::ReviewComplete),
            AdvancementStatus::ReviewComplete => Some(AdvancementStatus::Awarded),
            AdvancementStatus::Awarded => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AdvancementStatus::InProgress => "In Progress",
            AdvancementStatus::ReadyForConference => "Ready for SM Conference",
            AdvancementStatus::ConferenceComplete => "SM Conference Complete",
            AdvancementStatus::ReadyForReview => "Ready for Board of Review",
            AdvancementStatus::ReviewComplete => "Board of Review Complete",
            AdvancementStatus::Awarded => "Awarded",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == AdvancementStatus::Awarded
    }
}

impl std::fmt::Display for AdvancementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AdvancementStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .into_iter()
            .find(|st| st.name() == s)
            .ok_or_else(|| EngineError::UnknownStatus(s.to_string()))
    }
}

/// One member's progress toward one rank.
///
/// `member_id` and `rank` are fixed at creation. The requirement map only
/// ever holds identifiers from the catalog set for `rank`; the checklist
/// is seeded all-false so every requirement is visible from day one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancementRecord {
    pub id: String,
    pub member_id: String,
    pub rank: Rank,
    pub status: AdvancementStatus,
    #[serde(default)]
    pub requirements: BTreeMap<String, bool>,
    #[serde(default)]
    pub date_started: Option<NaiveDate>,
    #[serde(default)]
    pub scoutmaster_conference_date: Option<NaiveDate>,
    #[serde(default)]
    pub board_of_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub date_completed: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl AdvancementRecord {
    /// Start tracking a member's attempt at `rank` as of `today`.
    pub fn new(
        id: impl Into<String>,
        member_id: impl Into<String>,
        rank: Rank,
        today: NaiveDate,
    ) -> Self {
        let requirements = catalog::requirements_for(rank)
            .iter()
            .map(|id| (id.to_string(), false))
            .collect();

        Self {
            id: id.into(),
            member_id: member_id.into(),
            rank,
            status: AdvancementStatus::InProgress,
            requirements,
            date_started: Some(today),
            scoutmaster_conference_date: None,
            board_of_review_date: None,
            date_completed: None,
            notes: String::new(),
        }
    }

    /// Mark a single requirement complete or incomplete.
    /// Rejects identifiers outside the catalog set for this record's rank.
    pub fn set_requirement(&mut self, req_id: &str, done: bool) -> Result<(), EngineError> {
        if !catalog::is_valid_requirement(self.rank, req_id) {
            return Err(EngineError::UnknownRequirement {
                rank: self.rank.to_string(),
                id: req_id.to_string(),
            });
        }
        self.requirements.insert(req_id.to_string(), done);
        Ok(())
    }

    /// Whether `status` (or a later one) has been reached.
    pub fn has_reached(&self, status: AdvancementStatus) -> bool {
        self.status >= status
    }

    /// Check the structural invariants on a record, typically one loaded
    /// from storage:
    ///
    /// - requirement keys are a subset of the catalog set for `rank`
    /// - each milestone date is present iff its status has been reached
    pub fn validate(&self) -> Result<(), EngineError> {
        for key in self.requirements.keys() {
            if !catalog::is_valid_requirement(self.rank, key) {
                return Err(EngineError::UnknownRequirement {
                    rank: self.rank.to_string(),
                    id: key.clone(),
                });
            }
        }

        let milestones = [
            (
                self.date_started,
                AdvancementStatus::InProgress,
                "date_started",
            ),
            (
                self.scoutmaster_conference_date,
                AdvancementStatus::ConferenceComplete,
                "scoutmaster_conference_date",
            ),
            (
                self.board_of_review_date,
                AdvancementStatus::ReviewComplete,
                "board_of_review_date",
            ),
            (
                self.date_completed,
                AdvancementStatus::ReviewComplete,
                "date_completed",
            ),
        ];
        for (date, status, field) in milestones {
            if date.is_some() != self.has_reached(status) {
                return Err(EngineError::InvalidRecord {
                    id: self.id.clone(),
                    reason: format!("{} does not match status {}", field, self.status),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_status_successor_chain() {
        let mut walked = vec![AdvancementStatus::InProgress];
        let mut current = AdvancementStatus::InProgress;
        while let Some(next) = current.successor() {
            walked.push(next);
            current = next;
        }
        assert_eq!(walked, ALL_STATUSES.to_vec());
        assert!(AdvancementStatus::Awarded.is_terminal());
    }

    #[test]
    fn test_status_parse_and_serde_names() {
        for status in ALL_STATUSES {
            assert_eq!(status.name().parse::<AdvancementStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.name()));
        }
        assert!(matches!(
            "Pending".parse::<AdvancementStatus>(),
            Err(EngineError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_new_record_seeds_full_checklist() {
        let rec = AdvancementRecord::new("a1", "m1", Rank::Scout, day("2026-03-01"));
        assert_eq!(rec.status, AdvancementStatus::InProgress);
        assert_eq!(rec.requirements.len(), 9);
        assert!(rec.requirements.values().all(|v| !v));
        assert_eq!(rec.date_started, Some(day("2026-03-01")));
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn test_set_requirement_rejects_unknown_id() {
        let mut rec = AdvancementRecord::new("a1", "m1", Rank::Star, day("2026-03-01"));
        rec.set_requirement("3", true).unwrap();
        assert_eq!(rec.requirements.get("3"), Some(&true));

        // "9z" is not a Star requirement
        let err = rec.set_requirement("9z", true).unwrap_err();
        assert!(matches!(err, EngineError::UnknownRequirement { .. }));
    }

    #[test]
    fn test_validate_flags_stray_milestone_date() {
        let mut rec = AdvancementRecord::new("a1", "m1", Rank::Scout, day("2026-03-01"));
        rec.board_of_review_date = Some(day("2026-04-01"));
        assert!(rec.validate().is_err());
    }

    #[test]
    fn test_validate_requires_start_date() {
        // Every record has reached In Progress, so the start date must be set
        let mut rec = AdvancementRecord::new("a1", "m1", Rank::Scout, day("2026-03-01"));
        rec.date_started = None;
        let err = rec.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { .. }));
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut rec = AdvancementRecord::new("a1", "m1", Rank::Life, day("2026-03-01"));
        rec.set_requirement("1", true).unwrap();
        rec.notes = "campout planned".to_string();

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"In Progress\""));
        let back: AdvancementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
