use serde::{Deserialize, Serialize};

use crate::catalog::Rank;

/// A youth member of the troop.
///
/// The engine only ever reads a member's current rank and writes a new
/// rank when an advancement is awarded. Roster maintenance (create,
/// deactivate, delete) belongs to the directory, not the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub rank: Rank,
    pub active: bool,
    #[serde(default)]
    pub patrol: Option<String>,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        first: impl Into<String>,
        last: impl Into<String>,
        rank: Rank,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            rank,
            active: true,
            patrol: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}
