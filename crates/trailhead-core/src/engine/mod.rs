//! The advancement workflow engine:
//!
//! - `evaluator`: checklist completion math and advisory readiness hints
//! - `transition`: the forward-only status state machine
//! - `coordinator`: the board-of-review completion that awards the rank
//!   and advances the member, committed as one atomic unit

pub mod coordinator;
pub mod evaluator;
pub mod transition;

pub use coordinator::Coordinator;
pub use evaluator::{advisory_next, evaluate, ChecklistProgress};
pub use transition::transition;
