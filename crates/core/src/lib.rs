//! Mission progress data model.
//!
//! The persisted [`ProgressRecord`], the mission catalog and everything
//! derived from a record without touching storage: ranks, unlock state,
//! dashboard statistics and the mission clock.

#![warn(missing_docs)]

mod id;
mod mission;
mod record;
mod rank;
mod unlock;
mod stats;
mod clock;

pub use id::MissionId;
pub use mission::{Mission, MissionScore, MISSIONS, find_mission};
pub use record::{ProgressRecord, RecordViolation, SaveOutcome, EpochMillis};
pub use rank::{Rank, RankInfo, ENGINEER_XP, FLIGHT_DIRECTOR_XP};
pub use unlock::{MissionStatus, is_unlocked, mission_status, mission_statuses};
pub use stats::{Dashboard, accuracy, DEFAULT_MAX_QUIZ_SCORE};
pub use clock::{format_elapsed, now_millis};
