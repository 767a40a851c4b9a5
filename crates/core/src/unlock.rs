//! Mission unlock derivation.
//!
//! Unlock state is never stored; it is recomputed from the record on every
//! read. Mission 1 is always open, every later mission opens once its
//! predecessor is completed.

use serde::Serialize;
use crate::mission::{Mission, MISSIONS};
use crate::record::ProgressRecord;

/// Display status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissionStatus {
    /// Predecessor not completed yet
    Locked,
    /// Open and not completed
    Available,
    /// Completed
    Completed,
}

impl MissionStatus {
    /// Badge text.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Locked => "LOCKED",
            MissionStatus::Available => "AVAILABLE",
            MissionStatus::Completed => "COMPLETED",
        }
    }
}

/// Whether the mission at catalog position `index` (0-based) is unlocked.
pub fn is_unlocked(record: &ProgressRecord, index: usize) -> bool {
    match index {
        0 => true,
        n => MISSIONS
            .get(n - 1)
            .map(|prev| record.is_completed(prev.id))
            .unwrap_or(false),
    }
}

/// Status of the mission at catalog position `index`.
pub fn mission_status(record: &ProgressRecord, index: usize) -> MissionStatus {
    let Some(mission) = MISSIONS.get(index) else {
        return MissionStatus::Locked;
    };

    if !is_unlocked(record, index) {
        MissionStatus::Locked
    } else if record.is_completed(mission.id) {
        MissionStatus::Completed
    } else {
        MissionStatus::Available
    }
}

/// Status of every catalog mission, in unlock order.
pub fn mission_statuses(record: &ProgressRecord) -> Vec<(&'static Mission, MissionStatus)> {
    MISSIONS
        .iter()
        .enumerate()
        .map(|(i, m)| (m, mission_status(record, i)))
        .collect()
}
