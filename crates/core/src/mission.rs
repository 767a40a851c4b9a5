//! Mission catalog and per-mission score entries.

use serde::{Deserialize, Serialize};
use crate::id::MissionId;

/// A mission known to the site, in unlock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    /// Storage id
    pub id: &'static str,

    /// Display title
    pub title: &'static str,

    /// Quiz missions carry a `score` in their entry
    pub quiz: bool,
}

impl Mission {
    /// The mission id as an owned [`MissionId`].
    pub fn mission_id(&self) -> MissionId {
        MissionId::new(self.id)
    }

    /// Display number, starting at 1.
    pub fn number(&self) -> usize {
        MISSIONS
            .iter()
            .position(|m| m.id == self.id)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

/// All missions, in the order they unlock.
pub static MISSIONS: &[Mission] = &[
    Mission {
        id: "lesson1",
        title: "Lesson 1",
        quiz: true,
    },
    Mission {
        id: "lesson2",
        title: "Lesson 2",
        quiz: true,
    },
    Mission {
        id: "lesson3",
        title: "Lesson 3",
        quiz: true,
    },
    Mission {
        id: "design",
        title: "Design Challenge",
        quiz: false,
    },
];

/// Look up a catalog mission by id.
pub fn find_mission(id: &str) -> Option<&'static Mission> {
    MISSIONS.iter().find(|m| m.id == id)
}

/// Progress of a single mission as stored in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionScore {
    /// Whether the mission has been completed. Never reverts to false.
    pub completed: bool,

    /// XP credited to this mission
    pub xp: u32,

    /// Latest quiz score (quiz missions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl MissionScore {
    /// Fresh entry for a quiz mission.
    pub fn quiz() -> Self {
        Self {
            completed: false,
            xp: 0,
            score: Some(0),
        }
    }

    /// Fresh entry for a mission without a quiz.
    pub fn activity() -> Self {
        Self {
            completed: false,
            xp: 0,
            score: None,
        }
    }

    /// Fresh entry for a catalog mission.
    pub fn for_mission(mission: &Mission) -> Self {
        if mission.quiz {
            Self::quiz()
        } else {
            Self::activity()
        }
    }
}

impl Default for MissionScore {
    fn default() -> Self {
        Self::activity()
    }
}
