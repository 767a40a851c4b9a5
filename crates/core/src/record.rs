//! The persisted progress record.

use std::collections::{BTreeMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::id::MissionId;
use crate::mission::{find_mission, MissionScore, MISSIONS};
use crate::rank::Rank;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// A learner's progress. Field names match the stored JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Cumulative XP
    #[serde(rename = "totalXP")]
    pub total_xp: u32,

    /// Missions completed, each listed once
    pub completed_missions: Vec<MissionId>,

    /// Per-mission progress
    pub mission_scores: BTreeMap<MissionId, MissionScore>,

    /// Rank derived from `total_xp`
    pub rank: Rank,

    /// When the record was created
    pub start_time: EpochMillis,
}

/// A record that breaks the consistency rules between
/// `completedMissions` and `missionScores`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordViolation {
    /// A mission id appears twice in `completedMissions`
    #[error("mission {0} is listed as completed more than once")]
    DuplicateCompletion(MissionId),

    /// Listed as completed but the score entry is missing or not completed
    #[error("mission {0} is listed as completed but its score entry is not")]
    CompletionWithoutScore(MissionId),

    /// Score entry completed but the mission is not listed
    #[error("mission {0} has a completed score entry but is not listed as completed")]
    ScoreWithoutCompletion(MissionId),
}

/// Which branch a progress update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveOutcome {
    /// Mission completed for the first time; its XP was credited
    FirstCompletion,
    /// Mission was already completed; nothing changed
    AlreadyCompleted,
    /// Practice XP added without completing the mission
    Practice,
}

impl ProgressRecord {
    /// Fresh record with every catalog mission at zero.
    pub fn new(start_time: EpochMillis) -> Self {
        let mission_scores = MISSIONS
            .iter()
            .map(|m| (m.mission_id(), MissionScore::for_mission(m)))
            .collect();

        Self {
            total_xp: 0,
            completed_missions: Vec::new(),
            mission_scores,
            rank: Rank::Cadet,
            start_time,
        }
    }

    /// Whether a mission's score entry is marked completed.
    pub fn is_completed(&self, id: &str) -> bool {
        self.mission_scores.get(id).map(|s| s.completed).unwrap_or(false)
    }

    /// Recompute `rank` from `total_xp`.
    pub fn refresh_rank(&mut self) {
        self.rank = Rank::from_xp(self.total_xp);
    }

    /// Apply a progress update for `mission_id` and refresh the rank.
    ///
    /// Completing a mission credits `xp_earned` once and replaces the
    /// mission's XP with it. Re-completing is ignored. Anything else adds
    /// `xp_earned` to both the mission and the total.
    pub fn record_progress(
        &mut self,
        mission_id: &str,
        xp_earned: u32,
        completed: bool,
    ) -> SaveOutcome {
        let entry = self
            .mission_scores
            .entry(MissionId::new(mission_id))
            .or_insert_with(|| {
                find_mission(mission_id)
                    .map(MissionScore::for_mission)
                    .unwrap_or_default()
            });

        let outcome = match (entry.completed, completed) {
            (false, true) => {
                entry.xp = xp_earned;
                entry.completed = true;
                self.total_xp = self.total_xp.saturating_add(xp_earned);
                if !self.completed_missions.iter().any(|id| id.as_str() == mission_id) {
                    self.completed_missions.push(MissionId::new(mission_id));
                }
                SaveOutcome::FirstCompletion
            }
            (true, true) => SaveOutcome::AlreadyCompleted,
            _ => {
                entry.xp = entry.xp.saturating_add(xp_earned);
                self.total_xp = self.total_xp.saturating_add(xp_earned);
                SaveOutcome::Practice
            }
        };

        self.refresh_rank();
        outcome
    }

    /// Check that completions agree in both directions.
    pub fn validate(&self) -> Result<(), RecordViolation> {
        let mut seen = HashSet::new();
        for id in &self.completed_missions {
            if !seen.insert(id) {
                return Err(RecordViolation::DuplicateCompletion(id.clone()));
            }
            if !self.is_completed(id.as_str()) {
                return Err(RecordViolation::CompletionWithoutScore(id.clone()));
            }
        }

        for (id, score) in &self.mission_scores {
            if score.completed && !seen.contains(id) {
                return Err(RecordViolation::ScoreWithoutCompletion(id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_shape() {
        let record = ProgressRecord::new(1_700_000_000_000);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "totalXP": 0,
                "completedMissions": [],
                "missionScores": {
                    "lesson1": {"completed": false, "xp": 0, "score": 0},
                    "lesson2": {"completed": false, "xp": 0, "score": 0},
                    "lesson3": {"completed": false, "xp": 0, "score": 0},
                    "design": {"completed": false, "xp": 0}
                },
                "rank": "Cadet",
                "startTime": 1_700_000_000_000i64
            })
        );
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_reads_existing_blob() {
        let blob = r#"{
            "totalXP": 60,
            "completedMissions": ["lesson1"],
            "missionScores": {
                "lesson1": {"completed": true, "xp": 50, "score": 3},
                "lesson2": {"completed": false, "xp": 10, "score": 0},
                "lesson3": {"completed": false, "xp": 0, "score": 0},
                "design": {"completed": false, "xp": 0}
            },
            "rank": "Engineer",
            "startTime": 1700000000000
        }"#;

        let record: ProgressRecord = serde_json::from_str(blob).unwrap();
        assert_eq!(record.total_xp, 60);
        assert_eq!(record.rank, Rank::Engineer);
        assert!(record.is_completed("lesson1"));
        assert!(!record.is_completed("lesson2"));
        assert_eq!(record.mission_scores["design"].score, None);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_negative_xp_rejected() {
        let blob = r#"{"totalXP": -5, "completedMissions": [], "missionScores": {},
                       "rank": "Cadet", "startTime": 0}"#;
        assert!(serde_json::from_str::<ProgressRecord>(blob).is_err());
    }

    #[test]
    fn test_completion_credited_once() {
        let mut record = ProgressRecord::new(0);
        assert_eq!(record.record_progress("lesson1", 10, true), SaveOutcome::FirstCompletion);
        assert_eq!(record.record_progress("lesson1", 10, true), SaveOutcome::AlreadyCompleted);

        assert_eq!(record.total_xp, 10);
        assert_eq!(record.mission_scores["lesson1"].xp, 10);
        assert_eq!(record.completed_missions, vec![MissionId::from("lesson1")]);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_practice_accumulates() {
        let mut record = ProgressRecord::new(0);
        assert_eq!(record.record_progress("lesson2", 5, false), SaveOutcome::Practice);
        assert_eq!(record.record_progress("lesson2", 3, false), SaveOutcome::Practice);

        assert_eq!(record.total_xp, 8);
        assert_eq!(record.mission_scores["lesson2"].xp, 8);
        assert!(!record.is_completed("lesson2"));
        assert!(record.completed_missions.is_empty());
    }

    #[test]
    fn test_completion_overwrites_mission_xp() {
        let mut record = ProgressRecord::new(0);
        record.record_progress("lesson2", 5, false);
        record.record_progress("lesson2", 20, true);

        // Practice XP stays in the total but the mission shows the award.
        assert_eq!(record.total_xp, 25);
        assert_eq!(record.mission_scores["lesson2"].xp, 20);
    }

    #[test]
    fn test_practice_after_completion_still_counts() {
        let mut record = ProgressRecord::new(0);
        record.record_progress("lesson1", 10, true);
        assert_eq!(record.record_progress("lesson1", 4, false), SaveOutcome::Practice);

        assert_eq!(record.total_xp, 14);
        assert_eq!(record.mission_scores["lesson1"].xp, 14);
        assert!(record.is_completed("lesson1"));
    }

    #[test]
    fn test_unknown_mission_gets_entry() {
        let mut record = ProgressRecord::new(0);
        record.record_progress("bonus", 7, false);
        assert_eq!(
            record.mission_scores["bonus"],
            MissionScore { completed: false, xp: 7, score: None }
        );

        record.mission_scores.remove("lesson3");
        record.record_progress("lesson3", 0, false);
        assert_eq!(record.mission_scores["lesson3"].score, Some(0));
    }

    #[test]
    fn test_rank_follows_total() {
        let mut record = ProgressRecord::new(0);
        record.record_progress("lesson1", 49, true);
        assert_eq!(record.rank, Rank::Cadet);
        record.record_progress("lesson2", 1, true);
        assert_eq!(record.rank, Rank::Engineer);
        record.record_progress("design", 100, true);
        assert_eq!(record.rank, Rank::FlightDirector);
    }

    #[test]
    fn test_xp_saturates() {
        let mut record = ProgressRecord::new(0);
        record.record_progress("lesson1", u32::MAX, false);
        record.record_progress("lesson1", 10, false);
        assert_eq!(record.total_xp, u32::MAX);
    }

    #[test]
    fn test_validate_catches_inconsistency() {
        let mut record = ProgressRecord::new(0);
        record.completed_missions.push(MissionId::from("lesson1"));
        assert_eq!(
            record.validate(),
            Err(RecordViolation::CompletionWithoutScore(MissionId::from("lesson1")))
        );

        record.mission_scores.get_mut("lesson1").unwrap().completed = true;
        assert!(record.validate().is_ok());

        record.completed_missions.push(MissionId::from("lesson1"));
        assert!(matches!(
            record.validate(),
            Err(RecordViolation::DuplicateCompletion(_))
        ));

        let mut record = ProgressRecord::new(0);
        record.mission_scores.get_mut("design").unwrap().completed = true;
        assert!(matches!(
            record.validate(),
            Err(RecordViolation::ScoreWithoutCompletion(_))
        ));
    }
}
