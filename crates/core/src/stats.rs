//! Dashboard statistics.

use serde::Serialize;
use crate::mission::MISSIONS;
use crate::rank::RankInfo;
use crate::record::ProgressRecord;

/// Highest score a single quiz can award.
pub const DEFAULT_MAX_QUIZ_SCORE: u32 = 3;

/// Summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Cumulative XP
    pub total_xp: u32,

    /// Rank information for `total_xp`
    pub rank: RankInfo,

    /// Length of `completedMissions`
    pub missions_completed: usize,

    /// Completed entries in `missionScores`
    pub quizzes_completed: usize,

    /// Average quiz accuracy in percent
    pub accuracy: u32,
}

impl Dashboard {
    /// Build the dashboard for a record.
    pub fn from_record(record: &ProgressRecord, max_quiz_score: u32) -> Self {
        Self {
            total_xp: record.total_xp,
            rank: RankInfo::for_xp(record.total_xp),
            missions_completed: record.completed_missions.len(),
            quizzes_completed: record.mission_scores.values().filter(|s| s.completed).count(),
            accuracy: accuracy(record, max_quiz_score),
        }
    }
}

/// Average score of the quiz missions that have a non-zero score, as a
/// rounded percentage of `max_quiz_score`. Zero when nothing was scored.
pub fn accuracy(record: &ProgressRecord, max_quiz_score: u32) -> u32 {
    let scores: Vec<u32> = MISSIONS
        .iter()
        .filter(|m| m.quiz)
        .filter_map(|m| record.mission_scores.get(m.id).and_then(|s| s.score))
        .filter(|&score| score > 0)
        .collect();

    if scores.is_empty() || max_quiz_score == 0 {
        return 0;
    }

    let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let possible = scores.len() as u64 * u64::from(max_quiz_score);
    (total as f64 / possible as f64 * 100.0).round() as u32
}
