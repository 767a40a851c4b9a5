//! The progress store.

use mission_core::{
    find_mission, format_elapsed, mission_statuses, now_millis, Dashboard, EpochMillis, Mission,
    MissionId, MissionScore, MissionStatus, ProgressRecord, RankInfo, SaveOutcome,
};
use mission_storage::Storage;
use tracing::{debug, info, warn};
use crate::config::{RecoveryPolicy, StoreConfig};
use crate::error::{ProgressError, Result};

/// Holds the learner's progress record in one storage slot.
///
/// The store is the only way to mutate the record. Every operation is a
/// single read-modify-write against the slot. Other processes sharing the
/// slot are not coordinated with: the last write wins, and a write that
/// replaces someone else's concurrent update is counted and logged.
pub struct ProgressStore<S: Storage> {
    storage: S,
    config: StoreConfig,
    clock: fn() -> EpochMillis,
    conflicts: u64,
}

impl<S: Storage> ProgressStore<S> {
    /// Create a store over `storage` with the default configuration.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: StoreConfig::default(),
            clock: now_millis,
            conflicts: 0,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the time source used for new records and the mission clock.
    pub fn with_clock(mut self, clock: fn() -> EpochMillis) -> Self {
        self.clock = clock;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes that replaced a concurrent update since this store was created.
    pub fn conflicts(&self) -> u64 {
        self.conflicts
    }

    /// Create the default record if none exists. Returns whether one was
    /// created.
    pub async fn initialize(&mut self) -> Result<bool> {
        if self.storage.contains(&self.config.storage_key).await? {
            return Ok(false);
        }

        let record = ProgressRecord::new((self.clock)());
        self.write(&record, None).await?;
        info!(
            key = %self.config.storage_key,
            start_time = record.start_time,
            "created progress record"
        );
        Ok(true)
    }

    /// Current record, created first if missing.
    pub async fn get(&mut self) -> Result<ProgressRecord> {
        let (record, _) = self.load().await?;
        Ok(record)
    }

    /// Record progress on a mission.
    ///
    /// The first completion credits `xp_earned` once; re-completing a
    /// completed mission changes nothing; a non-completing update adds
    /// `xp_earned` as practice XP. The rank is recomputed and the whole
    /// record written back.
    pub async fn save(
        &mut self,
        mission_id: &str,
        xp_earned: u32,
        completed: bool,
    ) -> Result<SaveOutcome> {
        let (mut record, version) = self.load().await?;
        let outcome = record.record_progress(mission_id, xp_earned, completed);

        match outcome {
            SaveOutcome::FirstCompletion => {
                info!(
                    mission = mission_id,
                    xp = xp_earned,
                    total = record.total_xp,
                    "mission completed"
                )
            }
            SaveOutcome::AlreadyCompleted => {
                info!(mission = mission_id, "mission already completed, no additional XP awarded")
            }
            SaveOutcome::Practice => {
                debug!(
                    mission = mission_id,
                    xp = xp_earned,
                    total = record.total_xp,
                    "practice XP recorded"
                )
            }
        }

        self.write(&record, Some(version)).await?;
        Ok(outcome)
    }

    /// Record the latest quiz score for a quiz mission.
    pub async fn save_score(&mut self, mission_id: &str, score: u32) -> Result<()> {
        if !find_mission(mission_id).is_some_and(|m| m.quiz) {
            return Err(ProgressError::UnknownMission(mission_id.to_string()));
        }
        if score > self.config.max_quiz_score {
            return Err(ProgressError::InvalidScore {
                mission: mission_id.to_string(),
                score,
                max: self.config.max_quiz_score,
            });
        }

        let (mut record, version) = self.load().await?;
        record
            .mission_scores
            .entry(MissionId::new(mission_id))
            .or_insert_with(MissionScore::quiz)
            .score = Some(score);

        debug!(mission = mission_id, score, "quiz score recorded");
        self.write(&record, Some(version)).await?;
        Ok(())
    }

    /// Rank information for any XP value.
    pub fn rank_info(xp: u32) -> RankInfo {
        RankInfo::for_xp(xp)
    }

    /// Unlock status of every catalog mission.
    pub async fn mission_statuses(&mut self) -> Result<Vec<(&'static Mission, MissionStatus)>> {
        let record = self.get().await?;
        Ok(mission_statuses(&record))
    }

    /// Dashboard summary of the current record.
    pub async fn dashboard(&mut self) -> Result<Dashboard> {
        let record = self.get().await?;
        Ok(Dashboard::from_record(&record, self.config.max_quiz_score))
    }

    /// Elapsed mission time as `HH:MM:SS`.
    pub async fn mission_clock(&mut self) -> Result<String> {
        let record = self.get().await?;
        Ok(format_elapsed(record.start_time, (self.clock)()))
    }

    /// Destroy the record. The next read creates a fresh one.
    pub async fn reset(&mut self) -> Result<()> {
        self.storage.remove(&self.config.storage_key).await?;
        info!(key = %self.config.storage_key, "progress reset");
        Ok(())
    }

    /// Load the record with the slot version it was read at.
    async fn load(&mut self) -> Result<(ProgressRecord, u64)> {
        self.initialize().await?;

        let key = self.config.storage_key.clone();
        let version = self.storage.version(&key).await?;
        let Some(raw) = self.storage.load(&key).await? else {
            // Removed by someone else after initialize.
            return self.recreate().await;
        };

        match parse_record(&raw) {
            Ok(mut record) => {
                record.refresh_rank();
                Ok((record, version))
            }
            Err(reason) => match self.config.recovery {
                RecoveryPolicy::Surface => Err(ProgressError::CorruptState { key, reason }),
                RecoveryPolicy::Reset => {
                    warn!(
                        key = %key,
                        reason = %reason,
                        "corrupt progress record, resetting to defaults"
                    );
                    self.storage.remove(&key).await?;
                    self.recreate().await
                }
            },
        }
    }

    async fn recreate(&mut self) -> Result<(ProgressRecord, u64)> {
        let record = ProgressRecord::new((self.clock)());
        let version = self.write(&record, None).await?;
        Ok((record, version))
    }

    /// Write the record, returning the new slot version. With `read_version`
    /// set, a slot that moved on since that read is reported before being
    /// overwritten.
    async fn write(&mut self, record: &ProgressRecord, read_version: Option<u64>) -> Result<u64> {
        let key = &self.config.storage_key;

        if let Some(expected) = read_version {
            let current = self.storage.version(key).await?;
            if current != expected {
                self.conflicts += 1;
                warn!(
                    key = %key,
                    expected,
                    current,
                    "progress record changed since it was read, overwriting the other update"
                );
            }
        }

        let json = serde_json::to_string(record)?;
        let version = self.storage.save(key, &json).await?;
        debug!(key = %key, version, "progress record written");
        Ok(version)
    }
}

fn parse_record(raw: &str) -> std::result::Result<ProgressRecord, String> {
    let record: ProgressRecord = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}
