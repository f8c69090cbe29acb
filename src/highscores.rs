//! High score leaderboard system
//!
//! Persisted through the storage capability, tracks the top 10 runs.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{Storage, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Local date, `YYYY-MM-DD`
    pub date: String,
    /// Local time of day, `HH:MM:SS`
    pub time: String,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "road_rush_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run stamped with the current local time.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_record(&mut self, score: u64, level: u32) -> Option<usize> {
        self.add_record_at(score, level, Local::now())
    }

    /// Record a finished run with an explicit timestamp
    pub fn add_record_at<Tz: TimeZone>(
        &mut self,
        score: u64,
        level: u32,
        at: DateTime<Tz>,
    ) -> Option<usize>
    where
        Tz::Offset: std::fmt::Display,
    {
        let entry = HighScoreEntry {
            score,
            level,
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
        };

        // Sorted descending; ties keep the older run first
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the list, re-sorting and trimming whatever was stored
    pub fn load(storage: &dyn Storage) -> Result<Self, StorageError> {
        let mut scores: HighScores = load_json(storage, Self::STORAGE_KEY)?.unwrap_or_default();
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Load, falling back to an empty board on any storage fault
    pub fn load_or_default(storage: &dyn Storage) -> Self {
        Self::load(storage).unwrap_or_else(|e| {
            log::warn!("High scores unavailable, starting fresh: {}", e);
            Self::new()
        })
    }

    pub fn save(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use chrono::Utc;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_entries_are_stamped() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_record_at(500, 2, stamp()), Some(1));
        let e = &scores.entries[0];
        assert_eq!(e.date, "2024-03-09");
        assert_eq!(e.time, "14:05:07");
        assert_eq!(e.level, 2);
    }

    #[test]
    fn test_sorted_descending_and_capped() {
        let mut scores = HighScores::new();
        for s in [300, 100, 900, 500, 700, 200, 800, 400, 600, 1000, 50, 1100] {
            scores.add_record_at(s, 1, stamp());
        }
        let list: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(list, vec![1100, 1000, 900, 800, 700, 600, 500, 400, 300, 200]);
    }

    #[test]
    fn test_rank_reporting() {
        let mut scores = HighScores::new();
        for s in 1..=10 {
            scores.add_record_at(s * 100, 1, stamp());
        }
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_record_at(50, 1, stamp()), None);
        assert_eq!(scores.add_record_at(550, 1, stamp()), Some(6));
        assert_eq!(scores.top_score(), Some(1000));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_ties_keep_older_first() {
        let mut scores = HighScores::new();
        scores.add_record_at(100, 1, stamp());
        scores.add_record_at(100, 2, stamp());
        assert_eq!(scores.entries[0].level, 1);
        assert_eq!(scores.entries[1].level, 2);
    }

    #[test]
    fn test_persists_as_plain_list() {
        let storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        scores.add_record_at(250, 3, stamp());
        scores.save(&storage).unwrap();

        let raw = storage.get(HighScores::STORAGE_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));

        let loaded = HighScores::load(&storage).unwrap();
        assert_eq!(loaded, scores);
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_empty() {
        let storage = MemoryStorage::new();
        storage.set(HighScores::STORAGE_KEY, "oops").unwrap();
        assert!(HighScores::load(&storage).is_err());
        assert!(HighScores::load_or_default(&storage).is_empty());
    }
}
