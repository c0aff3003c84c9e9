//! High score leaderboard
//!
//! A ranked list of (name, score) pairs, best first, at most ten entries.
//! Stored as a JSON array at [`HIGH_SCORES_PATH`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest name kept on the board (characters)
pub const MAX_NAME_LEN: usize = 15;
pub const DEFAULT_NAME: &str = "Anonymous";
/// Default leaderboard file, relative to the working directory
pub const HIGH_SCORES_PATH: &str = "data/highscores.json";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Trim, cap at [`MAX_NAME_LEN`] characters, default blank names
pub fn clean_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// A score qualifies while the board has room or when it beats the last entry
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies; returns the rank achieved (1-indexed)
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        let entry = HighScoreEntry {
            name: clean_name(name),
            score,
        };
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore names, ordering and size after reading an untrusted file
    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.name = clean_name(&entry.name);
        }
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load the board from `path`
    ///
    /// Never fails: a missing file yields an empty board (and its directory
    /// is created), a corrupt one is discarded with a warning.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            if let Err(e) = persistence::ensure_parent(path) {
                log::warn!("Could not create {}: {}", path.display(), e);
            }
            log::info!("No high scores at {}, starting fresh", path.display());
            return Self::new();
        }

        match persistence::read_json::<HighScores>(path) {
            Ok(mut scores) => {
                scores.normalize();
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persistence::write_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board(scores: &[u64]) -> HighScores {
        let mut hs = HighScores::new();
        for (i, &s) in scores.iter().enumerate() {
            hs.add_score(&format!("p{i}"), s);
        }
        hs
    }

    #[test]
    fn test_ranked_descending_and_capped() {
        let hs = board(&[5, 50, 20, 1, 2, 3, 4, 6, 7, 8, 9, 100]);
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.top_score(), Some(100));
        assert!(hs.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(hs.entries.iter().all(|e| e.score != 1));
    }

    #[test]
    fn test_full_board_needs_strictly_higher_score() {
        let hs = board(&[10; 10]);
        assert!(!hs.qualifies(10));
        assert_eq!(hs.potential_rank(11), Some(1));
    }

    #[test]
    fn test_name_cleaning() {
        assert_eq!(clean_name("   "), "Anonymous");
        assert_eq!(clean_name("  ace  "), "ace");
        assert_eq!(clean_name("abcdefghijklmnopqrst"), "abcdefghijklmno");
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("highscores.json");
        let hs = board(&[300, 100, 200]);
        hs.save(&path).unwrap();
        let back = HighScores::load(&path);
        assert_eq!(back, hs);
        assert_eq!(
            back.entries.iter().map(|e| e.score).collect::<Vec<_>>(),
            vec![300, 200, 100]
        );
    }

    #[test]
    fn test_file_is_a_plain_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.json");
        std::fs::write(&path, r#"[{"name": "b", "score": 5}, {"name": "a", "score": 9}]"#).unwrap();
        let hs = HighScores::load(&path);
        assert_eq!(hs.entries[0].name, "a");
    }

    #[test]
    fn test_loaded_names_are_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.json");
        std::fs::write(
            &path,
            r#"[{"name": "  abcdefghijklmnopqrstuvwxyz ", "score": 9}, {"name": "   ", "score": 5}]"#,
        )
        .unwrap();
        let hs = HighScores::load(&path);
        assert_eq!(hs.entries[0].name, "abcdefghijklmno");
        assert_eq!(hs.entries[1].name, DEFAULT_NAME);
    }

    #[test]
    fn test_missing_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("highscores.json");
        assert!(HighScores::load(&path).is_empty());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_corrupt_file_yields_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, r#"{"name": "not a list"}"#).unwrap();
        assert!(HighScores::load(&path).is_empty());
    }

    proptest! {
        #[test]
        fn prop_board_stays_sorted(scores in prop::collection::vec(0u64..10_000, 0..30)) {
            let hs = board(&scores);
            prop_assert!(hs.entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(hs.entries.windows(2).all(|w| w[0].score >= w[1].score));
            let mut sorted = scores.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            sorted.truncate(MAX_HIGH_SCORES);
            let kept: Vec<u64> = hs.entries.iter().map(|e| e.score).collect();
            prop_assert_eq!(kept, sorted);
        }
    }
}
