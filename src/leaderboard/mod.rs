//! Local top-10 leaderboard persisted as a JSON blob.
//!
//! The file is read once on open and rewritten whole on every save:
//! append the new entry, sort best-first, truncate to the cap. Scores
//! sort descending with accuracy breaking ties.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default location of the leaderboard blob.
const LEADERBOARD_PATH: &str = "data/leaderboard.json";

/// Maximum number of persisted entries.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub accuracy: f64,
    /// Unix timestamp of the save, in seconds.
    pub date: i64,
}

/// In-memory board bound to its backing file.
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Opens the default board, starting empty when the file is missing
    /// or unreadable.
    pub fn open_default() -> Self {
        Self::open(Path::new(LEADERBOARD_PATH))
    }

    pub fn open(path: &Path) -> Self {
        let entries = match Self::read_entries(path) {
            Ok(entries) => entries,
            Err(e) => {
                if path.exists() {
                    log::warn!(
                        "LEADERBOARD: Failed to read {:?} ({}), starting empty",
                        path,
                        e
                    );
                }
                Vec::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    fn read_entries(path: &Path) -> std::io::Result<Vec<LeaderboardEntry>> {
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )
        })
    }

    /// Entries in rank order, best first.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Whether `score` would enter the board: there is room, or it
    /// beats the current last place.
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_some_and(|last| score > last.score)
    }

    /// Appends an entry, re-ranks, truncates to the cap and persists.
    /// The in-memory board keeps the entry even when the write fails.
    pub fn save(&mut self, name: &str, score: u32, accuracy: f64) -> std::io::Result<()> {
        let date = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        self.entries.push(LeaderboardEntry {
            name: name.to_string(),
            score,
            accuracy,
            date,
        });
        self.entries
            .sort_by_key(|e| (Reverse(e.score), Reverse(OrderedFloat(e.accuracy))));
        self.entries.truncate(MAX_ENTRIES);

        self.write_entries()
    }

    fn write_entries(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )
        })?;

        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_board(tag: &str) -> Leaderboard {
        let path = std::env::temp_dir().join(format!(
            "neoclick_leaderboard_{}_{}.json",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Leaderboard::open(&path)
    }

    fn cleanup(board: &Leaderboard) {
        let _ = fs::remove_file(&board.path);
    }

    #[test]
    fn keeps_at_most_ten_entries_sorted_by_score() {
        let mut board = temp_board("cap");
        for score in [300, 1200, 700, 100, 900, 400, 1500, 200, 800, 600, 1100, 50] {
            board.save("player", score, 90.0).unwrap();
        }

        assert_eq!(board.entries().len(), MAX_ENTRIES);
        for pair in board.entries().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // The weakest scores fell off the board.
        assert_eq!(board.entries().last().unwrap().score, 200);
        assert!(board.entries().iter().all(|e| e.score > 100));
        cleanup(&board);
    }

    #[test]
    fn accuracy_breaks_score_ties() {
        let mut board = temp_board("ties");
        board.save("first", 500, 82.0).unwrap();
        board.save("second", 500, 97.5).unwrap();

        assert_eq!(board.entries()[0].name, "second");
        assert_eq!(board.entries()[1].name, "first");
        cleanup(&board);
    }

    #[test]
    fn qualifies_tracks_room_and_last_place() {
        let mut board = temp_board("qualify");
        assert!(board.qualifies(1));

        for i in 0..MAX_ENTRIES {
            board.save("player", 1000 + i as u32 * 10, 90.0).unwrap();
        }
        // Full board: only beating last place (score 1000) qualifies.
        assert!(!board.qualifies(999));
        assert!(!board.qualifies(1000));
        assert!(board.qualifies(1001));
        cleanup(&board);
    }

    #[test]
    fn entries_survive_a_reopen() {
        let mut board = temp_board("reopen");
        board.save("keeper", 777, 88.8).unwrap();
        let path = board.path.clone();

        let reopened = Leaderboard::open(&path);
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0].name, "keeper");
        assert_eq!(reopened.entries()[0].score, 777);
        assert!(reopened.entries()[0].date > 0);
        cleanup(&board);
    }

    #[test]
    fn corrupt_files_start_an_empty_board() {
        let path = std::env::temp_dir().join(format!(
            "neoclick_leaderboard_corrupt_{}.json",
            std::process::id()
        ));
        fs::write(&path, b"not json at all").unwrap();

        let board = Leaderboard::open(&path);
        assert!(board.entries().is_empty());
        let _ = fs::remove_file(&path);
    }
}
