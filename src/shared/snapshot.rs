//! Session snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of session state sent from the logic
//! thread to the presentation. This decouples game logic from display.

use crate::models::stats::GameStats;
use crate::models::target::Target;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Song select, nothing running.
    Menu,
    /// Live gameplay: loop and scheduler active.
    Playing,
    /// Lives exhausted; commentary request in flight.
    Analyzing,
    /// Final screen with stats and commentary.
    GameOver,
}

/// Which half of the basic beat fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatKind {
    Kick,
    Snare,
}

/// Best-effort beat notification for visual pulsing.
#[derive(Debug, Clone, Copy)]
pub struct BeatPulse {
    /// Monotonic beat counter since session start.
    pub index: u64,
    pub kind: BeatKind,
    /// Audio-clock time the beat is scheduled at, in seconds.
    pub at: f64,
}

/// Snapshot of session state for the presentation.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub stats: GameStats,
    /// Live targets, oldest first.
    pub targets: Vec<Target>,
    pub lives: u32,
    /// Id of the selected song.
    pub song_id: String,
    /// Commentary text, present once the session reaches game over.
    pub ai_comment: Option<String>,
    /// Whether the current score would enter the leaderboard.
    pub score_qualifies: bool,
}
