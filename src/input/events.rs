//! Actions the presentation layer forwards into the logic thread.

/// One of the two designated trigger keys (Z / X on a default layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKey {
    Primary,
    Secondary,
}

impl TriggerKey {
    /// Slot in per-key held-state arrays.
    pub fn index(self) -> usize {
        match self {
            TriggerKey::Primary => 0,
            TriggerKey::Secondary => 1,
        }
    }
}

/// Gameplay commands crossing the presentation/logic boundary.
///
/// Coordinates are device pixels; the playfield converts them against
/// the current play-area size.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    // Menu
    SelectSong(String),
    Start,

    // Gameplay
    PointerMove { x: f32, y: f32 },
    /// Pointer press that landed on a specific target.
    TargetPress { id: u64, x: f32, y: f32 },
    /// Trigger key pressed; hit-tests the last pointer position.
    TriggerDown { key: TriggerKey },
    TriggerUp { key: TriggerKey },

    // Result screen
    SaveScore(String),
    ReturnToMenu,
}
