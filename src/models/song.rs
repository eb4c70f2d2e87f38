//! Built-in song catalog.
//!
//! Songs are static configuration: tempo, difficulty tier, a display
//! color and the melody sequence played back one note per landed hit.

use std::fmt;

/// Note frequencies in Hz (equal temperament, A4 = 440).
#[allow(dead_code)]
pub mod note {
    pub const C3: f32 = 130.81;
    pub const D3: f32 = 146.83;
    pub const E3: f32 = 164.81;
    pub const F3: f32 = 174.61;
    pub const G3: f32 = 196.00;
    pub const A3: f32 = 220.00;
    pub const B3: f32 = 246.94;
    pub const C4: f32 = 261.63;
    pub const D4: f32 = 293.66;
    pub const E4: f32 = 329.63;
    pub const F4: f32 = 349.23;
    pub const G4: f32 = 392.00;
    pub const A4: f32 = 440.00;
    pub const B4: f32 = 493.88;
    pub const C5: f32 = 523.25;
    pub const D5: f32 = 587.33;
    pub const E5: f32 = 659.25;
    pub const F5: f32 = 698.46;
    pub const G5: f32 = 783.99;
    pub const A5: f32 = 880.00;
    pub const B5: f32 = 987.77;
    pub const C6: f32 = 1046.50;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Spawn-rate divisor: Hard spawns two targets per beat.
    pub fn spawn_divisor(self) -> f64 {
        match self {
            Difficulty::Hard => 2.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "EASY"),
            Difficulty::Normal => write!(f, "NORMAL"),
            Difficulty::Hard => write!(f, "HARD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub bpm: f64,
    pub difficulty: Difficulty,
    /// Melody played back one note per landed hit, looping.
    pub notes: &'static [f32],
    /// RGBA tint applied to this song's targets.
    pub base_color: [f32; 4],
}

impl Song {
    /// Milliseconds per beat.
    pub fn beat_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Time between target spawns, in milliseconds.
    pub fn spawn_interval_ms(&self) -> f64 {
        self.beat_ms() / self.difficulty.spawn_divisor()
    }

    /// Target lifetime: two beats to land the click, in milliseconds.
    pub fn target_life_ms(&self) -> f64 {
        self.beat_ms() * 2.0
    }
}

use note::*;

static SONGS: [Song; 3] = [
    Song {
        id: "ode_to_joy",
        title: "Digital Ode",
        artist: "Beethoven (Remix)",
        bpm: 90.0,
        difficulty: Difficulty::Easy,
        notes: &[
            E4, E4, F4, G4, G4, F4, E4, D4, C4, C4, D4, E4, E4, D4, D4, //
            E4, E4, F4, G4, G4, F4, E4, D4, C4, C4, D4, E4, D4, C4, C4, //
            D4, D4, E4, C4, D4, E4, F4, E4, C4, D4, E4, F4, E4, D4, C4, D4, G3,
        ],
        base_color: [0.13, 0.83, 0.93, 1.0], // Cyan
    },
    Song {
        id: "jasmine",
        title: "Cyber Jasmine",
        artist: "Traditional",
        bpm: 110.0,
        difficulty: Difficulty::Normal,
        notes: &[
            E4, E4, G4, A4, C5, C5, A4, G4, G4, A4, C5, G4, A4, G4, E4, D4, //
            E4, G4, E4, D4, C4, A3, D4, E4, C4, D4, E4, G4, A4, C5, A4, G4,
        ],
        base_color: [0.93, 0.28, 0.60, 1.0], // Pink
    },
    Song {
        id: "neon_pulse",
        title: "Neon Pulse",
        artist: "System",
        bpm: 135.0,
        difficulty: Difficulty::Hard,
        notes: &[
            A3, C4, E4, A4, E4, C4, A3, C4, G3, B3, D4, G4, D4, B3, G3, B3, //
            F3, A3, C4, F4, C4, A3, F3, A3, E3, G3, B3, E4, B3, G3, E3, G3, //
            A3, A4, G4, E4, D4, C4, D4, E4,
        ],
        base_color: [0.66, 0.33, 0.97, 1.0], // Purple
    },
];

/// The built-in catalog. The first entry is the default selection.
pub fn builtin_songs() -> &'static [Song] {
    &SONGS
}

pub fn song_by_id(id: &str) -> Option<&'static Song> {
    SONGS.iter().find(|song| song.id == id)
}

pub fn default_song() -> &'static Song {
    &SONGS[0]
}
