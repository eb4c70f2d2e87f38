//! Target lifecycle: tempo-synced spawning, aging and hit resolution.

use crate::models::song::Song;
use crate::models::target::Target;
use rand::Rng;

/// Spawn diameter of every target, in layout units.
pub const TARGET_MAX_SIZE: f32 = 130.0;

/// Play-area size in device pixels, fed by resize events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Owns every live target of one session.
pub struct Playfield {
    targets: Vec<Target>,
    next_id: u64,
    last_spawn_ms: f64,
    spawn_interval_ms: f64,
    life_duration_ms: f64,
    color: [f32; 4],
    area: PlayArea,
}

impl Playfield {
    pub fn new(song: &Song) -> Self {
        Self {
            targets: Vec::new(),
            next_id: 1,
            last_spawn_ms: 0.0,
            spawn_interval_ms: song.spawn_interval_ms(),
            life_duration_ms: song.target_life_ms(),
            color: song.base_color,
            area: PlayArea::default(),
        }
    }

    pub fn set_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Advances the field to `now_ms`: spawns on the tempo cadence,
    /// shrinks live targets and removes expired ones. Returns how many
    /// targets expired unclicked.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if now_ms - self.last_spawn_ms > self.spawn_interval_ms {
            self.spawn(now_ms);
            self.last_spawn_ms = now_ms;
        }

        let mut missed = 0;
        self.targets.retain_mut(|target| {
            if target.progress(now_ms) >= 1.0 {
                missed += 1;
                false
            } else {
                target.update_size(now_ms);
                true
            }
        });
        missed
    }

    fn spawn(&mut self, now_ms: f64) {
        let mut rng = rand::rng();
        self.targets.push(Target {
            id: self.next_id,
            // Keep a margin from the edges so full circles stay visible.
            x: rng.random_range(15.0..85.0),
            y: rng.random_range(20.0..80.0),
            size: TARGET_MAX_SIZE,
            max_size: TARGET_MAX_SIZE,
            created_at: now_ms,
            life_duration: self.life_duration_ms,
            color: self.color,
        });
        self.next_id += 1;
    }

    /// Removes the target with `id`. Unknown ids are a no-op: the
    /// target already expired or an earlier press consumed it.
    pub fn take_by_id(&mut self, id: u64) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(index))
    }

    /// Circle-tests `cursor` (device pixels) against the live targets
    /// and removes the first match, oldest spawn winning ties. The
    /// hitbox keeps the full spawn radius so shrunken targets stay
    /// clickable.
    pub fn take_at_cursor(&mut self, cursor: (f32, f32)) -> Option<Target> {
        let index = self
            .targets
            .iter()
            .position(|t| self.hitbox_contains(t, cursor))?;
        Some(self.targets.remove(index))
    }

    fn hitbox_contains(&self, target: &Target, cursor: (f32, f32)) -> bool {
        let center_x = target.x / 100.0 * self.area.width;
        let center_y = target.y / 100.0 * self.area.height;
        let dx = cursor.0 - center_x;
        let dy = cursor.1 - center_y;
        let radius = target.max_size / 2.0;
        dx * dx + dy * dy <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::song::{Difficulty, builtin_songs};

    fn song_with(bpm: f64, difficulty: Difficulty) -> Song {
        Song {
            bpm,
            difficulty,
            ..builtin_songs()[0].clone()
        }
    }

    #[test]
    fn spawns_once_per_interval() {
        // 120 bpm easy: one target every 500 ms.
        let mut field = Playfield::new(&song_with(120.0, Difficulty::Easy));

        assert_eq!(field.update(400.0), 0);
        assert_eq!(field.targets().len(), 0);

        field.update(501.0);
        assert_eq!(field.targets().len(), 1);

        // Interval restarts from the actual spawn time.
        field.update(900.0);
        assert_eq!(field.targets().len(), 1);
        field.update(1002.0);
        assert_eq!(field.targets().len(), 2);
    }

    #[test]
    fn hard_difficulty_spawns_twice_per_beat() {
        let mut field = Playfield::new(&song_with(120.0, Difficulty::Hard));

        field.update(251.0);
        field.update(502.0);
        assert_eq!(field.targets().len(), 2);
    }

    #[test]
    fn spawned_targets_live_two_beats() {
        // 90 bpm: ~1333 ms of life.
        let mut field = Playfield::new(&song_with(90.0, Difficulty::Easy));
        field.update(700.0);

        let target = &field.targets()[0];
        assert!((target.life_duration - 1333.333).abs() < 0.01);
        assert_eq!(target.created_at, 700.0);
    }

    #[test]
    fn expired_targets_count_as_misses() {
        let mut field = Playfield::new(&song_with(90.0, Difficulty::Easy));
        field.update(700.0);
        assert_eq!(field.targets().len(), 1);
        let first_id = field.targets()[0].id;

        // One tick before expiry: still alive and shrunken. The spawn
        // cadence also drops a second target on this tick.
        assert_eq!(field.update(2000.0), 0);
        assert_eq!(field.targets()[0].id, first_id);
        assert!(field.targets()[0].size > 0.0);
        assert!(field.targets()[0].size < TARGET_MAX_SIZE);

        let missed = field.update(700.0 + 1334.0);
        assert_eq!(missed, 1);
        assert!(field.targets().iter().all(|t| t.id != first_id));
    }

    #[test]
    fn spawn_positions_stay_inside_the_margins() {
        let mut field = Playfield::new(&song_with(120.0, Difficulty::Hard));
        let mut now = 0.0;
        for _ in 0..100 {
            now += 251.0;
            field.update(now);
            for target in field.targets() {
                assert!(target.x >= 15.0 && target.x < 85.0);
                assert!(target.y >= 20.0 && target.y < 80.0);
            }
        }
    }

    #[test]
    fn take_by_id_consumes_exactly_one_target() {
        let mut field = Playfield::new(&song_with(120.0, Difficulty::Hard));
        field.update(251.0);
        field.update(502.0);
        let first_id = field.targets()[0].id;

        assert!(field.take_by_id(first_id).is_some());
        assert_eq!(field.targets().len(), 1);

        // Same id again: already consumed, no-op.
        assert!(field.take_by_id(first_id).is_none());
        assert!(field.take_by_id(9999).is_none());
        assert_eq!(field.targets().len(), 1);
    }

    fn place(field: &mut Playfield, id: u64, x: f32, y: f32) {
        field.targets.push(Target {
            id,
            x,
            y,
            size: TARGET_MAX_SIZE,
            max_size: TARGET_MAX_SIZE,
            created_at: 0.0,
            life_duration: 1000.0,
            color: [1.0; 4],
        });
    }

    #[test]
    fn cursor_hits_respect_the_full_spawn_radius() {
        let mut field = Playfield::new(&song_with(90.0, Difficulty::Easy));
        field.set_area(PlayArea {
            width: 1000.0,
            height: 1000.0,
        });
        // Center lands at (500, 500); the hitbox radius is 65 px.
        place(&mut field, 1, 50.0, 50.0);

        assert!(field.take_at_cursor((560.0, 500.0)).is_some());

        place(&mut field, 2, 50.0, 50.0);
        assert!(field.take_at_cursor((570.0, 500.0)).is_none());
        assert_eq!(field.targets().len(), 1);
    }

    #[test]
    fn overlapping_targets_resolve_to_the_oldest() {
        let mut field = Playfield::new(&song_with(120.0, Difficulty::Easy));
        field.set_area(PlayArea {
            width: 1000.0,
            height: 1000.0,
        });
        place(&mut field, 1, 50.0, 50.0);
        place(&mut field, 2, 51.0, 50.0);

        // Both hitboxes cover this point; the earlier spawn wins.
        let hit = field.take_at_cursor((505.0, 500.0));
        assert_eq!(hit.map(|t| t.id), Some(1));
        assert_eq!(field.targets()[0].id, 2);
    }
}
