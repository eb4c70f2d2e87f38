//! Clickable target data.

/// A transient clickable circle on the play area.
///
/// Positions are percentages of the play area (0-100) so the presentation
/// can scale freely; sizes are layout units (pixels at 1:1 scale).
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Unique id within the session.
    pub id: u64,
    /// Horizontal center, percent of the play area width.
    pub x: f32,
    /// Vertical center, percent of the play area height.
    pub y: f32,
    /// Current visual diameter; shrinks linearly with age.
    pub size: f32,
    /// Diameter at spawn. Also fixes the hitbox radius (`max_size / 2`).
    pub max_size: f32,
    /// Session-clock timestamp of the spawn, in milliseconds.
    pub created_at: f64,
    /// Time until the target counts as a miss, in milliseconds.
    pub life_duration: f64,
    /// RGBA tint inherited from the song.
    pub color: [f32; 4],
}

impl Target {
    /// Age of the target at `now` (session-clock milliseconds).
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    /// Lifetime progress; `>= 1.0` means expired.
    pub fn progress(&self, now: f64) -> f64 {
        self.age(now) / self.life_duration
    }

    /// Shrinks `size` to match the age at `now`. Clamped at zero so an
    /// overdue target is never left with residual size.
    pub fn update_size(&mut self, now: f64) {
        let remaining = (1.0 - self.progress(now)).max(0.0);
        self.size = self.max_size * remaining as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target {
            id: 1,
            x: 50.0,
            y: 50.0,
            size: 130.0,
            max_size: 130.0,
            created_at: 1000.0,
            life_duration: 1333.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn size_is_non_increasing_with_age() {
        let mut t = target();
        let mut previous = t.size;
        for step in 0..20 {
            let now = 1000.0 + step as f64 * 100.0;
            t.update_size(now);
            assert!(t.size <= previous, "size grew at step {}", step);
            assert!(t.size >= 0.0 && t.size <= t.max_size);
            previous = t.size;
        }
    }

    #[test]
    fn size_reaches_zero_exactly_at_life_duration() {
        let mut t = target();
        t.update_size(1000.0 + t.life_duration);
        assert_eq!(t.size, 0.0);

        // Overdue targets stay at zero, never negative.
        t.update_size(1000.0 + t.life_duration * 2.0);
        assert_eq!(t.size, 0.0);
    }

    #[test]
    fn progress_marks_expiry() {
        let t = target();
        assert!(t.progress(1000.0) < 1.0);
        assert!(t.progress(2332.9) < 1.0);
        assert!(t.progress(1000.0 + t.life_duration) >= 1.0);
    }
}
