//! Session scoring statistics.
//!
//! This module defines the combo-based scoring system, including
//! accuracy calculation and attempt tracking.

/// Accumulated scoring state for a play session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub score: u32,
    /// Current hit streak.
    pub combo: u32,
    /// Best streak reached this session.
    pub max_combo: u32,
    pub hits: u32,
    pub misses: u32,
    /// Percentage in [0, 100]. Defined as 100 before the first attempt.
    pub accuracy: f64,
    /// Every attempt routed into the session, landed or not.
    pub clicks: u32,
}

impl GameStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            hits: 0,
            misses: 0,
            accuracy: 100.0,
            clicks: 0,
        }
    }

    /// Applies a landed hit and returns the points awarded.
    ///
    /// The combo scales the reward: 100 base points plus 10 per combo
    /// step held *before* this hit.
    pub fn apply_hit(&mut self) -> u32 {
        let points = 100 + self.combo * 10;
        self.score += points;
        self.hits += 1;
        self.combo += 1;
        if self.combo > self.max_combo {
            self.max_combo = self.combo;
        }
        self.refresh_accuracy();
        points
    }

    /// Records an expired target: the streak breaks, accuracy drops.
    pub fn apply_miss(&mut self) {
        self.combo = 0;
        self.misses += 1;
        self.refresh_accuracy();
    }

    /// Counts one attempt (pointer press or trigger key), regardless of
    /// whether it lands.
    pub fn record_click(&mut self) {
        self.clicks += 1;
    }

    fn refresh_accuracy(&mut self) {
        let attempts = self.hits + self.misses;
        if attempts > 0 {
            self.accuracy = self.hits as f64 / attempts as f64 * 100.0;
        }
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_100_before_first_attempt() {
        assert_eq!(GameStats::new().accuracy, 100.0);
    }

    #[test]
    fn accuracy_follows_hits_over_attempts() {
        let mut stats = GameStats::new();
        stats.apply_hit();
        stats.apply_hit();
        stats.apply_hit();
        stats.apply_miss();
        // 3 hits out of 4 attempts.
        assert!((stats.accuracy - 75.0).abs() < 1e-9);

        let mut all_misses = GameStats::new();
        for _ in 0..5 {
            all_misses.apply_miss();
        }
        assert_eq!(all_misses.accuracy, 0.0);
    }

    #[test]
    fn combo_scales_points() {
        let mut stats = GameStats::new();
        assert_eq!(stats.apply_hit(), 100);
        assert_eq!(stats.apply_hit(), 110);
        assert_eq!(stats.apply_hit(), 120);
        assert_eq!(stats.score, 330);
    }

    #[test]
    fn miss_resets_combo_but_not_max_combo() {
        let mut stats = GameStats::new();
        stats.apply_hit();
        stats.apply_hit();
        assert_eq!(stats.max_combo, 2);

        stats.apply_miss();
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 2);

        stats.apply_hit();
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.max_combo, 2);
    }

    #[test]
    fn max_combo_never_decreases() {
        let mut stats = GameStats::new();
        let mut best = 0;
        let pattern = [true, true, true, false, true, false, true, true, true, true, false];
        for landed in pattern {
            if landed {
                stats.apply_hit();
            } else {
                stats.apply_miss();
            }
            assert!(stats.max_combo >= best);
            best = stats.max_combo;
        }
        assert_eq!(stats.max_combo, 4);
    }

    #[test]
    fn clicks_count_every_attempt() {
        let mut stats = GameStats::new();
        stats.record_click();
        stats.apply_hit();
        stats.record_click();
        // Second attempt hit nothing.
        assert_eq!(stats.clicks, 2);
        assert_eq!(stats.hits, 1);
    }
}
