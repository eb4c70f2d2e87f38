//! Audio control handle and the shared audio clock.
//!
//! This module provides a thread-safe interface for triggering sounds
//! without blocking the game logic thread, plus the clock every beat
//! is scheduled against.

use crate::logic::synth::SAMPLE_RATE;
use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// Wrapper for sending commands to the audio thread.
///
/// The `AudioHandle` does not perform audio operations directly.
/// Instead, it sends commands through a channel to a dedicated audio
/// thread, ensuring non-blocking audio control from the logic thread.
#[derive(Clone)]
pub struct AudioHandle {
    cmd_tx: Sender<AudioCommand>,
}

impl AudioHandle {
    /// Creates a new audio handle connected to the system bus.
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
        }
    }

    /// Schedules a kick drum at an absolute audio-clock time.
    pub fn kick_at(&self, at: f64) {
        let _ = self.cmd_tx.send(AudioCommand::Kick { at });
    }

    /// Schedules a snare at an absolute audio-clock time.
    pub fn snare_at(&self, at: f64) {
        let _ = self.cmd_tx.send(AudioCommand::Snare { at });
    }

    /// Plays a melody note immediately.
    pub fn pluck(&self, freq: f32) {
        let _ = self.cmd_tx.send(AudioCommand::Pluck { freq });
    }

    /// Sets the master volume (0.0 to 1.0).
    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume { volume });
    }
}

/// Monotonic clock all beats are scheduled against.
///
/// Seconds are derived from the number of samples the output device has
/// pulled, so scheduled sounds land exactly where the hardware is. When
/// no device exists the clock falls back to wall time measured from
/// process boot, keeping the scheduler alive in silent mode.
#[derive(Clone)]
pub struct AudioClock {
    samples: Arc<AtomicU64>,
    device_backed: Arc<AtomicBool>,
    boot: Instant,
}

impl AudioClock {
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            samples: bus.audio_samples.clone(),
            device_backed: bus.audio_device_backed.clone(),
            boot: bus.boot,
        }
    }

    /// Current audio time in seconds.
    pub fn now_seconds(&self) -> f64 {
        if self.device_backed.load(Ordering::Acquire) {
            self.samples.load(Ordering::Acquire) as f64 / SAMPLE_RATE as f64
        } else {
            self.boot.elapsed().as_secs_f64()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_backed_clock_counts_samples() {
        let bus = SystemBus::new();
        bus.audio_device_backed.store(true, Ordering::Release);
        bus.audio_samples.store(44100, Ordering::Release);

        let clock = AudioClock::new(&bus);
        assert!((clock.now_seconds() - 1.0).abs() < 1e-9);

        bus.audio_samples.store(22050, Ordering::Release);
        assert!((clock.now_seconds() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn silent_mode_clock_advances_with_wall_time() {
        let bus = SystemBus::new();
        let clock = AudioClock::new(&bus);

        let a = clock.now_seconds();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = clock.now_seconds();
        assert!(b > a);
    }

    #[test]
    fn clones_share_the_same_epoch() {
        let bus = SystemBus::new();
        let a = AudioClock::new(&bus);
        let b = AudioClock::new(&bus);
        // Both fall back to the bus boot instant, so readings agree.
        assert!((a.now_seconds() - b.now_seconds()).abs() < 0.05);
    }
}
