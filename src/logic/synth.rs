//! Procedural one-shot instrument synthesis.
//!
//! Every sound in the game is generated sample-by-sample instead of
//! decoded from disk: a sine-drop kick, a filtered noise snare and a
//! sawtooth pluck for melody notes. Each instrument is a finite rodio
//! [`Source`] so overlapping one-shots mix freely on the output stream.

use rand::Rng;
use rodio::Source;
use std::f32::consts::TAU;
use std::time::Duration;

/// Sample rate of every generated source.
pub const SAMPLE_RATE: u32 = 44100;

const KICK_SECS: f32 = 0.5;
const SNARE_SECS: f32 = 0.2;
const PLUCK_SECS: f32 = 0.4;
/// The pluck filter sweeps for the first portion of the note only.
const PLUCK_SWEEP_SECS: f32 = 0.3;

/// Per-sample multiplier of an exponential ramp from `from` to `to`
/// over `secs`.
fn decay_factor(from: f32, to: f32, secs: f32) -> f32 {
    (to / from).powf(1.0 / (secs * SAMPLE_RATE as f32))
}

fn sample_count(secs: f32) -> usize {
    (secs * SAMPLE_RATE as f32) as usize
}

/// Kick drum: a sine whose pitch falls from 150 Hz to sub-audible over
/// half a second, with a matching gain drop (0.5 down to 0.01).
pub struct KickSource {
    phase: f32,
    freq: f32,
    freq_decay: f32,
    gain: f32,
    gain_decay: f32,
    remaining: usize,
}

impl KickSource {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            freq: 150.0,
            freq_decay: decay_factor(150.0, 0.01, KICK_SECS),
            gain: 0.5,
            gain_decay: decay_factor(0.5, 0.01, KICK_SECS),
            remaining: sample_count(KICK_SECS),
        }
    }
}

impl Default for KickSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for KickSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let sample = self.phase.sin() * self.gain;
        self.phase += TAU * self.freq / SAMPLE_RATE as f32;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        self.freq *= self.freq_decay;
        self.gain *= self.gain_decay;
        Some(sample)
    }
}

impl Source for KickSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining)
    }
    fn channels(&self) -> u16 {
        1
    }
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(KICK_SECS))
    }
}

/// Snare: a short white-noise burst pushed through a one-pole high-pass
/// at 1 kHz, gain falling from 0.3 to 0.01 over 200 ms.
pub struct SnareSource {
    noise: Vec<f32>,
    pos: usize,
    gain: f32,
    gain_decay: f32,
    hp_alpha: f32,
    prev_in: f32,
    prev_out: f32,
}

impl SnareSource {
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let noise = (0..sample_count(SNARE_SECS))
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();

        let dt = 1.0 / SAMPLE_RATE as f32;
        let rc = 1.0 / (TAU * 1000.0);

        Self {
            noise,
            pos: 0,
            gain: 0.3,
            gain_decay: decay_factor(0.3, 0.01, SNARE_SECS),
            hp_alpha: rc / (rc + dt),
            prev_in: 0.0,
            prev_out: 0.0,
        }
    }
}

impl Default for SnareSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SnareSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let raw = *self.noise.get(self.pos)?;
        self.pos += 1;

        let filtered = self.hp_alpha * (self.prev_out + raw - self.prev_in);
        self.prev_in = raw;
        self.prev_out = filtered;

        let sample = filtered * self.gain;
        self.gain *= self.gain_decay;
        Some(sample)
    }
}

impl Source for SnareSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.noise.len() - self.pos)
    }
    fn channels(&self) -> u16 {
        1
    }
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(SNARE_SECS))
    }
}

/// Melody pluck: a sawtooth at the note frequency behind a low-pass
/// whose cutoff sweeps from 2 kHz down to 200 Hz, gain from 0.15 to
/// near silence over 400 ms.
pub struct PluckSource {
    freq: f32,
    phase: f32,
    gain: f32,
    gain_decay: f32,
    cutoff: f32,
    cutoff_decay: f32,
    lp_state: f32,
    remaining: usize,
}

impl PluckSource {
    pub fn new(freq: f32) -> Self {
        Self {
            freq,
            phase: 0.0,
            gain: 0.15,
            gain_decay: decay_factor(0.15, 0.001, PLUCK_SECS),
            cutoff: 2000.0,
            cutoff_decay: decay_factor(2000.0, 200.0, PLUCK_SWEEP_SECS),
            lp_state: 0.0,
            remaining: sample_count(PLUCK_SECS),
        }
    }
}

impl Iterator for PluckSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let saw = 2.0 * self.phase - 1.0;
        self.phase += self.freq / SAMPLE_RATE as f32;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        // One-pole low-pass with the swept cutoff; the sweep bottoms out
        // at 200 Hz and holds there for the tail of the note.
        let w = TAU * self.cutoff / SAMPLE_RATE as f32;
        let alpha = w / (1.0 + w);
        self.lp_state += alpha * (saw - self.lp_state);
        self.cutoff = (self.cutoff * self.cutoff_decay).max(200.0);

        let sample = self.lp_state * self.gain;
        self.gain *= self.gain_decay;
        Some(sample)
    }
}

impl Source for PluckSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining)
    }
    fn channels(&self) -> u16 {
        1
    }
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(PLUCK_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_crossings(samples: &[f32]) -> usize {
        samples.windows(2).filter(|w| w[0].signum() != w[1].signum()).count()
    }

    #[test]
    fn sources_have_expected_lengths() {
        assert_eq!(KickSource::new().count(), 22050);
        assert_eq!(SnareSource::new().count(), 8820);
        assert_eq!(PluckSource::new(440.0).count(), 17640);
    }

    #[test]
    fn samples_stay_in_range() {
        for sample in KickSource::new() {
            assert!(sample.abs() <= 1.0);
        }
        for sample in SnareSource::new() {
            assert!(sample.abs() <= 1.0);
        }
        for sample in PluckSource::new(880.0) {
            assert!(sample.abs() <= 1.0);
        }
    }

    #[test]
    fn kick_pitch_falls_over_time() {
        let samples: Vec<f32> = KickSource::new().collect();
        let head = zero_crossings(&samples[..4410]);
        let tail = zero_crossings(&samples[samples.len() - 4410..]);
        // ~150 Hz at the start, near-DC at the end.
        assert!(head > 10, "head crossings: {}", head);
        assert!(tail < 3, "tail crossings: {}", tail);
    }

    #[test]
    fn envelopes_decay() {
        let energy = |samples: &[f32]| samples.iter().map(|s| s.abs()).sum::<f32>();

        let kick: Vec<f32> = KickSource::new().collect();
        assert!(energy(&kick[..2205]) > energy(&kick[kick.len() - 2205..]) * 4.0);

        let snare: Vec<f32> = SnareSource::new().collect();
        assert!(energy(&snare[..882]) > energy(&snare[snare.len() - 882..]) * 4.0);

        let pluck: Vec<f32> = PluckSource::new(440.0).collect();
        assert!(energy(&pluck[..4410]) > energy(&pluck[pluck.len() - 4410..]) * 4.0);
    }

    #[test]
    fn source_metadata_is_mono_44100() {
        let kick = KickSource::new();
        assert_eq!(kick.channels(), 1);
        assert_eq!(kick.sample_rate(), SAMPLE_RATE);
        assert_eq!(kick.total_duration(), Some(Duration::from_secs_f32(0.5)));
    }
}
