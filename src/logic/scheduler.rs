//! Tempo-synced beat scheduling.
//!
//! The beat grid lives on the audio clock, not on any thread timer: a
//! polling thread only *commits* upcoming beats to the audio thread a
//! little ahead of time, so jitter in the poll cadence never shifts
//! where a beat actually sounds.

use crate::logic::audio::{AudioClock, AudioHandle};
use crate::shared::snapshot::{BeatKind, BeatPulse};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// How far ahead beats are committed to the audio thread, in seconds.
const LOOKAHEAD_SECS: f64 = 0.1;
/// Offset of the first beat after start, in seconds.
const START_OFFSET_SECS: f64 = 0.1;
/// Poll cadence of the scheduler thread.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One beat committed to the audio timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Monotonic index since session start.
    pub index: u64,
    pub kind: BeatKind,
    /// Absolute audio-clock time, in seconds.
    pub at: f64,
}

/// Drift-free beat generator.
///
/// `next_beat_time` always advances by exactly one beat period, so the
/// grid stays anchored to the audio clock no matter how late a poll
/// runs; a stalled poller emits the backlog in one burst instead of
/// shifting the grid.
#[derive(Debug)]
pub struct BeatClock {
    next_beat_time: f64,
    beat_index: u64,
    seconds_per_beat: f64,
}

impl BeatClock {
    /// Starts the grid a fixed offset after `now`.
    pub fn start(bpm: f64, now: f64) -> Self {
        Self {
            next_beat_time: now + START_OFFSET_SECS,
            beat_index: 0,
            seconds_per_beat: 60.0 / bpm,
        }
    }

    /// Drains every beat falling inside the lookahead window at `now`.
    /// Even indices are kicks, odd indices snares.
    pub fn poll(&mut self, now: f64) -> Vec<Beat> {
        let mut due = Vec::new();
        while self.next_beat_time < now + LOOKAHEAD_SECS {
            let kind = if self.beat_index % 2 == 0 {
                BeatKind::Kick
            } else {
                BeatKind::Snare
            };
            due.push(Beat {
                index: self.beat_index,
                kind,
                at: self.next_beat_time,
            });
            self.next_beat_time += self.seconds_per_beat;
            self.beat_index += 1;
        }
        due
    }
}

/// Handle to the scheduler thread of one session.
///
/// Dropping the handle stops the thread, so a forgotten session can
/// never keep drumming in the background.
pub struct RhythmScheduler {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RhythmScheduler {
    /// Spawns the scheduler thread for one session.
    pub fn start(
        bpm: f64,
        clock: AudioClock,
        audio: AudioHandle,
        beat_tx: Sender<BeatPulse>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::Builder::new()
            .name("Rhythm Scheduler".to_string())
            .spawn(move || {
                log::debug!("SCHEDULER: Thread started ({} bpm)", bpm);

                let mut beat_clock = BeatClock::start(bpm, clock.now_seconds());

                while !stop_flag.load(Ordering::Acquire) {
                    for beat in beat_clock.poll(clock.now_seconds()) {
                        match beat.kind {
                            BeatKind::Kick => audio.kick_at(beat.at),
                            BeatKind::Snare => audio.snare_at(beat.at),
                        }
                        // Best-effort pulse; dropped when nobody drains.
                        let _ = beat_tx.try_send(BeatPulse {
                            index: beat.index,
                            kind: beat.kind,
                            at: beat.at,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }

                log::debug!("SCHEDULER: Thread stopped");
            })
            .expect("Failed to spawn Rhythm Scheduler thread");

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stops the scheduler and waits for the thread. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("SCHEDULER: Thread panicked");
        }
    }
}

impl Drop for RhythmScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
