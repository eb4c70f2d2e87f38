//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` provides a centralized communication hub for all threads
//! in the application, using lock-free channels for message passing.

use crate::input::events::GameAction;
use crate::shared::snapshot::{BeatPulse, SessionSnapshot};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::time::Instant;

/// System-level events broadcast to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Play area resized to new dimensions (device pixels).
    Resize { width: f32, height: f32 },
    /// Application shutdown requested.
    Quit,
}

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Schedule a kick drum at an absolute audio-clock time (seconds).
    Kick { at: f64 },
    /// Schedule a snare burst at an absolute audio-clock time (seconds).
    Snare { at: f64 },
    /// Play a melodic pluck immediately.
    Pluck { freq: f32 },
    /// Change master volume (0.0 to 1.0).
    SetVolume { volume: f32 },
}

/// Aggregates the cross-thread communication channels.
///
/// The `SystemBus` is the central hub for inter-thread communication,
/// providing channels for:
/// - Game actions from the presentation
/// - Session snapshots to the presentation
/// - System events (resize, quit)
/// - Audio commands to the audio thread
/// - Beat pulses from the scheduler
#[derive(Clone)]
pub struct SystemBus {
    /// Presentation → Logic: gameplay actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Main → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Presentation: session snapshots.
    pub snapshot_tx: Sender<SessionSnapshot>,
    pub snapshot_rx: Receiver<SessionSnapshot>,

    /// Scheduler/Logic → Audio: one-shot sound commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Scheduler → Presentation: beat pulses for visual feedback.
    pub beat_tx: Sender<BeatPulse>,
    pub beat_rx: Receiver<BeatPulse>,

    /// Samples pulled by the output device since boot.
    /// Written by the audio callback, read wherever beat time is needed.
    pub audio_samples: Arc<AtomicU64>,

    /// True when a real output device is driving `audio_samples`.
    pub audio_device_backed: Arc<AtomicBool>,

    /// Process start, the epoch of the silent-mode fallback clock.
    pub boot: Instant,
}

impl SystemBus {
    /// Creates a new system bus with all channels initialized.
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded();
        let (sys_tx, sys_rx) = unbounded();

        // Bounded snapshot channel: max 2 frames queued to limit latency
        let (snapshot_tx, snapshot_rx) = bounded(2);

        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        // Beat pulses are droppable; a small buffer absorbs bursts.
        let (beat_tx, beat_rx) = bounded(16);

        Self {
            action_tx,
            action_rx,
            sys_tx,
            sys_rx,
            snapshot_tx,
            snapshot_rx,
            audio_cmd_tx,
            audio_cmd_rx,
            beat_tx,
            beat_rx,
            audio_samples: Arc::new(AtomicU64::new(0)),
            audio_device_backed: Arc::new(AtomicBool::new(false)),
            boot: Instant::now(),
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
