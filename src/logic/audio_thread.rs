//! Dedicated audio thread that synthesizes and plays every sound.
//!
//! This keeps device handling and sample generation off the game logic
//! thread. All one-shots are mixed directly on the output stream, so a
//! kick, a snare and several plucks can overlap freely.

use crate::logic::audio::AudioClock;
use crate::logic::synth::{KickSource, PluckSource, SnareSource};
use crate::system::bus::{AudioCommand, SystemBus};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    /// Keeps the clock ticker alive for the lifetime of the worker.
    _clock_sink: Option<Sink>,
    clock: AudioClock,
    volume: f32,
    /// True if audio is available, false for silent mode
    has_audio: bool,
}

impl AudioWorker {
    fn new(bus: &SystemBus) -> Self {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => {
                // Park an endless silent ticker on its own sink; every
                // sample the device pulls advances the shared clock.
                let ticker = ClockTicker::new(bus.audio_samples.clone());
                let clock_sink = match Sink::try_new(&stream_handle) {
                    Ok(sink) => {
                        sink.append(ticker);
                        Some(sink)
                    }
                    Err(e) => {
                        log::error!("AUDIO: Failed to create clock sink: {}", e);
                        None
                    }
                };
                bus.audio_device_backed
                    .store(clock_sink.is_some(), Ordering::Release);

                log::info!("AUDIO: Device found, audio enabled");
                Self {
                    _stream: Some(stream),
                    stream_handle: Some(stream_handle),
                    _clock_sink: clock_sink,
                    clock: AudioClock::new(bus),
                    volume: 0.5,
                    has_audio: true,
                }
            }
            Err(e) => {
                log::warn!(
                    "AUDIO: No audio device found ({}), running in silent mode",
                    e
                );
                Self {
                    _stream: None,
                    stream_handle: None,
                    _clock_sink: None,
                    clock: AudioClock::new(bus),
                    volume: 0.5,
                    has_audio: false,
                }
            }
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Kick { at } => self.play_scheduled(KickSource::new(), at),
            AudioCommand::Snare { at } => self.play_scheduled(SnareSource::new(), at),
            AudioCommand::Pluck { freq } => self.play_now(PluckSource::new(freq)),
            AudioCommand::SetVolume { volume } => {
                self.volume = volume.clamp(0.0, 1.0);
            }
        }
    }

    /// Plays a source at an absolute audio-clock time by prepending the
    /// remaining lead as silence. Times already in the past start
    /// immediately.
    fn play_scheduled<S>(&self, source: S, at: f64)
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let lead = (at - self.clock.now_seconds()).max(0.0);
        self.play_now(source.delay(Duration::from_secs_f64(lead)));
    }

    fn play_now<S>(&self, source: S)
    where
        S: Source<Item = f32> + Send + 'static,
    {
        if !self.has_audio {
            return;
        }
        let Some(stream_handle) = &self.stream_handle else {
            return;
        };
        if let Err(e) = stream_handle.play_raw(source.amplify(self.volume)) {
            log::error!("AUDIO: Playback failed: {}", e);
        }
    }
}

/// Infinite silent source whose only job is advancing the sample
/// counter as the device consumes it.
struct ClockTicker {
    samples: Arc<AtomicU64>,
}

impl ClockTicker {
    fn new(samples: Arc<AtomicU64>) -> Self {
        Self { samples }
    }
}

impl Iterator for ClockTicker {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.samples.fetch_add(1, Ordering::Relaxed);
        Some(0.0)
    }
}

impl Source for ClockTicker {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }
    fn channels(&self) -> u16 {
        1
    }
    fn sample_rate(&self) -> u32 {
        crate::logic::synth::SAMPLE_RATE
    }
    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Starts the dedicated audio thread.
pub fn start_audio_thread(bus: SystemBus) {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let mut worker = AudioWorker::new(&bus);

            while let Ok(cmd) = bus.audio_cmd_rx.recv() {
                worker.handle_command(cmd);
            }

            log::info!("AUDIO: Thread stopped");
        })
        .expect("Failed to spawn Audio thread");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ticker_advances_the_shared_counter() {
        let samples = Arc::new(AtomicU64::new(0));
        let mut ticker = ClockTicker::new(samples.clone());

        for _ in 0..1000 {
            assert_eq!(ticker.next(), Some(0.0));
        }
        assert_eq!(samples.load(Ordering::Relaxed), 1000);
    }
}
