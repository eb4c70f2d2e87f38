//! Logic thread module for session state management and updates.
//!
//! This module contains the main game loop that runs at a fixed tick rate
//! and coordinates between input, audio, and presentation subsystems.

pub mod audio;
pub mod audio_thread;
pub mod playfield;
pub mod scheduler;
pub mod session;
pub mod synth;

use crate::commentary::ReviewManager;
use crate::leaderboard::Leaderboard;
use crate::models::settings::Settings;
use crate::system::bus::{SystemBus, SystemEvent};
use session::Session;
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the logic thread.
const TPS: u64 = 240;

/// Spawns the main logic thread that owns the session state machine.
///
/// This thread runs a fixed-timestep game loop that:
/// 1. Processes actions from the presentation
/// 2. Handles system events (resize, quit)
/// 3. Updates session state at a fixed rate
/// 4. Sends session snapshots to the presentation
pub fn start_thread(
    bus: SystemBus,
    settings: Settings,
    reviews: ReviewManager,
    leaderboard: Leaderboard,
) {
    // Start the dedicated audio thread
    audio_thread::start_audio_thread(bus.clone());

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let mut session = Session::new(&bus, &settings, reviews, leaderboard);

            let mut accumulator = Duration::new(0, 0);
            let mut last_time = Instant::now();
            let target_dt = Duration::from_secs_f64(1.0 / TPS as f64);

            loop {
                // 1. Process input actions
                while let Ok(action) = bus.action_rx.try_recv() {
                    session.handle_action(action);
                }

                // 2. Handle system events
                while let Ok(sys_evt) = bus.sys_rx.try_recv() {
                    match sys_evt {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received...");
                            session.shutdown();
                            return;
                        }
                        SystemEvent::Resize { width, height } => {
                            session.resize(width, height);
                        }
                    }
                }

                // 3. Fixed-timestep update loop
                let current_time = Instant::now();
                let delta = current_time - last_time;
                last_time = current_time;
                accumulator += delta;

                let mut updated = false;
                let mut loops = 0;
                while accumulator >= target_dt && loops < 10 {
                    session.update(target_dt.as_secs_f64());
                    accumulator -= target_dt;
                    loops += 1;
                    updated = true;
                }

                // 4. Send a snapshot only if we updated
                // This avoids publishing duplicates of an unchanged tick
                if updated {
                    let _ = bus.snapshot_tx.try_send(session.create_snapshot());
                }

                // Adaptive sleep: less sleep when there's heavy workload
                if loops == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        })
        .expect("Failed to spawn Logic thread");
}
