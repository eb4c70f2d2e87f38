//! Headless frontend driving a complete session over the bus.
//!
//! Stands in for a windowed presentation: it consumes snapshots and
//! beat pulses, aims a virtual pointer and fires the same actions a
//! mouse-and-keyboard player would, then reads out the result screen.

use crate::input::events::{GameAction, TriggerKey};
use crate::logic::session::MAX_LIVES;
use crate::models::settings::Settings;
use crate::models::song;
use crate::shared::snapshot::{SessionSnapshot, SessionStatus};
use crate::system::bus::{SystemBus, SystemEvent};
use rand::Rng;
use std::time::Duration;

const PLAY_AREA: (f32, f32) = (1280.0, 720.0);

/// Fraction of targets deliberately left to expire so the run ends.
const LAPSE_CHANCE: f64 = 0.25;

/// How much a target must shrink before the pilot strikes.
const STRIKE_PROGRESS: f32 = 0.35;

/// Virtual player: tracks one target at a time, alternates between
/// pointer presses and trigger keys, and occasionally just watches a
/// target die.
struct AutoPilot {
    aimed: Option<u64>,
    skip_current: bool,
    pressed: bool,
    use_trigger: bool,
    trigger_key: TriggerKey,
}

impl AutoPilot {
    fn new() -> Self {
        Self {
            aimed: None,
            skip_current: false,
            pressed: false,
            use_trigger: false,
            trigger_key: TriggerKey::Primary,
        }
    }

    /// Decides what to do about the oldest live target.
    fn act(&mut self, snapshot: &SessionSnapshot, actions: &mut Vec<GameAction>) {
        let Some(target) = snapshot.targets.first() else {
            return;
        };

        if self.aimed != Some(target.id) {
            log::debug!(
                "FRONTEND: tracking target {} at ({:.0}%, {:.0}%) tint {:?}",
                target.id,
                target.x,
                target.y,
                target.color
            );
            self.aimed = Some(target.id);
            self.pressed = false;
            self.skip_current = rand::rng().random_bool(LAPSE_CHANCE);
            self.use_trigger = !self.use_trigger;
        }
        if self.skip_current || self.pressed {
            return;
        }

        // Strike only once the circle visibly shrank.
        let progress = 1.0 - target.size / target.max_size;
        if progress < STRIKE_PROGRESS {
            return;
        }

        let x = target.x / 100.0 * PLAY_AREA.0;
        let y = target.y / 100.0 * PLAY_AREA.1;
        actions.push(GameAction::PointerMove { x, y });

        if self.use_trigger {
            let key = self.trigger_key;
            self.trigger_key = match key {
                TriggerKey::Primary => TriggerKey::Secondary,
                TriggerKey::Secondary => TriggerKey::Primary,
            };
            actions.push(GameAction::TriggerDown { key });
            actions.push(GameAction::TriggerUp { key });
        } else {
            actions.push(GameAction::TargetPress { id: target.id, x, y });
        }
        self.pressed = true;
    }
}

/// Runs one full menu → play → result → menu round trip, then quits.
pub fn run(bus: SystemBus, settings: Settings) {
    for entry in song::builtin_songs() {
        log::info!(
            "FRONTEND: [{}] {} - {} ({} bpm, {})",
            entry.id,
            entry.artist,
            entry.title,
            entry.bpm,
            entry.difficulty
        );
    }
    log::info!("FRONTEND: Autoplay session on {:?}", settings.song);

    let _ = bus.sys_tx.send(SystemEvent::Resize {
        width: PLAY_AREA.0,
        height: PLAY_AREA.1,
    });
    let _ = bus.action_tx.send(GameAction::SelectSong(settings.song.clone()));
    let _ = bus.action_tx.send(GameAction::Start);

    let mut pilot = AutoPilot::new();
    let mut announced_analysis = false;
    let mut shown_result = false;
    let mut lives_left = MAX_LIVES;

    loop {
        for pulse in bus.beat_rx.try_iter() {
            log::debug!(
                "FRONTEND: beat {} ({:?}) at {:.2}s",
                pulse.index,
                pulse.kind,
                pulse.at
            );
        }

        let snapshot = match bus.snapshot_rx.recv_timeout(Duration::from_secs(2)) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                log::error!("FRONTEND: Logic thread went quiet, aborting");
                break;
            }
        };

        match snapshot.status {
            SessionStatus::Playing => {
                if snapshot.lives != lives_left {
                    lives_left = snapshot.lives;
                    log::info!("FRONTEND: {} lives left", lives_left);
                }
                let mut actions = Vec::new();
                pilot.act(&snapshot, &mut actions);
                for action in actions {
                    let _ = bus.action_tx.send(action);
                }
            }
            SessionStatus::Analyzing => {
                if !announced_analysis {
                    announced_analysis = true;
                    log::info!("FRONTEND: Run over, waiting for the verdict...");
                }
            }
            SessionStatus::GameOver => {
                if !shown_result {
                    shown_result = true;
                    present_result(&bus, &snapshot, &settings);
                    let _ = bus.action_tx.send(GameAction::ReturnToMenu);
                }
            }
            SessionStatus::Menu => {
                if shown_result {
                    break;
                }
            }
        }
    }

    let _ = bus.sys_tx.send(SystemEvent::Quit);
}

fn present_result(bus: &SystemBus, snapshot: &SessionSnapshot, settings: &Settings) {
    let stats = &snapshot.stats;
    log::info!("FRONTEND: ========== RESULTS ==========");
    log::info!(
        "FRONTEND: Score {} | Max combo {}x | Accuracy {:.1}%",
        stats.score,
        stats.max_combo,
        stats.accuracy
    );
    log::info!(
        "FRONTEND: Hits {} | Misses {} | Clicks {}",
        stats.hits,
        stats.misses,
        stats.clicks
    );
    if let Some(comment) = &snapshot.ai_comment {
        log::info!("FRONTEND: Judge says: {}", comment);
    }

    if snapshot.score_qualifies {
        log::info!("FRONTEND: Leaderboard entry! Saving as {:?}", settings.player_name);
        let _ = bus
            .action_tx
            .send(GameAction::SaveScore(settings.player_name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::GameStats;
    use crate::models::target::Target;

    fn snapshot_with_target(id: u64, size: f32) -> SessionSnapshot {
        SessionSnapshot {
            status: SessionStatus::Playing,
            stats: GameStats::new(),
            targets: vec![Target {
                id,
                x: 50.0,
                y: 50.0,
                size,
                max_size: 130.0,
                created_at: 0.0,
                life_duration: 1000.0,
                color: [1.0; 4],
            }],
            lives: 5,
            song_id: "ode_to_joy".to_string(),
            ai_comment: None,
            score_qualifies: false,
        }
    }

    #[test]
    fn pilot_waits_for_targets_to_shrink() {
        let mut pilot = AutoPilot::new();

        let mut actions = Vec::new();
        pilot.act(&snapshot_with_target(1, 130.0), &mut actions);
        // Full-size target: aim registered, no strike yet.
        assert!(actions.is_empty());
    }

    #[test]
    fn pilot_strikes_each_target_once() {
        let mut pilot = AutoPilot::new();

        let mut actions = Vec::new();
        pilot.act(&snapshot_with_target(1, 130.0), &mut actions);
        // Force a strike regardless of the lapse roll.
        pilot.skip_current = false;

        pilot.act(&snapshot_with_target(1, 60.0), &mut actions);
        assert!(!actions.is_empty());

        // The same target never gets a second press.
        let before = actions.len();
        pilot.act(&snapshot_with_target(1, 40.0), &mut actions);
        assert_eq!(actions.len(), before);
    }
}
