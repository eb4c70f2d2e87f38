//! Session state machine: menu, live play, analysis and game over.

use crate::commentary::{FALLBACK_COMMENT, ReviewManager, ReviewRequest};
use crate::input::events::{GameAction, TriggerKey};
use crate::leaderboard::Leaderboard;
use crate::logic::audio::{AudioClock, AudioHandle};
use crate::logic::playfield::{PlayArea, Playfield};
use crate::logic::scheduler::RhythmScheduler;
use crate::models::settings::Settings;
use crate::models::song::{self, Song};
use crate::models::stats::GameStats;
use crate::shared::snapshot::{BeatPulse, SessionSnapshot, SessionStatus};
use crate::system::bus::SystemBus;
use crossbeam_channel::Sender;
use std::time::{Duration, Instant};

/// Lives at the start of every session.
pub const MAX_LIVES: u32 = 5;

/// How long the analysis phase waits for commentary before the
/// fallback line ships the result screen anyway.
const REVIEW_DEADLINE: Duration = Duration::from_secs(5);

pub struct Session {
    status: SessionStatus,
    stats: GameStats,
    lives: u32,
    playfield: Playfield,
    song: &'static Song,
    /// Next melody note to play on a landed hit.
    melody_cursor: usize,
    /// Session clock in milliseconds, reset on every start.
    clock_ms: f64,
    /// Last known pointer position, device pixels.
    cursor: (f32, f32),
    triggers_held: [bool; 2],
    area: PlayArea,
    ai_comment: Option<String>,

    scheduler: Option<RhythmScheduler>,
    audio: AudioHandle,
    audio_clock: AudioClock,
    beat_tx: Sender<BeatPulse>,
    master_volume: f32,

    reviews: ReviewManager,
    /// Bumped on every start; verdicts from older runs are ignored.
    generation: u64,
    analyzing_since: Option<Instant>,

    leaderboard: Leaderboard,
}

impl Session {
    pub fn new(
        bus: &SystemBus,
        settings: &Settings,
        reviews: ReviewManager,
        leaderboard: Leaderboard,
    ) -> Self {
        log::info!("LOGIC: Initializing session");

        let song = match song::song_by_id(&settings.song) {
            Some(song) => song,
            None => {
                log::warn!(
                    "LOGIC: Unknown song {:?} in settings, using default",
                    settings.song
                );
                song::default_song()
            }
        };

        Self {
            status: SessionStatus::Menu,
            stats: GameStats::new(),
            lives: MAX_LIVES,
            playfield: Playfield::new(song),
            song,
            melody_cursor: 0,
            clock_ms: 0.0,
            cursor: (0.0, 0.0),
            triggers_held: [false; 2],
            area: PlayArea::default(),
            ai_comment: None,
            scheduler: None,
            audio: AudioHandle::new(bus),
            audio_clock: AudioClock::new(bus),
            beat_tx: bus.beat_tx.clone(),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            reviews,
            generation: 0,
            analyzing_since: None,
            leaderboard,
        }
    }

    /// Advances the session by one fixed timestep.
    pub fn update(&mut self, dt: f64) {
        self.clock_ms += dt * 1000.0;

        match self.status {
            SessionStatus::Playing => {
                let missed = self.playfield.update(self.clock_ms);
                for _ in 0..missed {
                    self.stats.apply_miss();
                    self.lives = self.lives.saturating_sub(1);
                }
                if missed > 0 && self.lives == 0 {
                    self.end_game();
                }
            }
            SessionStatus::Analyzing => self.poll_review(),
            SessionStatus::Menu | SessionStatus::GameOver => {}
        }
    }

    pub fn handle_action(&mut self, action: GameAction) {
        match action {
            GameAction::SelectSong(id) => self.select_song(&id),
            GameAction::Start => self.start(),
            GameAction::PointerMove { x, y } => self.cursor = (x, y),
            GameAction::TargetPress { id, .. } => self.target_press(id),
            GameAction::TriggerDown { key } => self.trigger_down(key),
            GameAction::TriggerUp { key } => self.triggers_held[key.index()] = false,
            GameAction::SaveScore(name) => self.save_score(&name),
            GameAction::ReturnToMenu => self.return_to_menu(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.area = PlayArea { width, height };
        self.playfield.set_area(self.area);
    }

    pub fn shutdown(&mut self) {
        self.stop_scheduler();
    }

    pub fn create_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            stats: self.stats.clone(),
            targets: self.playfield.targets().to_vec(),
            lives: self.lives,
            song_id: self.song.id.to_string(),
            ai_comment: self.ai_comment.clone(),
            score_qualifies: self.stats.score > 0 && self.leaderboard.qualifies(self.stats.score),
        }
    }

    // --- Menu ---

    fn select_song(&mut self, id: &str) {
        if self.status != SessionStatus::Menu {
            return;
        }
        match song::song_by_id(id) {
            Some(song) => self.song = song,
            None => log::warn!("LOGIC: Unknown song id {:?}", id),
        }
    }

    /// Starts a fresh run, from the menu or straight off the result
    /// screen. Everything tied to the previous run is rebuilt.
    fn start(&mut self) {
        if self.status == SessionStatus::Playing {
            return;
        }

        self.stop_scheduler();
        self.generation += 1;
        self.stats = GameStats::new();
        self.lives = MAX_LIVES;
        self.playfield = Playfield::new(self.song);
        self.playfield.set_area(self.area);
        self.melody_cursor = 0;
        self.clock_ms = 0.0;
        self.ai_comment = None;
        self.analyzing_since = None;
        self.triggers_held = [false; 2];

        // Re-assert the volume so a muted or fresh device picks it up.
        self.audio.set_volume(self.master_volume);
        self.scheduler = Some(RhythmScheduler::start(
            self.song.bpm,
            self.audio_clock.clone(),
            self.audio.clone(),
            self.beat_tx.clone(),
        ));

        self.status = SessionStatus::Playing;
        log::info!(
            "LOGIC: Session started: {} ({} bpm, {})",
            self.song.title,
            self.song.bpm,
            self.song.difficulty
        );
    }

    // --- Gameplay ---

    fn target_press(&mut self, id: u64) {
        if self.status != SessionStatus::Playing {
            return;
        }
        self.stats.record_click();
        if self.playfield.take_by_id(id).is_some() {
            self.register_hit();
        }
    }

    fn trigger_down(&mut self, key: TriggerKey) {
        if self.status != SessionStatus::Playing {
            return;
        }
        let held = &mut self.triggers_held[key.index()];
        if *held {
            // OS key repeat; only the initial press counts.
            return;
        }
        *held = true;

        self.stats.record_click();
        if self.playfield.take_at_cursor(self.cursor).is_some() {
            self.register_hit();
        }
    }

    fn register_hit(&mut self) {
        self.stats.apply_hit();

        let notes = self.song.notes;
        if !notes.is_empty() {
            self.audio.pluck(notes[self.melody_cursor % notes.len()]);
            self.melody_cursor += 1;
        }
    }

    /// Lives exhausted: freeze play and hand the stats to the judge.
    fn end_game(&mut self) {
        self.stop_scheduler();
        self.playfield.clear();
        self.status = SessionStatus::Analyzing;
        self.analyzing_since = Some(Instant::now());
        self.ai_comment = None;
        self.reviews
            .submit(self.generation, ReviewRequest::from_stats(&self.stats));

        log::info!(
            "LOGIC: Game over: score {}, accuracy {:.1}%",
            self.stats.score,
            self.stats.accuracy
        );
    }

    // --- Analysis ---

    fn poll_review(&mut self) {
        if let Some(comment) = self.reviews.take_result(self.generation) {
            self.finish_analysis(comment);
            return;
        }

        let waited_too_long = self
            .analyzing_since
            .is_some_and(|since| since.elapsed() > REVIEW_DEADLINE);
        if waited_too_long {
            log::warn!("LOGIC: Review timed out, using fallback comment");
            self.finish_analysis(FALLBACK_COMMENT.to_string());
        }
    }

    fn finish_analysis(&mut self, comment: String) {
        self.ai_comment = Some(comment);
        self.analyzing_since = None;
        self.status = SessionStatus::GameOver;
    }

    // --- Result screen ---

    fn save_score(&mut self, name: &str) {
        if self.status != SessionStatus::GameOver {
            return;
        }
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Err(e) = self
            .leaderboard
            .save(name, self.stats.score, self.stats.accuracy)
        {
            log::error!("LOGIC: Failed to save score: {}", e);
        }
    }

    fn return_to_menu(&mut self) {
        self.stop_scheduler();
        self.status = SessionStatus::Menu;
    }

    fn stop_scheduler(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }
}
