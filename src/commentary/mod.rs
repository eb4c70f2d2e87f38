//! Post-game performance commentary.
//!
//! The reviewer sits behind a trait so the session can treat it as an
//! opaque, possibly slow judge: one request per game over, results
//! polled without blocking, failures swallowed into a fixed fallback
//! line, and stale verdicts discarded by generation.

pub mod reviewer;

pub use reviewer::LocalReviewer;

use crate::models::stats::GameStats;
use crossbeam_channel::{Sender, unbounded};
use std::sync::{Arc, Mutex};
use std::thread;

/// Comment used when the reviewer fails or takes too long.
pub const FALLBACK_COMMENT: &str =
    "The judges' booth is swamped right now, but everyone saw that run. Respect.";

/// Final stats handed to the reviewer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReviewRequest {
    pub score: u32,
    pub max_combo: u32,
    pub accuracy: f64,
    pub hits: u32,
    pub misses: u32,
}

impl ReviewRequest {
    pub fn from_stats(stats: &GameStats) -> Self {
        Self {
            score: stats.score,
            max_combo: stats.max_combo,
            accuracy: stats.accuracy,
            hits: stats.hits,
            misses: stats.misses,
        }
    }
}

/// A performance judge: takes final stats, returns a short verdict.
///
/// Implementations may do arbitrary work; errors never reach the
/// session, they become the fallback comment.
pub trait PerformanceReviewer: Send {
    fn review(&self, request: &ReviewRequest) -> Result<String, String>;
}

#[derive(Debug, Clone, PartialEq)]
enum ReviewStatus {
    Idle,
    Pending { generation: u64 },
    Ready { generation: u64, comment: String },
}

struct ReviewState {
    status: ReviewStatus,
}

struct ReviewJob {
    generation: u64,
    request: ReviewRequest,
}

/// Runs review requests on a background thread; the logic thread polls
/// for the result between ticks.
pub struct ReviewManager {
    state: Arc<Mutex<ReviewState>>,
    job_tx: Sender<ReviewJob>,
    _handle: thread::JoinHandle<()>,
}

impl ReviewManager {
    pub fn new(reviewer: Box<dyn PerformanceReviewer>) -> Self {
        let state = Arc::new(Mutex::new(ReviewState {
            status: ReviewStatus::Idle,
        }));
        let (job_tx, job_rx) = unbounded::<ReviewJob>();

        let state_clone = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("Review Thread".to_string())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    log::debug!(
                        "REVIEW: Request payload: {}",
                        serde_json::to_string(&job.request)
                            .unwrap_or_else(|_| "<unserializable>".to_string())
                    );
                    let comment = match reviewer.review(&job.request) {
                        Ok(text) => text,
                        Err(e) => {
                            log::warn!("REVIEW: Reviewer failed ({}), using fallback", e);
                            FALLBACK_COMMENT.to_string()
                        }
                    };
                    let mut s = state_clone.lock().unwrap();
                    s.status = ReviewStatus::Ready {
                        generation: job.generation,
                        comment,
                    };
                }
            })
            .expect("Failed to spawn Review thread");

        Self {
            state,
            job_tx,
            _handle: handle,
        }
    }

    /// Queues the single post-game review of `generation`.
    pub fn submit(&self, generation: u64, request: ReviewRequest) {
        {
            let mut s = self.state.lock().unwrap();
            s.status = ReviewStatus::Pending { generation };
        }
        let _ = self.job_tx.send(ReviewJob {
            generation,
            request,
        });
    }

    /// Takes the finished comment for `generation`, if any. Verdicts
    /// carrying any other generation belong to a session that was reset
    /// and are dropped.
    pub fn take_result(&self, generation: u64) -> Option<String> {
        let mut s = self.state.lock().unwrap();
        match &s.status {
            ReviewStatus::Ready {
                generation: g,
                comment,
            } if *g == generation => {
                let comment = comment.clone();
                s.status = ReviewStatus::Idle;
                Some(comment)
            }
            ReviewStatus::Ready { generation: g, .. } => {
                log::debug!("REVIEW: Dropping stale verdict from generation {}", g);
                s.status = ReviewStatus::Idle;
                None
            }
            _ => None,
        }
    }
}
