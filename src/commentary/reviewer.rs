//! Built-in offline judge.
//!
//! Stands in for a cloud commentary service: a short, slightly
//! theatrical verdict composed from the final stats. High accuracy
//! earns praise, low accuracy earns mockery, the middle gets a nudge.

use crate::commentary::{PerformanceReviewer, ReviewRequest};

const PRAISE_THRESHOLD: f64 = 90.0;
const MOCKERY_THRESHOLD: f64 = 70.0;

pub struct LocalReviewer;

impl LocalReviewer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalReviewer {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceReviewer for LocalReviewer {
    fn review(&self, request: &ReviewRequest) -> Result<String, String> {
        Ok(compose(request))
    }
}

fn compose(request: &ReviewRequest) -> String {
    if request.hits == 0 {
        return format!(
            "{} targets came and went and you touched none of them. Were you even holding the mouse?",
            request.misses
        );
    }

    if request.accuracy >= PRAISE_THRESHOLD {
        format!(
            "A rhythm master walks among us. {:.1}% accuracy and a {}x streak for {} points. Take a bow.",
            request.accuracy, request.max_combo, request.score
        )
    } else if request.accuracy < MOCKERY_THRESHOLD {
        format!(
            "{:.1}% accuracy? That wasn't drumming, that was swatting flies. {} targets got away clean.",
            request.accuracy, request.misses
        )
    } else {
        format!(
            "Solid groove. {} hits banked {} points, but {} slips kept you off the podium. One more run?",
            request.hits, request.score, request.misses
        )
    }
}
