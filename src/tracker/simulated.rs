// Simulated eye tracker
//
// Produces a plausible gaze stream without hardware: the point of regard
// drifts around the screen, now and then glances off-screen, and tracking is
// occasionally lost for a few readings (user turned away, blinked, left).

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::provider::{TrackingConfidence, TrackingProvider, TrackingSample, ViewportGeometry};

/// Chance per reading that tracking drops out
const LOST_PROBABILITY: f64 = 0.04;
/// Chance per reading that the user glances off-screen
const GLANCE_PROBABILITY: f64 = 0.06;
/// Largest per-reading drift, as a fraction of the viewport
const MAX_DRIFT: f64 = 0.05;

pub struct SimulatedProvider {
    app_name: String,
    viewport: ViewportGeometry,
    rng: StdRng,
    started: bool,
    /// Current normalized gaze position
    position: (f64, f64),
    /// Remaining readings with lost tracking
    lost_for: u32,
    /// Remaining readings spent off-screen
    glance_for: u32,
}

impl SimulatedProvider {
    pub fn new(app_name: impl Into<String>, viewport: ViewportGeometry, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            app_name: app_name.into(),
            viewport,
            rng,
            started: false,
            position: (0.5, 0.5),
            lost_for: 0,
            glance_for: 0,
        }
    }

    fn step(&mut self) -> TrackingSample {
        if self.lost_for == 0 && self.rng.gen_bool(LOST_PROBABILITY) {
            self.lost_for = self.rng.gen_range(1..=5);
        }

        if self.lost_for > 0 {
            self.lost_for -= 1;
            // Gaze estimate is garbage while tracking is lost; the tracker
            // reports the last point it had.
            let (x, y) = self.position;
            return TrackingSample::at_normalized(
                &self.viewport,
                x,
                y,
                TrackingConfidence::LostTracking,
                TrackingConfidence::LostTracking,
            );
        }

        if self.glance_for == 0 && self.rng.gen_bool(GLANCE_PROBABILITY) {
            self.glance_for = self.rng.gen_range(2..=8);
        }

        let (x, y) = if self.glance_for > 0 {
            self.glance_for -= 1;
            // Off to one side of the screen
            let side = if self.rng.gen_bool(0.5) { -0.3 } else { 1.3 };
            (side + self.rng.gen_range(-0.1..0.1), self.rng.gen_range(0.0..1.0))
        } else {
            let (x, y) = self.position;
            let x = (x + self.rng.gen_range(-MAX_DRIFT..MAX_DRIFT)).clamp(0.0, 1.0);
            let y = (y + self.rng.gen_range(-MAX_DRIFT..MAX_DRIFT)).clamp(0.0, 1.0);
            self.position = (x, y);
            (x, y)
        };

        let gaze_confidence = match self.rng.gen_range(0..10) {
            0..=1 => TrackingConfidence::Low,
            2..=4 => TrackingConfidence::Medium,
            _ => TrackingConfidence::High,
        };

        TrackingSample::at_normalized(
            &self.viewport,
            x,
            y,
            TrackingConfidence::High,
            gaze_confidence,
        )
    }
}

#[async_trait::async_trait]
impl TrackingProvider for SimulatedProvider {
    async fn start(&mut self) -> Result<bool> {
        info!(
            "Simulated tracker started for {} ({}x{} viewport)",
            self.app_name,
            self.viewport.width(),
            self.viewport.height()
        );
        self.started = true;
        Ok(true)
    }

    async fn read_latest(&mut self) -> Result<TrackingSample> {
        if !self.started {
            anyhow::bail!("Simulated tracker read before start");
        }

        Ok(self.step())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
