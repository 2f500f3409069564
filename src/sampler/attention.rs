use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::tracker::{TrackingConfidence, TrackingSample};

/// Coordinate space gaze positions are recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Integer screen pixels
    Pixel,
    /// Fractions of the viewport; points outside [0, 1] count as looking away
    Normalized,
}

/// Recorded gaze position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "lowercase")]
pub enum GazePosition {
    Pixel { x: i64, y: i64 },
    Normalized { x: f64, y: f64 },
}

impl GazePosition {
    pub fn x(&self) -> f64 {
        match *self {
            GazePosition::Pixel { x, .. } => x as f64,
            GazePosition::Normalized { x, .. } => x,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            GazePosition::Pixel { y, .. } => y as f64,
            GazePosition::Normalized { y, .. } => y,
        }
    }
}

impl fmt::Display for GazePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GazePosition::Pixel { x, y } => write!(f, "({}, {})", x, y),
            GazePosition::Normalized { x, y } => write!(f, "({:.2}, {:.2})", x, y),
        }
    }
}

fn in_unit_range(v: f64) -> bool {
    // NaN fails both comparisons and is treated as off-screen
    (0.0..=1.0).contains(&v)
}

/// Whether a tracking reading counts as the user looking at the screen
///
/// Lost head-pose or lost gaze tracking always means not attending. In
/// normalized space the point of regard must also lie inside the viewport.
pub fn is_attending(sample: &TrackingSample, space: CoordinateSpace) -> bool {
    if sample.head_lost() || sample.gaze_lost() {
        return false;
    }

    match space {
        CoordinateSpace::Pixel => true,
        CoordinateSpace::Normalized => {
            let (x, y) = sample.normalized_point_of_regard;
            in_unit_range(x) && in_unit_range(y)
        }
    }
}

/// One classified, timestamped observation
///
/// Only constructed through [`AttentionSample::classify`], so the attention
/// flag always agrees with the confidence and position it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionSample {
    timestamp: DateTime<Local>,
    elapsed: Duration,
    gaze: GazePosition,
    confidence: TrackingConfidence,
    head_confidence: TrackingConfidence,
    is_attending: bool,
}

impl AttentionSample {
    /// Classify a tracker reading
    ///
    /// `elapsed` is the monotonic offset from the start of the session.
    pub fn classify(
        sample: &TrackingSample,
        space: CoordinateSpace,
        timestamp: DateTime<Local>,
        elapsed: Duration,
    ) -> Self {
        let gaze = match space {
            CoordinateSpace::Pixel => {
                let (x, y) = sample.point_of_regard;
                GazePosition::Pixel {
                    x: x as i64,
                    y: y as i64,
                }
            }
            CoordinateSpace::Normalized => {
                let (x, y) = sample.normalized_point_of_regard;
                GazePosition::Normalized { x, y }
            }
        };

        Self {
            timestamp,
            elapsed,
            gaze,
            confidence: sample.gaze_confidence,
            head_confidence: sample.head_confidence,
            is_attending: is_attending(sample, space),
        }
    }

    /// Wall-clock capture time
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Time since the session started
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn gaze(&self) -> GazePosition {
        self.gaze
    }

    /// Gaze tracking confidence
    pub fn confidence(&self) -> TrackingConfidence {
        self.confidence
    }

    pub fn head_confidence(&self) -> TrackingConfidence {
        self.head_confidence
    }

    pub fn is_attending(&self) -> bool {
        self.is_attending
    }

    /// Console line for live monitoring
    pub fn describe(&self) -> String {
        format!(
            "[{}] looking={} | head_lost={} | gaze_lost={} | gaze={} | conf={}",
            self.timestamp.format("%H:%M:%S"),
            if self.is_attending { "yes" } else { "no" },
            self.head_confidence.is_lost(),
            self.confidence.is_lost(),
            self.gaze,
            self.confidence.as_i32()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ViewportGeometry;

    fn tracked(x: f64, y: f64) -> TrackingSample {
        TrackingSample::at_normalized(
            &ViewportGeometry::from_size(1600, 900),
            x,
            y,
            TrackingConfidence::High,
            TrackingConfidence::High,
        )
    }

    #[test]
    fn test_nan_position_is_not_attending() {
        let sample = tracked(f64::NAN, 0.5);
        assert!(!is_attending(&sample, CoordinateSpace::Normalized));
    }

    #[test]
    fn test_viewport_edges_are_inside() {
        assert!(is_attending(&tracked(0.0, 0.0), CoordinateSpace::Normalized));
        assert!(is_attending(&tracked(1.0, 1.0), CoordinateSpace::Normalized));
    }

    #[test]
    fn test_pixel_space_ignores_bounds() {
        let sample = tracked(1.5, 0.2);
        assert!(is_attending(&sample, CoordinateSpace::Pixel));
        assert!(!is_attending(&sample, CoordinateSpace::Normalized));
    }

    #[test]
    fn test_pixel_gaze_truncates() {
        let viewport = ViewportGeometry::from_size(1600, 900);
        let sample = TrackingSample::at_pixel(
            &viewport,
            812.9,
            -3.7,
            TrackingConfidence::Medium,
            TrackingConfidence::Medium,
        );

        let classified =
            AttentionSample::classify(&sample, CoordinateSpace::Pixel, Local::now(), Duration::ZERO);

        assert_eq!(classified.gaze(), GazePosition::Pixel { x: 812, y: -3 });
    }

    #[test]
    fn test_describe_mentions_classification() {
        let classified = AttentionSample::classify(
            &tracked(0.5, 0.5),
            CoordinateSpace::Normalized,
            Local::now(),
            Duration::ZERO,
        );

        let line = classified.describe();
        assert!(line.contains("looking=yes"));
        assert!(line.contains("gaze=(0.50, 0.50)"));
        assert!(line.contains("conf=3"));
    }
}
