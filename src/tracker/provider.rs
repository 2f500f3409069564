use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Tracking quality reported by the eye tracker
///
/// Discriminants match the integer levels the tracker SDK reports, which is
/// also what ends up in the `confidence` column of a session file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingConfidence {
    /// No reliable estimate is available
    LostTracking = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TrackingConfidence {
    pub fn is_lost(self) -> bool {
        self == TrackingConfidence::LostTracking
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(level: i32) -> Option<Self> {
        match level {
            0 => Some(Self::LostTracking),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }
}

/// Screen rectangle the tracker maps gaze onto, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ViewportGeometry {
    /// Viewport covering a screen of the given resolution, anchored at (0, 0)
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Convert a pixel position to fractions of the viewport size
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.left as f64) / self.width() as f64,
            (y - self.top as f64) / self.height() as f64,
        )
    }

    /// Convert a normalized position back to pixels
    pub fn denormalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.left as f64 + x * self.width() as f64,
            self.top as f64 + y * self.height() as f64,
        )
    }
}

/// One reading from the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSample {
    /// Head-pose tracking quality
    pub head_confidence: TrackingConfidence,
    /// Screen gaze tracking quality
    pub gaze_confidence: TrackingConfidence,
    /// Gaze point of regard in screen pixels
    pub point_of_regard: (f64, f64),
    /// Gaze point of regard as fractions of the viewport; may fall outside [0, 1]
    pub normalized_point_of_regard: (f64, f64),
}

impl TrackingSample {
    /// Build a sample from a pixel position, deriving the normalized point
    pub fn at_pixel(
        viewport: &ViewportGeometry,
        x: f64,
        y: f64,
        head_confidence: TrackingConfidence,
        gaze_confidence: TrackingConfidence,
    ) -> Self {
        Self {
            head_confidence,
            gaze_confidence,
            point_of_regard: (x, y),
            normalized_point_of_regard: viewport.normalize(x, y),
        }
    }

    /// Build a sample from a normalized position, deriving the pixel point
    pub fn at_normalized(
        viewport: &ViewportGeometry,
        x: f64,
        y: f64,
        head_confidence: TrackingConfidence,
        gaze_confidence: TrackingConfidence,
    ) -> Self {
        Self {
            head_confidence,
            gaze_confidence,
            point_of_regard: viewport.denormalize(x, y),
            normalized_point_of_regard: (x, y),
        }
    }

    pub fn head_lost(&self) -> bool {
        self.head_confidence.is_lost()
    }

    pub fn gaze_lost(&self) -> bool {
        self.gaze_confidence.is_lost()
    }
}

/// Which tracker implementation the binary drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Synthetic gaze stream (dry runs, demos)
    Simulated,
}

/// Eye tracker capability consumed by the sampler
///
/// Construction plays the role of "initialize": an implementation is created
/// with an application name and a viewport, then started once. Reads have no
/// timeout; a provider that hangs stalls the sampler.
#[async_trait::async_trait]
pub trait TrackingProvider: Send {
    /// Attempt to start the tracker
    ///
    /// Returns `false` when the tracker could not be reached.
    async fn start(&mut self) -> Result<bool>;

    /// Read the latest tracking state
    async fn read_latest(&mut self) -> Result<TrackingSample>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
