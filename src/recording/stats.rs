use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::Session;

/// Summary of a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Time between the first and last sample in seconds
    pub duration_secs: f64,

    /// Number of samples recorded
    pub samples: usize,

    /// Samples classified as looking at the screen
    pub attending_samples: usize,

    /// Fraction of samples spent looking at the screen (0.0 to 1.0)
    pub attention_ratio: f64,

    /// Sink writes that failed during the session
    pub write_failures: usize,
}

impl SessionStats {
    pub fn from_session(session: &Session, write_failures: usize) -> Self {
        let samples = session.len();
        let attending_samples = session
            .samples()
            .iter()
            .filter(|s| s.is_attending())
            .count();

        let duration_secs = match (session.samples().first(), session.samples().last()) {
            (Some(first), Some(last)) => last.elapsed().saturating_sub(first.elapsed()).as_secs_f64(),
            _ => 0.0,
        };

        let attention_ratio = if samples == 0 {
            0.0
        } else {
            attending_samples as f64 / samples as f64
        };

        Self {
            session_id: session.id().to_string(),
            started_at: session.started_at(),
            duration_secs,
            samples,
            attending_samples,
            attention_ratio,
            write_failures,
        }
    }
}
