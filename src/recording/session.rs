use chrono::{DateTime, Utc};

use crate::sampler::AttentionSample;

/// Ordered, append-only sequence of attention samples for one run
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    samples: Vec<AttentionSample>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: format!("session-{}", uuid::Uuid::new_v4()),
            started_at: Utc::now(),
            samples: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append a sample in capture order
    pub fn push(&mut self, sample: AttentionSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[AttentionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
