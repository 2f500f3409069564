use anyhow::{bail, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::provider::{TrackingProvider, TrackingSample};

/// Plays back a fixed sequence of tracking samples
///
/// Used to drive the sampler without hardware. Once the script runs out the
/// provider either keeps returning the last sample or fails the read.
pub struct ScriptedProvider {
    script: VecDeque<TrackingSample>,
    last: Option<TrackingSample>,
    repeat_last: bool,
    starts: bool,
    reads: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    /// Provider whose reads fail once `samples` is exhausted
    pub fn new(samples: Vec<TrackingSample>) -> Self {
        Self {
            script: samples.into(),
            last: None,
            repeat_last: false,
            starts: true,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider that returns `sample` forever
    pub fn repeating(sample: TrackingSample) -> Self {
        Self::new(vec![sample]).repeat_last()
    }

    /// Keep returning the final sample instead of failing
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }

    /// Make `start` report that the tracker could not be reached
    pub fn unavailable(mut self) -> Self {
        self.starts = false;
        self
    }

    /// Shared counter of successful reads
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

#[async_trait::async_trait]
impl TrackingProvider for ScriptedProvider {
    async fn start(&mut self) -> Result<bool> {
        Ok(self.starts)
    }

    async fn read_latest(&mut self) -> Result<TrackingSample> {
        let sample = match self.script.pop_front() {
            Some(sample) => sample,
            None => match (self.repeat_last, self.last) {
                (true, Some(last)) => last,
                _ => bail!(
                    "Tracking script exhausted after {} reads",
                    self.reads.load(Ordering::SeqCst)
                ),
            },
        };

        self.last = Some(sample);
        self.reads.fetch_add(1, Ordering::SeqCst);

        Ok(sample)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
