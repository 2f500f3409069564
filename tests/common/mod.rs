// Shared fixtures for the integration tests

#![allow(dead_code)]

use anyhow::{bail, Result};
use gaze_attention::{
    CoordinateSpace, SampleSink, SamplerConfig, Session, TrackingConfidence, TrackingSample,
    ViewportGeometry,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub fn viewport() -> ViewportGeometry {
    ViewportGeometry::from_size(1600, 900)
}

pub fn normalized(x: f64, y: f64, confidence: TrackingConfidence) -> TrackingSample {
    TrackingSample::at_normalized(&viewport(), x, y, confidence, confidence)
}

pub fn lost() -> TrackingSample {
    normalized(0.5, 0.5, TrackingConfidence::LostTracking)
}

pub fn sampler_config(rate: f64, coordinates: CoordinateSpace) -> SamplerConfig {
    SamplerConfig {
        sample_rate_hz: rate,
        coordinates,
        echo: false,
    }
}

/// What a [`LoggingSink`] has seen
#[derive(Debug, Default)]
pub struct SinkLog {
    /// Session length at each `on_sample` call
    pub seen_lengths: Vec<usize>,
    /// Session length at `finish`, if it ran
    pub finished_with: Option<usize>,
}

/// In-memory sink that records its calls and can be told to fail
pub struct LoggingSink {
    state: Arc<Mutex<SinkLog>>,
    /// 1-based `on_sample` calls that fail
    fail_on: HashSet<usize>,
    fail_finish: bool,
    calls: usize,
}

impl LoggingSink {
    pub fn new() -> (Self, Arc<Mutex<SinkLog>>) {
        let state = Arc::new(Mutex::new(SinkLog::default()));
        (
            Self {
                state: state.clone(),
                fail_on: HashSet::new(),
                fail_finish: false,
                calls: 0,
            },
            state,
        )
    }

    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_on = calls.iter().copied().collect();
        self
    }

    pub fn failing_finish(mut self) -> Self {
        self.fail_finish = true;
        self
    }
}

impl SampleSink for LoggingSink {
    fn on_sample(&mut self, session: &Session) -> Result<()> {
        self.calls += 1;
        if self.fail_on.contains(&self.calls) {
            bail!("disk full");
        }
        self.state.lock().unwrap().seen_lengths.push(session.len());
        Ok(())
    }

    fn finish(&mut self, session: &Session) -> Result<()> {
        if self.fail_finish {
            bail!("disk full");
        }
        self.state.lock().unwrap().finished_with = Some(session.len());
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}
