use anyhow::{bail, Context, Result};
use chrono::Local;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::attention::AttentionSample;
use super::config::SamplerConfig;
use crate::recording::{RecordOutcome, SessionRecorder, SessionStats};
use crate::shutdown::ShutdownSignal;
use crate::tracker::TrackingProvider;

/// Fixed-rate gaze sampler
///
/// Polls one tracker, classifies each reading and hands it to a recorder.
pub struct Sampler {
    provider: Box<dyn TrackingProvider>,
    config: SamplerConfig,
    period: Duration,
    ticks: usize,
}

impl Sampler {
    pub fn new(provider: Box<dyn TrackingProvider>, config: SamplerConfig) -> Result<Self> {
        let period = config.period()?;

        info!(
            "Sampler initialized: {} at {} Hz ({:?} coordinates)",
            provider.name(),
            config.sample_rate_hz,
            config.coordinates
        );

        Ok(Self {
            provider,
            config,
            period,
            ticks: 0,
        })
    }

    /// Start the tracker
    ///
    /// A tracker that does not come up is fatal; there is no retry.
    pub async fn start(&mut self) -> Result<()> {
        let started = self
            .provider
            .start()
            .await
            .with_context(|| format!("Failed to start tracker: {}", self.provider.name()))?;

        if !started {
            bail!(
                "Eye tracker '{}' did not start. Is the tracker application running?",
                self.provider.name()
            );
        }

        info!("Tracker started: {}", self.provider.name());
        Ok(())
    }

    /// Number of ticks executed so far
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Sample until `shutdown` fires, then finalize the recorder
    ///
    /// Cancellation is only observed between ticks, never during a read. A
    /// failed tracker read ends the session with an error and skips
    /// finalization; in streaming mode everything up to the previous tick is
    /// already on disk.
    pub async fn run(
        &mut self,
        recorder: &mut SessionRecorder,
        shutdown: &ShutdownSignal,
    ) -> Result<SessionStats> {
        let session_start = Instant::now();
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Sampling started (period {:.3}s). Press Ctrl+C to stop.",
            self.period.as_secs_f64()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let reading = match self.provider.read_latest().await {
                Ok(reading) => reading,
                Err(e) => {
                    error!("Tracker read failed after {} ticks: {:#}", self.ticks, e);
                    return Err(e.context("Failed to read tracking state"));
                }
            };

            let sample = AttentionSample::classify(
                &reading,
                self.config.coordinates,
                Local::now(),
                session_start.elapsed(),
            );

            if self.config.echo {
                println!("{}", sample.describe());
            }

            if let RecordOutcome::WriteFailed = recorder.record(sample) {
                debug!("Tick {} kept in memory until the next successful write", self.ticks);
            }

            self.ticks += 1;
        }

        info!("Sampling stopped after {} ticks", self.ticks);

        recorder.finish()
    }
}
