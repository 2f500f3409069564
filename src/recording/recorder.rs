use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use super::chart::ChartSink;
use super::csv_sink::{CsvSink, WriteStrategy};
use super::session::Session;
use super::stats::SessionStats;
use crate::sampler::AttentionSample;

/// What the recorder does with samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    /// Persist the whole table to CSV after every tick
    Streaming,
    /// Keep samples in memory and render a chart when the session ends
    Render,
}

/// Configuration for the session recorder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub mode: RecordingMode,

    /// Session table written in streaming mode
    pub csv_path: PathBuf,

    /// SVG chart written in render mode
    pub chart_path: PathBuf,

    /// How the table is brought up to date after each tick
    pub write_strategy: WriteStrategy,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            mode: RecordingMode::Streaming,
            csv_path: PathBuf::from("data1.csv"),
            chart_path: PathBuf::from("attention.svg"),
            write_strategy: WriteStrategy::Rewrite,
        }
    }
}

/// Destination for session samples
///
/// `on_sample` runs after every append with the full session so far;
/// `finish` runs once when sampling stops.
pub trait SampleSink: Send {
    fn on_sample(&mut self, session: &Session) -> Result<()>;

    fn finish(&mut self, session: &Session) -> Result<()>;

    /// Sink name for logging
    fn name(&self) -> &str;
}

/// Result of recording one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Sample appended and handed to the sink
    Recorded,
    /// Sample appended but the sink failed; it stays in memory for the next write
    WriteFailed,
}

/// Accumulates attention samples and forwards them to a sink
pub struct SessionRecorder {
    session: Session,
    sink: Box<dyn SampleSink>,
    write_failures: usize,
}

impl SessionRecorder {
    /// Build the recorder for the configured mode
    ///
    /// `sample_interval` is the sampler period, used as the bar width of the
    /// rendered timeline.
    pub fn new(config: &RecorderConfig, sample_interval: Duration) -> Result<Self> {
        let sink: Box<dyn SampleSink> = match config.mode {
            RecordingMode::Streaming => Box::new(
                CsvSink::new(&config.csv_path, config.write_strategy)
                    .context("Failed to prepare CSV output")?,
            ),
            RecordingMode::Render => Box::new(ChartSink::new(&config.chart_path, sample_interval)),
        };

        Ok(Self::with_sink(sink))
    }

    pub fn with_sink(sink: Box<dyn SampleSink>) -> Self {
        let session = Session::new();

        info!("Recording {} to {}", session.id(), sink.name());

        Self {
            session,
            sink,
            write_failures: 0,
        }
    }

    /// Append a sample and hand the session to the sink
    ///
    /// Sink failures are logged and counted, never dropped silently: the
    /// sample remains in the session and the next write catches up.
    pub fn record(&mut self, sample: AttentionSample) -> RecordOutcome {
        self.session.push(sample);

        match self.sink.on_sample(&self.session) {
            Ok(()) => RecordOutcome::Recorded,
            Err(e) => {
                self.write_failures += 1;
                error!(
                    "{} write failed at sample {} ({} failures so far): {:#}",
                    self.sink.name(),
                    self.session.len(),
                    self.write_failures,
                    e
                );
                RecordOutcome::WriteFailed
            }
        }
    }

    /// Finalize the sink and summarize the session
    ///
    /// Unlike per-tick writes, a failure here is returned: there is no later
    /// write left to catch up.
    pub fn finish(&mut self) -> Result<SessionStats> {
        if self.session.is_empty() {
            warn!("Session {} ended without samples", self.session.id());
        }

        self.sink
            .finish(&self.session)
            .with_context(|| format!("Failed to finalize {}", self.sink.name()))?;

        let stats = self.stats();
        info!(
            "Session {} complete: {} samples, {:.0}% attending, {} write failures",
            stats.session_id,
            stats.samples,
            stats.attention_ratio * 100.0,
            stats.write_failures
        );

        Ok(stats)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn write_failures(&self) -> usize {
        self.write_failures
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_session(&self.session, self.write_failures)
    }
}
