// End-of-session attention chart
//
// Two panels share the time axis (seconds since the first sample):
// - a scatter of attention state, one dot per sample
// - a timeline bar, one colored segment per sample
// Red marks looking at the screen, green marks looking away.

use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::recorder::SampleSink;
use super::session::Session;
use crate::sampler::AttentionSample;

const CHART_SIZE: (u32, u32) = (1000, 400);
/// Height of the scatter panel; the timeline bar gets the rest
const SCATTER_HEIGHT: u32 = 308;

const LOOKING_COLOR: RGBColor = RED;
const AWAY_COLOR: RGBColor = GREEN;

/// Buffer-then-render sink: draws the chart once the session is over
pub struct ChartSink {
    path: PathBuf,
    sample_interval: Duration,
}

impl ChartSink {
    pub fn new(path: impl Into<PathBuf>, sample_interval: Duration) -> Self {
        Self {
            path: path.into(),
            sample_interval,
        }
    }
}

impl SampleSink for ChartSink {
    fn on_sample(&mut self, _session: &Session) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, session: &Session) -> Result<()> {
        if session.is_empty() {
            warn!("No samples to plot, skipping {}", self.path.display());
            return Ok(());
        }

        info!("Capture finished, rendering {} samples...", session.len());
        render_attention_chart(&self.path, session.samples(), self.sample_interval)?;
        info!("Chart written: {}", self.path.display());

        Ok(())
    }

    fn name(&self) -> &str {
        "chart"
    }
}

/// Render the attention timeline of `samples` to an SVG file
pub fn render_attention_chart(
    path: &Path,
    samples: &[AttentionSample],
    sample_interval: Duration,
) -> Result<()> {
    let first = samples
        .first()
        .ok_or_else(|| anyhow!("Cannot plot an empty session"))?;
    let t0 = first.elapsed();
    let interval = sample_interval.as_secs_f64();

    let points: Vec<(f64, bool)> = samples
        .iter()
        .map(|s| (s.elapsed().saturating_sub(t0).as_secs_f64(), s.is_attending()))
        .collect();
    let x_max = points.last().map(|(t, _)| *t).unwrap_or(0.0) + interval.max(f64::EPSILON);

    let color = |looking: bool| if looking { LOOKING_COLOR } else { AWAY_COLOR };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(SCATTER_HEIGHT);

    let mut scatter = ChartBuilder::on(&upper)
        .caption("Red = looking, green = looked away", ("sans-serif", 18))
        .margin(10)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..x_max, 0f64..2f64)?;

    scatter
        .configure_mesh()
        .disable_mesh()
        .y_labels(0)
        .y_desc("Gaze")
        .draw()?;

    scatter.draw_series(
        points
            .iter()
            .map(|&(t, looking)| Circle::new((t, 1.0), 5, color(looking).filled())),
    )?;

    let mut timeline = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..x_max, 0f64..1f64)?;

    timeline
        .configure_mesh()
        .disable_mesh()
        .y_labels(0)
        .x_desc("Time (s)")
        .draw()?;

    timeline.draw_series(points.iter().map(|&(t, looking)| {
        Rectangle::new([(t, 0.0), (t + interval, 1.0)], color(looking).filled())
    }))?;

    root.present()?;

    Ok(())
}
