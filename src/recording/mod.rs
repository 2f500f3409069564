//! Session recording
//!
//! This module owns the attention samples of one session and decides what
//! happens to them:
//! - Streaming-persist: the CSV table is written after every tick
//! - Buffer-then-render: samples stay in memory and a chart is drawn at the end

mod chart;
mod csv_sink;
mod recorder;
mod session;
mod stats;

pub use chart::{render_attention_chart, ChartSink};
pub use csv_sink::{read_rows, CsvRow, CsvSink, WriteStrategy};
pub use recorder::{RecordOutcome, RecorderConfig, RecordingMode, SampleSink, SessionRecorder};
pub use session::Session;
pub use stats::SessionStats;
