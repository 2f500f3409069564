pub mod config;
pub mod recording;
pub mod sampler;
pub mod shutdown;
pub mod tracker;

pub use config::Config;
pub use recording::{
    read_rows, CsvRow, CsvSink, RecordOutcome, RecorderConfig, RecordingMode, SampleSink, Session,
    SessionRecorder, SessionStats, WriteStrategy,
};
pub use sampler::{is_attending, AttentionSample, CoordinateSpace, GazePosition, Sampler, SamplerConfig};
pub use shutdown::{InterruptAction, ShutdownSignal};
pub use tracker::{
    ProviderKind, ScriptedProvider, SimulatedProvider, TrackingConfidence, TrackingProvider,
    TrackingSample, ViewportGeometry,
};
