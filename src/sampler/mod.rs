//! Gaze sampling
//!
//! This module turns raw tracker readings into attention samples:
//! - Classification of a reading as looking / not looking
//! - The fixed-rate polling loop that feeds the session recorder

mod attention;
mod config;
mod sampler;

pub use attention::{is_attending, AttentionSample, CoordinateSpace, GazePosition};
pub use config::SamplerConfig;
pub use sampler::Sampler;
