pub mod provider;
pub mod scripted;
pub mod simulated;

pub use provider::{
    ProviderKind, TrackingConfidence, TrackingProvider, TrackingSample, ViewportGeometry,
};
pub use scripted::ScriptedProvider;
pub use simulated::SimulatedProvider;
