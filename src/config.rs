use anyhow::{bail, Result};
use serde::Deserialize;

use crate::recording::RecorderConfig;
use crate::sampler::SamplerConfig;
use crate::tracker::{ProviderKind, ViewportGeometry};

/// Default config file (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config/gaze-attention";

/// Environment variable prefix, e.g. `GAZE_SAMPLER__SAMPLE_RATE_HZ=30`
const ENV_PREFIX: &str = "GAZE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Name the tracker shows for this client
    pub app_name: String,
    pub provider: ProviderKind,
    /// Seed for the simulated tracker; random when unset
    pub seed: Option<u64>,
    pub viewport: ViewportConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            app_name: "GazeAttention".to_string(),
            provider: ProviderKind::Simulated,
            seed: None,
            viewport: ViewportConfig::default(),
        }
    }
}

/// Screen resolution in pixels
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
        }
    }
}

impl ViewportConfig {
    pub fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry::from_size(self.width, self.height)
    }
}

impl Config {
    /// Load config from an optional file at `path`, then `GAZE_*` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let viewport = self.tracker.viewport;
        if viewport.geometry().is_empty() {
            bail!(
                "Viewport must have a positive size, got {}x{}",
                viewport.width,
                viewport.height
            );
        }

        self.sampler.period()?;

        Ok(())
    }
}
