use anyhow::Result;
use clap::{Parser, ValueEnum};
use gaze_attention::config::DEFAULT_CONFIG_PATH;
use gaze_attention::{
    Config, ProviderKind, RecordingMode, Sampler, SessionRecorder, ShutdownSignal,
    SimulatedProvider, TrackingProvider,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log whether the user is looking at the screen, from an eye tracker
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Config file (TOML); built-in defaults apply when it does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Override the recording mode from the config file
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// Write the session table to CSV after every sample
    Streaming,
    /// Render a chart when the session ends
    Render,
}

impl From<ModeArg> for RecordingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Streaming => RecordingMode::Streaming,
            ModeArg::Render => RecordingMode::Render,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(mode) = args.mode {
        cfg.recorder.mode = mode.into();
    }

    info!("Gaze Attention v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Viewport {}x{}, {} Hz, {:?} mode",
        cfg.tracker.viewport.width,
        cfg.tracker.viewport.height,
        cfg.sampler.sample_rate_hz,
        cfg.recorder.mode
    );

    let viewport = cfg.tracker.viewport.geometry();
    let provider: Box<dyn TrackingProvider> = match cfg.tracker.provider {
        ProviderKind::Simulated => Box::new(SimulatedProvider::new(
            cfg.tracker.app_name.clone(),
            viewport,
            cfg.tracker.seed,
        )),
    };

    let mut sampler = Sampler::new(provider, cfg.sampler.clone())?;
    sampler.start().await?;

    let mut recorder = SessionRecorder::new(&cfg.recorder, cfg.sampler.period()?)?;

    let shutdown = ShutdownSignal::new();
    shutdown.listen_for_ctrl_c();

    let stats = sampler.run(&mut recorder, &shutdown).await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
