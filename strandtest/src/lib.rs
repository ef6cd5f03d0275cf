//! Shared command line handling for the demo binaries.

use std::path::PathBuf;

use clap::Args;
use myrtio_strip_output::{BackendKind, OutputConfig};
use tracing_subscriber::EnvFilter;

/// Options accepted by every demo.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "strip.toml")]
    pub config: PathBuf,

    /// Override the configured device (esp8266, pi, blinkstick).
    #[arg(short, long)]
    pub device: Option<BackendKind>,

    /// Override the configured pixel count.
    #[arg(short = 'n', long)]
    pub pixels: Option<usize>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    pub gen_config: bool,
}

impl CommonArgs {
    /// Load the config file and apply command line overrides.
    pub fn load_config(&self) -> Result<OutputConfig, myrtio_strip_output::ConfigError> {
        let mut config = OutputConfig::load(&self.config)?;
        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(pixels) = self.pixels {
            config.pixel_count = pixels;
        }
        Ok(config)
    }
}

/// Init tracing from `RUST_LOG`, falling back to the configured level.
pub fn init_tracing(config: &OutputConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Convert a pacing duration into a std sleep duration.
pub fn to_std(duration: myrtio_strip_output::Duration) -> std::time::Duration {
    std::time::Duration::from_micros(duration.as_micros())
}
