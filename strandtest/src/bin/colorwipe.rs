//! One-shot color wipe.
//!
//! Lights the strip one pixel at a time. With `--clear` the strip is wiped
//! back to black afterwards, even if the first wipe failed.

use std::thread;
use std::time::Duration;

use clap::Parser;
use myrtio_strip_output::color::parse_hex_color;
use myrtio_strip_output::{DeviceError, OutputBackend, Rgb, Strip};
use strandtest::{CommonArgs, init_tracing};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "colorwipe", about = "Wipe a color across the strip")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Color to wipe, as RRGGBB hex.
    #[arg(long, default_value = "ff0000", value_parser = parse_color)]
    color: Rgb,

    /// Delay between pixels in milliseconds.
    #[arg(long, default_value_t = 10)]
    wait_ms: u64,

    /// Clear the strip on exit.
    #[arg(short = 'x', long)]
    clear: bool,
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    parse_hex_color(s).ok_or_else(|| format!("{s:?} is not an RRGGBB color"))
}

/// Light pixels one at a time, pushing each step to the device
fn color_wipe<B: OutputBackend>(
    strip: &mut Strip<B>,
    color: Rgb,
    wait: Duration,
) -> Result<(), DeviceError> {
    for index in 0..strip.pixel_count() {
        strip.frame_mut().set_color(index, color);
        strip.update()?;
        thread::sleep(wait);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.common.gen_config {
        println!("{}", myrtio_strip_output::OutputConfig::default_toml());
        return Ok(());
    }

    let config = cli.common.load_config()?;
    init_tracing(&config);

    let mut strip = Strip::open(&config)?;
    let wait = Duration::from_millis(cli.wait_ms);

    info!(color = ?cli.color, pixels = strip.pixel_count(), "wiping");
    let result = color_wipe(&mut strip, cli.color, wait);
    if let Err(error) = &result {
        warn!(%error, "wipe interrupted");
    }

    if cli.clear {
        info!("clearing strip");
        color_wipe(&mut strip, Rgb::default(), wait)?;
    }

    Ok(result?)
}
