//! LED strand test.
//!
//! Seeds a red, a green and a blue pixel and scrolls them along the strip.
//! If everything is wired correctly the three colors chase each other
//! continuously.
//!
//! ```text
//! strandtest                      Use strip.toml (or defaults)
//! strandtest --device pi -n 144   Override device and pixel count
//! strandtest --gen-config         Write default config to stdout
//! ```

use std::thread;

use clap::Parser;
use myrtio_strip_output::{FrameScheduler, Instant, Strip};
use strandtest::{CommonArgs, init_tracing, to_std};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "strandtest", about = "Scroll a red, green and blue pixel along the strip")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Frames per second.
    #[arg(long, default_value_t = 10)]
    fps: u32,
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
    let frame = strip.frame_mut();
    frame.clear();
    frame.set_pixel(0, [255, 0, 0]);
    frame.set_pixel(1, [0, 255, 0]);
    frame.set_pixel(2, [0, 0, 255]);

    info!(device = %config.device, pixels = config.pixel_count, "starting LED strand test");
    let mut scheduler = FrameScheduler::with_fps(strip, cli.fps);
    loop {
        let now = Instant::now();
        let sleep = match scheduler.tick(now, |frame| frame.roll(1)) {
            Ok(result) => result.sleep_duration,
            Err(error) => {
                warn!(%error, "frame dropped");
                scheduler.sleep_duration(now)
            }
        };
        thread::sleep(to_std(sleep));
    }
}
