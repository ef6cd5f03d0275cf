mod utils;

use smart_leds::RGB8;

pub use utils::{clamp8, parse_hex_color, rgb_from_u32, to_grb};

pub type Rgb = RGB8;

/// Number of color channels per pixel
pub const CHANNELS: usize = 3;

/// Channel index of red in channel-major frames
pub const RED: usize = 0;
/// Channel index of green in channel-major frames
pub const GREEN: usize = 1;
/// Channel index of blue in channel-major frames
pub const BLUE: usize = 2;
