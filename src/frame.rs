//! Channel-major pixel buffers.
//!
//! Both frames store three parallel channel arrays (`[red, green, blue]`)
//! instead of an array of pixels. The clamp/gamma stage walks one channel at
//! a time, so this keeps each table lookup pass on a contiguous slice.

use crate::color::{BLUE, CHANNELS, GREEN, RED, Rgb};

/// Raw pixel state written by the animation layer
///
/// Channel values are signed and unbounded; they are clamped to 0-255 by the
/// [`FilterProcessor`](crate::FilterProcessor) on the next update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelFrame {
    channels: [Vec<i32>; CHANNELS],
}

impl PixelFrame {
    /// Create a frame of `len` black pixels
    pub fn new(len: usize) -> Self {
        Self {
            channels: [vec![0; len], vec![0; len], vec![0; len]],
        }
    }

    /// Number of pixels in the frame
    pub fn len(&self) -> usize {
        self.channels[RED].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resize the frame, keeping existing pixels
    ///
    /// New pixels are black.
    pub fn resize(&mut self, len: usize) {
        for channel in &mut self.channels {
            channel.resize(len, 0);
        }
    }

    /// Get one channel as a slice
    ///
    /// # Panics
    /// Panics if `channel >= 3`.
    pub fn channel(&self, channel: usize) -> &[i32] {
        &self.channels[channel]
    }

    /// Get one channel as a mutable slice
    ///
    /// # Panics
    /// Panics if `channel >= 3`.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [i32] {
        &mut self.channels[channel]
    }

    /// Get the raw `[r, g, b]` values of a pixel
    pub fn pixel(&self, index: usize) -> Option<[i32; 3]> {
        Some([
            *self.channels[RED].get(index)?,
            *self.channels[GREEN].get(index)?,
            *self.channels[BLUE].get(index)?,
        ])
    }

    /// Set the raw `[r, g, b]` values of a pixel
    ///
    /// Out-of-range indices are ignored.
    pub fn set_pixel(&mut self, index: usize, [r, g, b]: [i32; 3]) {
        if index >= self.len() {
            return;
        }
        self.channels[RED][index] = r;
        self.channels[GREEN][index] = g;
        self.channels[BLUE][index] = b;
    }

    /// Set a pixel from an 8-bit color
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        self.set_pixel(
            index,
            [i32::from(color.r), i32::from(color.g), i32::from(color.b)],
        );
    }

    /// Set every pixel to the same color
    pub fn fill(&mut self, color: Rgb) {
        self.channels[RED].fill(i32::from(color.r));
        self.channels[GREEN].fill(i32::from(color.g));
        self.channels[BLUE].fill(i32::from(color.b));
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0);
        }
    }

    /// Rotate all pixels towards the end of the strip
    ///
    /// Pixels pushed past the end wrap around to the start.
    pub fn roll(&mut self, shift: usize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        for channel in &mut self.channels {
            channel.rotate_right(shift % len);
        }
    }
}

/// Clamped, gamma corrected pixel state ready for a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectedFrame {
    channels: [Vec<u8>; CHANNELS],
}

impl CorrectedFrame {
    /// Create a frame of `len` black pixels
    pub fn new(len: usize) -> Self {
        Self {
            channels: [vec![0; len], vec![0; len], vec![0; len]],
        }
    }

    /// Build a frame from per-pixel colors
    pub fn from_colors(colors: &[Rgb]) -> Self {
        Self {
            channels: [
                colors.iter().map(|c| c.r).collect(),
                colors.iter().map(|c| c.g).collect(),
                colors.iter().map(|c| c.b).collect(),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.channels[RED].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resize the frame, keeping existing pixels
    pub fn resize(&mut self, len: usize) {
        for channel in &mut self.channels {
            channel.resize(len, 0);
        }
    }

    pub fn channel(&self, channel: usize) -> &[u8] {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [u8] {
        &mut self.channels[channel]
    }

    /// Get the color of a pixel
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn pixel(&self, index: usize) -> Rgb {
        Rgb {
            r: self.channels[RED][index],
            g: self.channels[GREEN][index],
            b: self.channels[BLUE][index],
        }
    }

    /// Iterate over all pixel colors
    pub fn colors(&self) -> impl ExactSizeIterator<Item = Rgb> + '_ {
        (0..self.len()).map(|i| self.pixel(i))
    }

    /// Make this frame an exact copy of `other`
    ///
    /// Reuses the existing allocation when it is large enough.
    pub fn copy_from(&mut self, other: &Self) {
        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst.clear();
            dst.extend_from_slice(src);
        }
    }
}
