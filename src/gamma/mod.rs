//! Gamma lookup tables
//!
//! A table maps a clamped channel value to its perceptually corrected value.
//! Tables are loaded once at startup and never change afterwards.

mod npy;

use std::path::Path;

use thiserror::Error;

use crate::color::CHANNELS;

/// Number of entries in one channel table
pub const TABLE_LEN: usize = 256;

/// Exponent of the built-in WS2812 curve
pub const WS2812_GAMMA: f32 = 2.8;

/// Error while loading a gamma table
#[derive(Debug, Error)]
pub enum GammaError {
    #[error("not a .npy file")]
    BadMagic,

    #[error("unsupported .npy format version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("malformed .npy header: {0}")]
    Header(&'static str),

    #[error("unsupported dtype {0:?}")]
    UnsupportedDtype(String),

    #[error("fortran-ordered arrays are not supported")]
    FortranOrder,

    #[error("expected shape (256,) or (3, 256), got {0:?}")]
    Shape(Vec<usize>),

    #[error("table data is truncated")]
    Truncated,

    #[error("table value {value} is outside 0..=255")]
    OutOfRange { value: f64 },

    #[error("raw table must be 256 or 768 bytes, got {0}")]
    RawLength(usize),

    #[error("could not read table: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-channel gamma lookup table
///
/// Shared tables are stored as three identical channel tables.
#[derive(Clone, PartialEq, Eq)]
pub struct GammaTable {
    channels: [[u8; TABLE_LEN]; CHANNELS],
}

impl core::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GammaTable")
            .field("shared", &self.is_shared())
            .finish_non_exhaustive()
    }
}

impl GammaTable {
    /// Table that leaves every value unchanged
    #[allow(clippy::cast_possible_truncation)]
    pub const fn identity() -> Self {
        let mut table = [0u8; TABLE_LEN];
        let mut i = 0;
        while i < TABLE_LEN {
            table[i] = i as u8;
            i += 1;
        }
        Self::shared(table)
    }

    /// Use one table for all three channels
    pub const fn shared(table: [u8; TABLE_LEN]) -> Self {
        Self {
            channels: [table, table, table],
        }
    }

    /// Use separate red, green and blue tables
    pub const fn per_channel(channels: [[u8; TABLE_LEN]; CHANNELS]) -> Self {
        Self { channels }
    }

    /// Power-law curve commonly used for WS2812 strips
    pub fn ws2812() -> Self {
        Self::shared(power_curve(WS2812_GAMMA))
    }

    /// Load a table from a `.npy` file or a raw 256/768 byte dump
    pub fn load(path: &Path) -> Result<Self, GammaError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a table from `.npy` or raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GammaError> {
        if npy::is_npy(bytes) {
            let array = npy::parse(bytes)?;
            return Self::from_values(&array.shape, &array.values);
        }

        match bytes.len() {
            TABLE_LEN => {
                let mut table = [0u8; TABLE_LEN];
                table.copy_from_slice(bytes);
                Ok(Self::shared(table))
            }
            len if len == TABLE_LEN * CHANNELS => {
                let mut channels = [[0u8; TABLE_LEN]; CHANNELS];
                for (table, chunk) in channels.iter_mut().zip(bytes.chunks_exact(TABLE_LEN)) {
                    table.copy_from_slice(chunk);
                }
                Ok(Self::per_channel(channels))
            }
            len => Err(GammaError::RawLength(len)),
        }
    }

    /// Build a table from a decoded numeric array
    fn from_values(shape: &[usize], values: &[f64]) -> Result<Self, GammaError> {
        let per_channel = match shape {
            [TABLE_LEN] => false,
            [CHANNELS, TABLE_LEN] => true,
            _ => return Err(GammaError::Shape(shape.to_vec())),
        };

        let mut channels = [[0u8; TABLE_LEN]; CHANNELS];
        for (i, &value) in values.iter().enumerate() {
            let corrected = to_u8(value)?;
            if per_channel {
                channels[i / TABLE_LEN][i % TABLE_LEN] = corrected;
            } else {
                for table in &mut channels {
                    table[i] = corrected;
                }
            }
        }

        Ok(Self::per_channel(channels))
    }

    /// Look up the corrected value for a channel
    ///
    /// # Panics
    /// Panics if `channel >= 3`.
    #[inline]
    pub fn correct(&self, channel: usize, value: u8) -> u8 {
        self.channels[channel][value as usize]
    }

    /// Get the full table of a channel
    pub fn channel(&self, channel: usize) -> &[u8; TABLE_LEN] {
        &self.channels[channel]
    }

    /// Check if all channels use the same table
    pub fn is_shared(&self) -> bool {
        self.channels[0] == self.channels[1] && self.channels[1] == self.channels[2]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::ws2812()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f64) -> Result<u8, GammaError> {
    let rounded = libm::round(value);
    if !(0.0..=255.0).contains(&rounded) {
        return Err(GammaError::OutOfRange { value });
    }
    Ok(rounded as u8)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn power_curve(gamma: f32) -> [u8; TABLE_LEN] {
    let mut table = [0u8; TABLE_LEN];
    for (i, entry) in table.iter_mut().enumerate() {
        let x = i as f32 / 255.0;
        *entry = libm::roundf(libm::powf(x, gamma) * 255.0) as u8;
    }
    table
}
