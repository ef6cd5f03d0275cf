use tracing::debug;

use crate::color::{CHANNELS, clamp8};
use crate::config::GammaConfig;
use crate::frame::{CorrectedFrame, PixelFrame};
use crate::gamma::{GammaError, GammaTable};

/// Filter processor - turns raw animation output into device values
///
/// Every channel value is clamped to 0-255 first, then passed through the
/// gamma table when correction is enabled.
#[derive(Debug, Clone)]
pub struct FilterProcessor {
    /// Gamma table, `None` when correction is disabled
    gamma: Option<GammaTable>,
}

impl FilterProcessor {
    /// Create a processor that only clamps
    pub const fn clamp_only() -> Self {
        Self { gamma: None }
    }

    /// Create a processor that clamps and applies `gamma`
    pub const fn with_gamma(gamma: GammaTable) -> Self {
        Self { gamma: Some(gamma) }
    }

    /// Build the processor described by the gamma config section
    ///
    /// Without a table path the built-in WS2812 curve is used.
    pub fn from_config(config: &GammaConfig) -> Result<Self, GammaError> {
        if !config.enabled {
            return Ok(Self::clamp_only());
        }
        let table = match &config.table {
            Some(path) => {
                debug!(path = %path.display(), "loading gamma table");
                GammaTable::load(path)?
            }
            None => GammaTable::ws2812(),
        };
        Ok(Self::with_gamma(table))
    }

    /// Check if gamma correction is applied
    pub const fn gamma_enabled(&self) -> bool {
        self.gamma.is_some()
    }

    /// Clamp and correct `raw` into `out`
    ///
    /// `out` is resized to the length of `raw`.
    pub fn process(&self, raw: &PixelFrame, out: &mut CorrectedFrame) {
        out.resize(raw.len());
        for channel in 0..CHANNELS {
            let src = raw.channel(channel);
            let dst = out.channel_mut(channel);
            match &self.gamma {
                Some(table) => {
                    for (d, &s) in dst.iter_mut().zip(src) {
                        *d = table.correct(channel, clamp8(s));
                    }
                }
                None => {
                    for (d, &s) in dst.iter_mut().zip(src) {
                        *d = clamp8(s);
                    }
                }
            }
        }
    }
}

impl Default for FilterProcessor {
    fn default() -> Self {
        Self::with_gamma(GammaTable::default())
    }
}
