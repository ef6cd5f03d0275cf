use tracing::{debug, warn};

use crate::OutputBackend;
use crate::config::OutputConfig;
use crate::diff::{ChangedPixels, diff_into};
use crate::drivers::{DefaultBackend, open_backend};
use crate::error::{ConfigError, DeviceError, Error};
use crate::filter::FilterProcessor;
use crate::frame::{CorrectedFrame, PixelFrame};

/// Strip - the main orchestrator
///
/// Owns the frame the animation layer draws into and the last frame that
/// reached the device. Each [`update`](Self::update) runs
/// clamp/gamma → diff → transmit → commit.
///
/// The strip is single-producer: draw through [`frame_mut`](Self::frame_mut)
/// between updates, never during one.
pub struct Strip<B> {
    // External dependencies and configuration
    backend: B,
    filters: FilterProcessor,
    pixel_count: usize,

    // Internal state
    frame: PixelFrame,
    corrected: CorrectedFrame,
    previous: CorrectedFrame,
    changed: ChangedPixels,
}

impl<B: OutputBackend> Strip<B> {
    /// Create a new strip of `pixel_count` black pixels
    ///
    /// Fails if the backend cannot address `pixel_count` pixels.
    pub fn new(
        mut backend: B,
        filters: FilterProcessor,
        pixel_count: usize,
    ) -> Result<Self, ConfigError> {
        backend.resize(pixel_count)?;
        Ok(Self {
            backend,
            filters,
            pixel_count,
            frame: PixelFrame::new(pixel_count),
            corrected: CorrectedFrame::new(pixel_count),
            previous: CorrectedFrame::new(pixel_count),
            changed: ChangedPixels::new(),
        })
    }

    /// Push the current frame to the device
    ///
    /// Only pixels that changed since the last successful update are sent
    /// when the backend supports partial updates. On error the previous
    /// frame is kept, so the next update resends the same pixels.
    pub fn update(&mut self) -> Result<(), DeviceError> {
        if self.frame.len() != self.pixel_count {
            debug!(
                from = self.frame.len(),
                to = self.pixel_count,
                "frame length mismatch, resizing"
            );
            self.frame.resize(self.pixel_count);
        }

        self.filters.process(&self.frame, &mut self.corrected);

        if self.backend.partial_updates() {
            diff_into(&self.corrected, &self.previous, &mut self.changed);
        } else {
            self.changed.clear();
        }

        if let Err(error) = self.backend.transmit(&self.corrected, &self.changed) {
            warn!(%error, backend = %self.backend.kind(), "transmit failed");
            return Err(error);
        }

        self.previous.copy_from(&self.corrected);
        Ok(())
    }

    /// Change the number of pixels on the strip
    ///
    /// Existing pixels keep their values and new pixels start black. A new
    /// count invalidates the last transmitted frame, so the next update
    /// resends every pixel.
    pub fn set_pixel_count(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        self.backend.resize(pixel_count)?;
        if pixel_count != self.pixel_count {
            debug!(from = self.pixel_count, to = pixel_count, "pixel count changed");
            self.previous.resize(0);
        }
        self.pixel_count = pixel_count;
        self.frame.resize(pixel_count);
        Ok(())
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Frame drawn by the animation layer
    pub const fn frame(&self) -> &PixelFrame {
        &self.frame
    }

    pub const fn frame_mut(&mut self) -> &mut PixelFrame {
        &mut self.frame
    }

    /// Pixels that changed in the last update
    ///
    /// Always empty for backends that rewrite the full strip.
    pub fn changed(&self) -> &[usize] {
        &self.changed
    }

    /// Corrected frame produced by the last update
    pub const fn corrected(&self) -> &CorrectedFrame {
        &self.corrected
    }

    pub const fn filters(&self) -> &FilterProcessor {
        &self.filters
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl Strip<DefaultBackend> {
    /// Build the strip described by `config`
    pub fn open(config: &OutputConfig) -> Result<Self, Error> {
        let filters = FilterProcessor::from_config(&config.gamma)?;
        let backend = open_backend(config)?;
        Ok(Self::new(backend, filters, config.pixel_count)?)
    }
}
