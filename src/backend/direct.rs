//! Strip attached directly to the host
//!
//! Changed pixels are written into an in-memory copy of the strip, then the
//! whole strip is flushed through the driver. LEDs only change on flush.

use core::fmt::Debug;

use smart_leds::{SmartLedsWrite, brightness};
use tracing::trace;

use super::{BackendKind, check_pixel_count};
use crate::OutputBackend;
use crate::color::Rgb;
use crate::error::{ConfigError, DeviceError};
use crate::frame::CorrectedFrame;

/// Backend for a strip driven by a [`SmartLedsWrite`] driver
pub struct DirectBackend<W> {
    writer: W,
    leds: Vec<Rgb>,
    /// Global brightness scale (0-255 = 0.0-1.0), applied on flush
    brightness: u8,
    /// Most LEDs the driver can address, `None` if unbounded
    capacity: Option<usize>,
}

impl<W> DirectBackend<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    /// Create a new direct backend
    ///
    /// # Arguments
    /// * `writer` - strip driver
    /// * `pixel_count` - number of LEDs on the strip
    /// * `brightness` - global brightness scale
    pub fn new(writer: W, pixel_count: usize, brightness: u8) -> Self {
        Self {
            writer,
            leds: vec![Rgb::default(); pixel_count],
            brightness,
            capacity: None,
        }
    }

    /// Limit the strip to the LEDs the driver was set up for
    ///
    /// Drivers with a fixed LED count silently ignore extra pixels, so
    /// [`resize`](OutputBackend::resize) past `capacity` is rejected.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Current contents of the in-memory strip
    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, value: u8) {
        self.brightness = value;
    }

    /// Push the in-memory strip to the LEDs
    pub fn flush(&mut self) -> Result<(), DeviceError> {
        self.writer
            .write(brightness(self.leds.iter().copied(), self.brightness))
            .map_err(|e| DeviceError::Strip(format!("{e:?}")))
    }
}

impl<W> OutputBackend for DirectBackend<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    fn kind(&self) -> BackendKind {
        BackendKind::Pi
    }

    fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        if let Some(max) = self.capacity {
            check_pixel_count(self.kind(), pixel_count, max)?;
        }
        self.leds.resize(pixel_count, Rgb::default());
        Ok(())
    }

    fn transmit(&mut self, frame: &CorrectedFrame, changed: &[usize]) -> Result<(), DeviceError> {
        for &index in changed {
            if let Some(led) = self.leds.get_mut(index) {
                *led = frame.pixel(index);
            }
        }
        trace!(changed = changed.len(), "flushing strip");
        self.flush()
    }
}
