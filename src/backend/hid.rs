//! USB HID backend
//!
//! The controller API has no partial update: every update rewrites the whole
//! strip as one flat buffer with green, red, blue bytes per pixel.

use core::fmt::Debug;
use std::sync::Arc;

use tracing::{info, trace};

use super::{BackendKind, check_pixel_count};
use crate::OutputBackend;
use crate::color::{CHANNELS, to_grb};
use crate::error::{ConfigError, DeviceError};
use crate::frame::CorrectedFrame;
use crate::shutdown::{SharedDevice, ShutdownHook};

/// Highest pixel count one controller channel accepts
pub const MAX_HID_PIXELS: usize = 64;

/// Device that accepts a full strip of GRB bytes in one call
///
/// Implement this trait to support different HID controllers.
pub trait LedDataSink {
    type Error: Debug;

    /// Write `data` (3 bytes per pixel, GRB order) to a controller channel
    fn set_led_data(&mut self, channel: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Backend writing full frames to a [`LedDataSink`]
pub struct HidBackend<D> {
    device: Arc<SharedDevice<D>>,
    channel: u8,
    buffer: Vec<u8>,
}

impl<D: LedDataSink> HidBackend<D> {
    /// Create a new HID backend
    ///
    /// Fails if `pixel_count` exceeds [`MAX_HID_PIXELS`].
    pub fn new(device: D, channel: u8, pixel_count: usize) -> Result<Self, ConfigError> {
        check_pixel_count(BackendKind::BlinkStick, pixel_count, MAX_HID_PIXELS)?;
        Ok(Self {
            device: Arc::new(SharedDevice::new(device, pixel_count)),
            channel,
            buffer: vec![0; pixel_count * CHANNELS],
        })
    }

    /// The device handle shared with the shutdown hook
    pub fn device(&self) -> &Arc<SharedDevice<D>> {
        &self.device
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The buffer written by the last transmit
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Create a hook that blanks this backend's strip
    pub fn shutdown_hook(&self) -> ShutdownHook<D> {
        ShutdownHook::new(Arc::clone(&self.device), self.channel)
    }

    /// Blank the strip on SIGINT/SIGTERM, then exit
    ///
    /// The hook is process-wide and can only be installed once.
    pub fn install_shutdown_hook(&self) -> Result<(), ConfigError>
    where
        D: Send + 'static,
    {
        self.shutdown_hook().install()?;
        info!("installed blackout hook for SIGINT/SIGTERM");
        Ok(())
    }
}

impl<D: LedDataSink> OutputBackend for HidBackend<D> {
    fn kind(&self) -> BackendKind {
        BackendKind::BlinkStick
    }

    fn partial_updates(&self) -> bool {
        false
    }

    fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        check_pixel_count(self.kind(), pixel_count, MAX_HID_PIXELS)?;
        self.buffer.resize(pixel_count * CHANNELS, 0);
        self.device.set_pixel_count(pixel_count);
        Ok(())
    }

    fn transmit(&mut self, frame: &CorrectedFrame, _changed: &[usize]) -> Result<(), DeviceError> {
        for (bytes, color) in self.buffer.chunks_exact_mut(CHANNELS).zip(frame.colors()) {
            bytes.copy_from_slice(&to_grb(color));
        }
        trace!(len = self.buffer.len(), "writing hid frame");
        let (channel, buffer) = (self.channel, &self.buffer);
        self.device
            .with(|device| device.set_led_data(channel, buffer))
            .map_err(|e| DeviceError::Hid(format!("{e:?}")))
    }
}
