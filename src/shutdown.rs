//! Blackout on process termination
//!
//! The HID backend and its shutdown hook share the device through a
//! critical section, so the hook never writes in the middle of a frame.

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use critical_section::Mutex;

use crate::backend::hid::{LedDataSink, MAX_HID_PIXELS};
use crate::color::CHANNELS;
use crate::error::ConfigError;

/// Zero bytes for the largest strip the hook can blank
static BLACKOUT: [u8; MAX_HID_PIXELS * CHANNELS] = [0; MAX_HID_PIXELS * CHANNELS];

/// How long the signal handler waits for the blackout before exiting anyway
pub const BLACKOUT_TIMEOUT: Duration = Duration::from_millis(500);

/// Device handle shared between a backend and its shutdown hook
pub struct SharedDevice<D> {
    device: Mutex<RefCell<D>>,
    pixel_count: AtomicUsize,
}

impl<D> SharedDevice<D> {
    pub const fn new(device: D, pixel_count: usize) -> Self {
        Self {
            device: Mutex::new(RefCell::new(device)),
            pixel_count: AtomicUsize::new(pixel_count),
        }
    }

    /// Run `f` with exclusive access to the device
    pub fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        critical_section::with(|cs| f(&mut self.device.borrow_ref_mut(cs)))
    }

    /// Pixel count the hook blanks
    pub fn pixel_count(&self) -> usize {
        self.pixel_count.load(Ordering::Acquire)
    }

    pub(crate) fn set_pixel_count(&self, count: usize) {
        self.pixel_count.store(count, Ordering::Release);
    }
}

/// Writes an all-off frame to a HID device
///
/// [`blackout`](Self::blackout) performs one bounded write from a static
/// buffer and allocates nothing.
pub struct ShutdownHook<D> {
    device: Arc<SharedDevice<D>>,
    channel: u8,
}

impl<D> Clone for ShutdownHook<D> {
    fn clone(&self) -> Self {
        Self {
            device: Arc::clone(&self.device),
            channel: self.channel,
        }
    }
}

impl<D: LedDataSink> ShutdownHook<D> {
    pub const fn new(device: Arc<SharedDevice<D>>, channel: u8) -> Self {
        Self { device, channel }
    }

    /// Turn every pixel of the strip off
    pub fn blackout(&self) -> Result<(), D::Error> {
        let len = (self.device.pixel_count() * CHANNELS).min(BLACKOUT.len());
        let channel = self.channel;
        self.device
            .with(|device| device.set_led_data(channel, &BLACKOUT[..len]))
    }

    /// Blank the strip, giving up after `timeout`
    ///
    /// The write runs on a helper thread, so a device stuck in the middle of
    /// a frame cannot block the caller. Returns `true` if the blackout was
    /// written in time.
    pub fn try_blackout(&self, timeout: Duration) -> bool
    where
        D: Send + 'static,
    {
        let hook = self.clone();
        let (done, wait) = mpsc::channel();
        thread::spawn(move || {
            let _ = done.send(hook.blackout().is_ok());
        });
        wait.recv_timeout(timeout).unwrap_or(false)
    }

    /// Register the hook for SIGINT and SIGTERM
    ///
    /// On either signal the strip is blanked and the process exits with
    /// status 0, within [`BLACKOUT_TIMEOUT`] even if the device hangs. Only
    /// one hook can be registered per process.
    pub fn install(self) -> Result<(), ConfigError>
    where
        D: Send + 'static,
    {
        ctrlc::set_handler(move || {
            if !self.try_blackout(BLACKOUT_TIMEOUT) {
                tracing::warn!("blackout did not complete, exiting anyway");
            }
            std::process::exit(0);
        })?;
        Ok(())
    }
}
