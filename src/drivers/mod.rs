//! Hardware drivers and backend construction from config
//!
//! Hardware support is opt-in through the `pi` and `blinkstick` features.
//! When a feature is off its driver type is [`Unavailable`] and selecting
//! that device fails with [`ConfigError::Unsupported`].

pub mod blinkstick;
#[cfg(feature = "pi")]
pub mod ws281x;

use smart_leds::SmartLedsWrite;
use tracing::info;

use crate::backend::{
    BackendKind, BackendSlot, DirectBackend, HidBackend, LedDataSink, NetworkBackend,
};
use crate::color::Rgb;
use crate::config::OutputConfig;
use crate::error::ConfigError;

/// Placeholder for a driver that is not compiled in
///
/// Uninhabited, so it can never be constructed.
#[derive(Debug)]
pub enum Unavailable {}

impl SmartLedsWrite for Unavailable {
    type Error = Unavailable;
    type Color = Rgb;

    fn write<T, I>(&mut self, _iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        match *self {}
    }
}

impl LedDataSink for Unavailable {
    type Error = Unavailable;

    fn set_led_data(&mut self, _channel: u8, _data: &[u8]) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// Strip driver used for the `pi` device
#[cfg(feature = "pi")]
pub type StripDriver = ws281x::Ws281xStrip;
/// Strip driver used for the `pi` device
#[cfg(not(feature = "pi"))]
pub type StripDriver = Unavailable;

/// HID driver used for the `blinkstick` device
#[cfg(feature = "blinkstick")]
pub type HidDriver = blinkstick::BlinkStick;
/// HID driver used for the `blinkstick` device
#[cfg(not(feature = "blinkstick"))]
pub type HidDriver = Unavailable;

/// Backend type produced from an [`OutputConfig`]
pub type DefaultBackend = BackendSlot<StripDriver, HidDriver>;

/// Open the backend selected by `config.device`
///
/// For `blinkstick` this also installs the process-wide blackout hook.
pub fn open_backend(config: &OutputConfig) -> Result<DefaultBackend, ConfigError> {
    info!(
        device = %config.device,
        pixels = config.pixel_count,
        "opening output backend"
    );
    match config.device {
        BackendKind::Esp8266 => {
            let network = &config.esp8266;
            NetworkBackend::resolve(&network.host, network.port).map(BackendSlot::Network)
        }
        BackendKind::Pi => open_strip(config).map(BackendSlot::Direct),
        BackendKind::BlinkStick => open_hid(config).map(BackendSlot::Hid),
    }
}

#[cfg(feature = "pi")]
fn open_strip(config: &OutputConfig) -> Result<DirectBackend<StripDriver>, ConfigError> {
    let strip = ws281x::Ws281xStrip::new(&config.pi, config.pixel_count)?;
    let capacity = strip.capacity();
    Ok(DirectBackend::new(strip, config.pixel_count, config.brightness).with_capacity(capacity))
}

#[cfg(not(feature = "pi"))]
fn open_strip(_config: &OutputConfig) -> Result<DirectBackend<StripDriver>, ConfigError> {
    Err(ConfigError::Unsupported(BackendKind::Pi))
}

#[cfg(feature = "blinkstick")]
fn open_hid(config: &OutputConfig) -> Result<HidBackend<HidDriver>, ConfigError> {
    let settings = &config.blinkstick;
    let device = match &settings.serial {
        Some(serial) => blinkstick::BlinkStick::find_by_serial(serial),
        None => blinkstick::BlinkStick::find_first(),
    }
    .map_err(|e| ConfigError::DeviceOpen {
        kind: BackendKind::BlinkStick,
        reason: e.to_string(),
    })?;
    let backend = HidBackend::new(device, settings.channel, config.pixel_count)?;
    backend.install_shutdown_hook()?;
    Ok(backend)
}

#[cfg(not(feature = "blinkstick"))]
fn open_hid(_config: &OutputConfig) -> Result<HidBackend<HidDriver>, ConfigError> {
    Err(ConfigError::Unsupported(BackendKind::BlinkStick))
}
