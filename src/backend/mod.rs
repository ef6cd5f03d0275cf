//! Output backends with compile-time known variants
//!
//! The configured backend is stored in [`BackendSlot`] so the device kind is
//! resolved once at startup and every update dispatches through a `match`.

pub mod direct;
pub mod hid;
pub mod network;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use smart_leds::SmartLedsWrite;

pub use direct::DirectBackend;
pub use hid::{HidBackend, LedDataSink};
pub use network::NetworkBackend;

use crate::OutputBackend;
use crate::color::Rgb;
use crate::error::{ConfigError, DeviceError};
use crate::frame::CorrectedFrame;

const BACKEND_NAME_ESP8266: &str = "esp8266";
const BACKEND_NAME_PI: &str = "pi";
const BACKEND_NAME_BLINKSTICK: &str = "blinkstick";

/// Known device kinds that can be configured
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Network-attached microcontroller driven over UDP
    Esp8266,
    /// Strip wired to a GPIO pin of the host
    Pi,
    /// USB HID LED controller
    BlinkStick,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Esp8266 => BACKEND_NAME_ESP8266,
            Self::Pi => BACKEND_NAME_PI,
            Self::BlinkStick => BACKEND_NAME_BLINKSTICK,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            BACKEND_NAME_ESP8266 => Some(Self::Esp8266),
            BACKEND_NAME_PI => Some(Self::Pi),
            BACKEND_NAME_BLINKSTICK => Some(Self::BlinkStick),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_from_str(s).ok_or_else(|| ConfigError::UnknownDevice(s.to_owned()))
    }
}

/// Reject pixel counts above a backend's addressable limit
pub(crate) fn check_pixel_count(
    kind: BackendKind,
    count: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if count > max {
        return Err(ConfigError::TooManyPixels { kind, count, max });
    }
    Ok(())
}

/// Backend slot - enum containing all possible backends
pub enum BackendSlot<W, D> {
    /// Changed pixels sent as UDP datagrams
    Network(NetworkBackend),
    /// Changed pixels written to a strip driver, then flushed
    Direct(DirectBackend<W>),
    /// Whole frame written to a USB HID controller
    Hid(HidBackend<D>),
}

impl<W, D> OutputBackend for BackendSlot<W, D>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: fmt::Debug,
    D: LedDataSink,
{
    fn kind(&self) -> BackendKind {
        match self {
            Self::Network(backend) => backend.kind(),
            Self::Direct(backend) => backend.kind(),
            Self::Hid(backend) => backend.kind(),
        }
    }

    fn partial_updates(&self) -> bool {
        match self {
            Self::Network(backend) => backend.partial_updates(),
            Self::Direct(backend) => backend.partial_updates(),
            Self::Hid(backend) => backend.partial_updates(),
        }
    }

    fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        match self {
            Self::Network(backend) => backend.resize(pixel_count),
            Self::Direct(backend) => backend.resize(pixel_count),
            Self::Hid(backend) => backend.resize(pixel_count),
        }
    }

    fn transmit(&mut self, frame: &CorrectedFrame, changed: &[usize]) -> Result<(), DeviceError> {
        match self {
            Self::Network(backend) => backend.transmit(frame, changed),
            Self::Direct(backend) => backend.transmit(frame, changed),
            Self::Hid(backend) => backend.transmit(frame, changed),
        }
    }
}
