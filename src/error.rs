//! Error types for the output pipeline.
//!
//! Configuration problems are fatal and surface before the first frame.
//! Device problems surface from [`Strip::update`](crate::Strip::update) and
//! leave the previous frame untouched, so the next update resends.

use thiserror::Error;

use crate::backend::BackendKind;
use crate::gamma::GammaError;

/// Invalid startup or reconfiguration parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Device kind is not one of `esp8266`, `pi` or `blinkstick`.
    #[error("unknown device kind {0:?}: expected esp8266, pi or blinkstick")]
    UnknownDevice(String),

    /// The backend cannot address this many pixels.
    #[error("{kind} backend addresses at most {max} pixels, got {count}")]
    TooManyPixels {
        kind: BackendKind,
        count: usize,
        max: usize,
    },

    /// The backend was not compiled into this build.
    #[error("{0} support is not enabled in this build")]
    Unsupported(BackendKind),

    /// The UDP target did not resolve to any address.
    #[error("could not resolve {target}: {source}")]
    Address {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// The device could not be opened.
    #[error("could not open {kind} device: {reason}")]
    DeviceOpen { kind: BackendKind, reason: String },

    /// Gamma table could not be loaded.
    #[error("gamma table: {0}")]
    Gamma(#[from] GammaError),

    /// The configuration file is not valid TOML for [`OutputConfig`](crate::OutputConfig).
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file exists but could not be read.
    #[error("config I/O: {0}")]
    Io(#[from] std::io::Error),

    /// The process-wide shutdown hook is already taken.
    #[error("could not install shutdown hook: {0}")]
    ShutdownHook(#[from] ctrlc::Error),
}

/// Failure while realizing a frame on the device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Socket send failed.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The strip driver reported a fault.
    #[error("strip driver fault: {0}")]
    Strip(String),

    /// The USB HID write failed.
    #[error("usb hid write failed: {0}")]
    Hid(String),

    /// A pixel index does not fit the 1-byte wire field.
    #[error("pixel index {index} does not fit the 1-byte wire field")]
    IndexOverflow { index: usize },
}

/// Either kind of pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl From<GammaError> for Error {
    fn from(e: GammaError) -> Self {
        Error::Config(ConfigError::Gamma(e))
    }
}
