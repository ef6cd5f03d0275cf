//! Output configuration loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output device: "esp8266", "pi" or "blinkstick".
    pub device: BackendKind,
    /// Number of pixels on the strip.
    pub pixel_count: usize,
    /// Global brightness scale (0-255) for directly attached strips.
    pub brightness: u8,
    /// Gamma correction settings.
    pub gamma: GammaConfig,
    /// UDP target for the `esp8266` device.
    pub esp8266: NetworkConfig,
    /// GPIO strip settings for the `pi` device.
    pub pi: StripConfig,
    /// USB HID settings for the `blinkstick` device.
    pub blinkstick: HidConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Gamma correction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GammaConfig {
    /// Apply gamma correction in software.
    pub enabled: bool,
    /// `.npy` or raw table file. The built-in WS2812 curve is used when unset.
    pub table: Option<PathBuf>,
}

/// UDP target of a network-attached controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host name or IP address.
    pub host: String,
    /// UDP port.
    pub port: u16,
}

/// GPIO strip settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// GPIO pin connected to the data line.
    pub pin: i32,
    /// Signal frequency in hertz.
    pub frequency: u32,
    /// DMA channel used to generate the signal.
    pub dma: i32,
    /// Invert the signal (for inverting level shifters).
    pub invert: bool,
}

/// USB HID controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HidConfig {
    /// Controller output channel.
    pub channel: u8,
    /// Serial number of the device to open. The first device found is used when unset.
    pub serial: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            device: BackendKind::Esp8266,
            pixel_count: 60,
            brightness: 255,
            gamma: GammaConfig::default(),
            esp8266: NetworkConfig::default(),
            pi: StripConfig::default(),
            blinkstick: HidConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            table: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.150".into(),
            port: 7777,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            pin: 18,
            frequency: 800_000,
            dma: 10,
            invert: false,
        }
    }
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            serial: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl OutputConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error, so a typo in `device` never silently
    /// drives the wrong hardware.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Write the default configuration to a file (for bootstrapping).
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        std::fs::write(path, Self::default_toml())
    }

    /// The default configuration as pretty TOML.
    pub fn default_toml() -> String {
        // Plain structs of strings and numbers always serialize.
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
