//! WS281x strip on a Raspberry Pi GPIO pin
//!
//! Uses the PWM/DMA driver from `rpi_ws281x`. Brightness is left at full
//! scale here; [`DirectBackend`](crate::backend::DirectBackend) scales
//! colors before they reach the driver.

use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType, WS2811Error};
use smart_leds::SmartLedsWrite;

use crate::backend::BackendKind;
use crate::color::Rgb;
use crate::config::StripConfig;
use crate::error::ConfigError;

/// Strip driver for the first PWM channel
pub struct Ws281xStrip {
    controller: Controller,
}

impl Ws281xStrip {
    /// Initialize the PWM/DMA controller for `pixel_count` LEDs
    ///
    /// The LED count is fixed for the lifetime of the controller.
    #[allow(clippy::cast_sign_loss)]
    pub fn new(config: &StripConfig, pixel_count: usize) -> Result<Self, ConfigError> {
        let count = i32::try_from(pixel_count).map_err(|_| ConfigError::TooManyPixels {
            kind: BackendKind::Pi,
            count: pixel_count,
            max: i32::MAX as usize,
        })?;
        let controller = ControllerBuilder::new()
            .freq(config.frequency)
            .dma(config.dma)
            .channel(
                0,
                ChannelBuilder::new()
                    .pin(config.pin)
                    .count(count)
                    .strip_type(StripType::Ws2812)
                    .invert(config.invert)
                    .brightness(255)
                    .build(),
            )
            .build()
            .map_err(|e| ConfigError::DeviceOpen {
                kind: BackendKind::Pi,
                reason: format!("{e:?}"),
            })?;
        Ok(Self { controller })
    }

    /// Number of LEDs the controller drives
    pub fn capacity(&self) -> usize {
        self.controller.leds(0).len()
    }
}

impl SmartLedsWrite for Ws281xStrip {
    type Error = WS2811Error;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut colors = iterator.into_iter().map(Into::<Rgb>::into);
        for led in self.controller.leds_mut(0) {
            // Raw words are 0xWWRRGGBB, little endian; LEDs past the strip go dark
            let color = colors.next().unwrap_or_default();
            *led = [color.b, color.g, color.r, 0];
        }
        self.controller.render()
    }
}
