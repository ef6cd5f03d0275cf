//! BlinkStick USB HID controller
//!
//! LED data is sent as a HID feature report. The report id selects the
//! payload size, so short strips do not pay for a full 64 LED transfer:
//!
//! | report id | LEDs |
//! |-----------|------|
//! | 6         | 8    |
//! | 7         | 16   |
//! | 8         | 32   |
//! | 9         | 64   |
//!
//! Layout: `[report_id, channel, data..., zero padding]`.

use heapless::Vec as FixedVec;

use crate::backend::hid::MAX_HID_PIXELS;
use crate::color::CHANNELS;

pub const VENDOR_ID: u16 = 0x20A0;
pub const PRODUCT_ID: u16 = 0x41E5;

/// Size of the largest report: id, channel, 64 LEDs of data
pub const MAX_REPORT_LEN: usize = 2 + MAX_HID_PIXELS * CHANNELS;

/// One encoded feature report
pub type Report = FixedVec<u8, MAX_REPORT_LEN>;

const _: () = assert!(MAX_REPORT_LEN >= 2 + report_layout(usize::MAX).1 * CHANNELS);

/// Pick the report id and LED capacity for `data_len` bytes of LED data
pub const fn report_layout(data_len: usize) -> (u8, usize) {
    if data_len <= 8 * CHANNELS {
        (6, 8)
    } else if data_len <= 16 * CHANNELS {
        (7, 16)
    } else if data_len <= 32 * CHANNELS {
        (8, 32)
    } else {
        (9, 64)
    }
}

/// Frame LED data into a feature report
///
/// Data beyond 64 LEDs is dropped.
pub fn led_data_report(channel: u8, data: &[u8]) -> Report {
    let (report_id, max_leds) = report_layout(data.len());
    let payload_len = max_leds * CHANNELS;

    let data = &data[..data.len().min(payload_len)];

    let mut report = Report::new();
    let sized = report.resize(2 + payload_len, 0);
    debug_assert!(sized.is_ok(), "report buffer smaller than largest layout");
    report[0] = report_id;
    report[1] = channel;
    report[2..2 + data.len()].copy_from_slice(data);
    report
}

#[cfg(feature = "blinkstick")]
pub use device::BlinkStick;

#[cfg(feature = "blinkstick")]
mod device {
    use hidapi::{HidApi, HidDevice, HidError};

    use super::{PRODUCT_ID, VENDOR_ID, led_data_report};
    use crate::backend::hid::LedDataSink;

    /// A BlinkStick opened through hidapi
    pub struct BlinkStick {
        device: HidDevice,
    }

    impl BlinkStick {
        /// Open the first BlinkStick found on the bus
        pub fn find_first() -> Result<Self, HidError> {
            let api = HidApi::new()?;
            let device = api.open(VENDOR_ID, PRODUCT_ID)?;
            Ok(Self { device })
        }

        /// Open a BlinkStick by serial number
        pub fn find_by_serial(serial: &str) -> Result<Self, HidError> {
            let api = HidApi::new()?;
            let device = api.open_serial(VENDOR_ID, PRODUCT_ID, serial)?;
            Ok(Self { device })
        }
    }

    impl LedDataSink for BlinkStick {
        type Error = HidError;

        fn set_led_data(&mut self, channel: u8, data: &[u8]) -> Result<(), HidError> {
            let report = led_data_report(channel, data);
            self.device.send_feature_report(&report)
        }
    }
}
