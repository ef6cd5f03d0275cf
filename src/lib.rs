pub mod backend;
pub mod color;
pub mod config;
pub mod diff;
pub mod drivers;
pub mod error;
pub mod filter;
pub mod frame;
pub mod frame_scheduler;
pub mod gamma;
pub mod shutdown;
pub mod strip;

pub use backend::{
    BackendKind, BackendSlot, DirectBackend, HidBackend, LedDataSink, NetworkBackend,
};
pub use config::OutputConfig;
pub use diff::ChangedPixels;
pub use error::{ConfigError, DeviceError, Error};
pub use filter::FilterProcessor;
pub use frame::{CorrectedFrame, PixelFrame};
pub use frame_scheduler::FrameScheduler;
pub use gamma::GammaTable;
pub use strip::Strip;

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract output backend trait
///
/// Implement this trait to support different transports.
/// The strip is generic over this trait.
pub trait OutputBackend {
    /// Device kind this backend drives
    fn kind(&self) -> BackendKind;

    /// Whether the backend can realize a frame from changed pixels alone
    ///
    /// When `false` the strip skips diffing and passes no changed indices.
    fn partial_updates(&self) -> bool {
        true
    }

    /// Adapt to a new pixel count
    ///
    /// Fails if the backend cannot address that many pixels.
    fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError>;

    /// Realize `frame` on the device
    ///
    /// `changed` lists, in ascending order, the pixels that differ from the
    /// last successfully transmitted frame.
    fn transmit(&mut self, frame: &CorrectedFrame, changed: &[usize]) -> Result<(), DeviceError>;
}
