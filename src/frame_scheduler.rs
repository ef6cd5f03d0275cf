//! Fixed-rate pacing for strip driver loops.
//!
//! The scheduler never sleeps itself: every tick reports how long the caller
//! should wait, so the same loop works with `std::thread::sleep` or an async
//! timer.

use embassy_time::{Duration, Instant};

use crate::error::DeviceError;
use crate::frame::PixelFrame;
use crate::{OutputBackend, Strip};

/// Frame rate used by [`FrameScheduler::new`].
pub const DEFAULT_FPS: u32 = 60;

/// Interval between frames at [`DEFAULT_FPS`].
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Timing after a successful tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// When the following frame is due.
    pub next_deadline: Instant,
    /// Time left until `next_deadline`, zero when running late.
    pub sleep_duration: Duration,
}

/// Drives a [`Strip`] at a steady frame rate
///
/// Deadlines advance by one frame per tick. After a stall of more than two
/// frames the schedule restarts from the current time instead of bursting
/// to catch up.
///
/// ```ignore
/// let mut scheduler = FrameScheduler::with_fps(strip, 30);
/// loop {
///     let result = scheduler.tick(Instant::now(), |frame| frame.roll(1))?;
///     std::thread::sleep(to_std(result.sleep_duration));
/// }
/// ```
pub struct FrameScheduler<B: OutputBackend> {
    strip: Strip<B>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<B: OutputBackend> FrameScheduler<B> {
    /// Pace `strip` at [`DEFAULT_FPS`].
    pub fn new(strip: Strip<B>) -> Self {
        Self::with_frame_duration(strip, DEFAULT_FRAME_DURATION)
    }

    /// Pace `strip` at `fps` frames per second (at least 1).
    pub fn with_fps(strip: Strip<B>, fps: u32) -> Self {
        let fps = u64::from(fps.max(1));
        Self::with_frame_duration(strip, Duration::from_micros(1_000_000 / fps))
    }

    /// Pace `strip` with an explicit interval between frames.
    pub fn with_frame_duration(strip: Strip<B>, frame_duration: Duration) -> Self {
        Self {
            strip,
            next_frame: Instant::from_ticks(0),
            frame_duration,
        }
    }

    /// Draw and push one frame
    ///
    /// `draw` mutates the strip's frame, then the strip is updated. The
    /// deadline moves forward even when the update fails, so a device error
    /// never turns the loop into a busy spin; keep pacing with
    /// [`sleep_duration`](Self::sleep_duration) in that case.
    pub fn tick<F>(&mut self, now: Instant, draw: F) -> Result<FrameResult, DeviceError>
    where
        F: FnOnce(&mut PixelFrame),
    {
        // restart the schedule after a long stall
        if now > self.next_frame + self.frame_duration * 2 {
            self.next_frame = now;
        }

        draw(self.strip.frame_mut());
        self.next_frame += self.frame_duration;
        self.strip.update()?;

        Ok(FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: self.sleep_duration(now),
        })
    }

    /// Time left until the next deadline, zero when running late.
    pub fn sleep_duration(&self, now: Instant) -> Duration {
        if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_ticks(0)
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn strip(&self) -> &Strip<B> {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut Strip<B> {
        &mut self.strip
    }

    /// Stop pacing and hand the strip back.
    pub fn into_strip(self) -> Strip<B> {
        self.strip
    }
}
