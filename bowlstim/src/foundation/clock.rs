use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::foundation::core::FrameIndex;
use crate::foundation::frame::Frame;

/// Source of absolute wall-clock time in seconds.
pub trait TimeSource {
    /// Current absolute time in seconds.
    fn now_secs(&self) -> f64;
}

/// Monotonic clock anchored to the Unix epoch at construction.
///
/// Readings are `epoch_at_start + Instant::elapsed()`, so they are absolute (comparable across
/// recording equipment) but never jump backwards.
#[derive(Debug)]
pub struct SystemClock {
    epoch_at_start: f64,
    origin: Instant,
}

impl SystemClock {
    /// Anchor a new clock at the current instant.
    pub fn new() -> Self {
        let epoch_at_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            epoch_at_start,
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_secs(&self) -> f64 {
        self.epoch_at_start + self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for deterministic runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    /// Shared manual clock starting at `start` seconds.
    pub fn new(start: f64) -> Rc<Self> {
        Rc::new(Self {
            now: Cell::new(start),
        })
    }

    /// Jump to an absolute time.
    pub fn set(&self, t: f64) {
        self.now.set(t);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    /// Move forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u32) {
        self.advance(f64::from(ms) / 1000.0);
    }
}

impl TimeSource for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}

/// Timing snapshot shared between the presentation loop and generators.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timebase {
    /// Absolute time at which the current run started.
    pub run_start: f64,
    /// Seconds since `run_start`, refreshed once per tick.
    pub elapsed: f64,
    /// Frames emitted by the outer pacer so far.
    pub frame_index: FrameIndex,
}

/// Explicit, cloneable handle onto the run's clock.
///
/// Generators receive one at construction and read `elapsed` from it; only the presentation loop
/// resets or updates it. Single-threaded by construction (`Rc`).
#[derive(Clone)]
pub struct ClockHandle {
    source: Rc<dyn TimeSource>,
    timebase: Rc<Cell<Timebase>>,
}

impl fmt::Debug for ClockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockHandle")
            .field("timebase", &self.timebase.get())
            .finish_non_exhaustive()
    }
}

impl ClockHandle {
    /// Handle over an arbitrary time source.
    pub fn new(source: Rc<dyn TimeSource>) -> Self {
        Self {
            source,
            timebase: Rc::new(Cell::new(Timebase::default())),
        }
    }

    /// Handle over a fresh [`SystemClock`].
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    /// Handle over a shared [`ManualClock`].
    pub fn manual(clock: &Rc<ManualClock>) -> Self {
        Self::new(clock.clone())
    }

    /// Live absolute time (not cached).
    pub fn now(&self) -> f64 {
        self.source.now_secs()
    }

    /// Current snapshot.
    pub fn timebase(&self) -> Timebase {
        self.timebase.get()
    }

    /// Seconds since run start as of the last [`ClockHandle::update`].
    pub fn elapsed(&self) -> f64 {
        self.timebase.get().elapsed
    }

    /// Absolute run start.
    pub fn run_start(&self) -> f64 {
        self.timebase.get().run_start
    }

    /// Frames emitted by the outer pacer.
    pub fn frame_index(&self) -> FrameIndex {
        self.timebase.get().frame_index
    }

    /// Start a new run at the current instant. Returns the run start time.
    pub fn reset(&self) -> f64 {
        let now = self.now();
        self.timebase.set(Timebase {
            run_start: now,
            elapsed: 0.0,
            frame_index: FrameIndex(0),
        });
        now
    }

    /// Refresh `elapsed` from the time source. Returns the absolute reading used.
    pub fn update(&self) -> f64 {
        let now = self.now();
        let mut tb = self.timebase.get();
        tb.elapsed = now - tb.run_start;
        self.timebase.set(tb);
        now
    }

    pub(crate) fn set_frame_index(&self, frame: FrameIndex) {
        let mut tb = self.timebase.get();
        tb.frame_index = frame;
        self.timebase.set(tb);
    }
}

/// Per-run clock state owned by the presentation loop: the shared timebase plus the most
/// recently presented frame.
#[derive(Debug)]
pub struct ClockState {
    clock: ClockHandle,
    last_frame: Option<Frame>,
}

impl ClockState {
    /// Wrap a clock handle; no frame has been produced yet.
    pub fn new(clock: ClockHandle) -> Self {
        Self {
            clock,
            last_frame: None,
        }
    }

    /// The shared clock handle.
    pub fn clock(&self) -> &ClockHandle {
        &self.clock
    }

    /// Reset timing and forget the last frame.
    pub fn reset(&mut self) -> f64 {
        self.last_frame = None;
        self.clock.reset()
    }

    /// Most recently produced frame, if any.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Replace the most recent frame.
    pub fn set_last_frame(&mut self, frame: Frame) {
        self.last_frame = Some(frame);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
