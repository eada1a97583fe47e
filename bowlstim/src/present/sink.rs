use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;

use crate::foundation::clock::ManualClock;
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::{Channels, Frame};

/// Display surface contract used by the presentation loop.
///
/// Ordering contract: `present` is followed by one `poll_cancel` per tick, then `wait`. `close`
/// is called exactly once, also after cancellation.
pub trait OutputSink {
    /// Show one frame.
    fn present(&mut self, frame: &Frame) -> StimResult<()>;
    /// Return `true` when the user asked to stop.
    fn poll_cancel(&mut self) -> bool;
    /// Block for roughly `ms` milliseconds (the pacing sleep).
    fn wait(&mut self, ms: u32) -> StimResult<()>;
    /// Tear the surface down.
    fn close(&mut self) -> StimResult<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn present(&mut self, frame: &Frame) -> StimResult<()> {
        (**self).present(frame)
    }

    fn poll_cancel(&mut self) -> bool {
        (**self).poll_cancel()
    }

    fn wait(&mut self, ms: u32) -> StimResult<()> {
        (**self).wait(ms)
    }

    fn close(&mut self) -> StimResult<()> {
        (**self).close()
    }
}

/// External stop requests shared by the bundled sinks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopCondition {
    /// Cancel once this many frames have been presented.
    pub max_presents: Option<u64>,
    /// Cancel as soon as this file exists.
    pub stop_file: Option<PathBuf>,
}

impl StopCondition {
    /// `true` when either limit has been reached.
    pub fn triggered(&self, presented: u64) -> bool {
        if self.max_presents.is_some_and(|max| presented >= max) {
            return true;
        }
        self.stop_file.as_deref().is_some_and(Path::exists)
    }
}

/// Sink without a display: counts presents, keeps the latest frame and either sleeps or advances
/// a [`ManualClock`] on `wait`.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    stop: StopCondition,
    clock: Option<Rc<ManualClock>>,
    presented: u64,
    waited_ms: u64,
    last: Option<Frame>,
    history: Option<Vec<Frame>>,
    closed: bool,
}

impl HeadlessSink {
    /// Real-time headless sink.
    pub fn new(stop: StopCondition) -> Self {
        Self {
            stop,
            ..Self::default()
        }
    }

    /// Advance `clock` instead of sleeping.
    pub fn with_manual_clock(mut self, clock: Rc<ManualClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Keep a copy of every presented frame.
    pub fn with_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// Frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Total milliseconds waited.
    pub fn waited_ms(&self) -> u64 {
        self.waited_ms
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    /// Every presented frame, when history was enabled.
    pub fn history(&self) -> &[Frame] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// `true` after `close`.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl OutputSink for HeadlessSink {
    fn present(&mut self, frame: &Frame) -> StimResult<()> {
        if self.closed {
            return Err(StimError::sink("present after close"));
        }
        self.presented += 1;
        if let Some(history) = self.history.as_mut() {
            history.push(frame.clone());
        }
        self.last = Some(frame.clone());
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        self.stop.triggered(self.presented)
    }

    fn wait(&mut self, ms: u32) -> StimResult<()> {
        self.waited_ms += u64::from(ms);
        match &self.clock {
            Some(clock) => clock.advance_ms(ms),
            None => std::thread::sleep(std::time::Duration::from_millis(u64::from(ms))),
        }
        Ok(())
    }

    fn close(&mut self) -> StimResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Writes every presented frame to `<dir>/frame_NNNNNN.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    stop: StopCondition,
    written: u64,
}

impl PngSequenceSink {
    /// Create `dir` (if needed) and write frames into it.
    pub fn create(dir: impl Into<PathBuf>, stop: StopCondition) -> StimResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            stop,
            written: 0,
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

impl OutputSink for PngSequenceSink {
    fn present(&mut self, frame: &Frame) -> StimResult<()> {
        let path = self.dir.join(format!("frame_{:06}.png", self.written));
        let color = match frame.channels() {
            Channels::Gray => image::ColorType::L8,
            Channels::Rgb => image::ColorType::Rgb8,
        };
        image::save_buffer_with_format(
            &path,
            frame.data(),
            frame.width(),
            frame.height(),
            color,
            image::ImageFormat::Png,
        )
        .map_err(|e| StimError::sink(format!("write png '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        self.stop.triggered(self.written)
    }

    fn wait(&mut self, ms: u32) -> StimResult<()> {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
        Ok(())
    }

    fn close(&mut self) -> StimResult<()> {
        tracing::info!(
            frames = self.written,
            dir = %self.dir.display(),
            "png sequence closed"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/sink.rs"]
mod tests;
