use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::clock::ClockHandle;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::{Channels, Frame};
use crate::generator::api::Generator;
use crate::pacing::pacer::{FramePacer, PaceDecision};

/// Sequential frame source for [`ClipGenerator`].
pub trait ClipSource {
    /// Next decoded frame, or `None` once the clip is exhausted.
    fn next_frame(&mut self) -> StimResult<Option<Frame>>;

    /// Total number of frames, when known.
    fn frame_count(&self) -> Option<usize> {
        None
    }

    /// Restart from the first frame.
    fn rewind(&mut self) -> StimResult<()>;
}

/// Ordered PNG frames in a directory, decoded lazily in file-name order.
#[derive(Clone, Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    pos: usize,
}

impl ImageSequenceSource {
    /// Index every `*.png` file directly inside `dir`.
    pub fn open(dir: &Path) -> StimResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read clip dir '{}'", dir.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("list clip dir '{}'", dir.display()))?
                .path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(StimError::media(format!(
                "no png frames in '{}'",
                dir.display()
            )));
        }
        paths.sort();
        Ok(Self { paths, pos: 0 })
    }
}

impl ClipSource for ImageSequenceSource {
    fn next_frame(&mut self) -> StimResult<Option<Frame>> {
        let Some(path) = self.paths.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        let bytes =
            std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
        let rgb = image::load_from_memory(&bytes)
            .with_context(|| format!("decode frame '{}'", path.display()))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        Frame::from_raw(width, height, Channels::Rgb, rgb.into_raw()).map(Some)
    }

    fn frame_count(&self) -> Option<usize> {
        Some(self.paths.len())
    }

    fn rewind(&mut self) -> StimResult<()> {
        self.pos = 0;
        Ok(())
    }
}

/// In-memory frames, mostly useful for tests and synthetic clips.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipSource {
    frames: Vec<Frame>,
    queue: VecDeque<Frame>,
}

impl MemoryClipSource {
    /// Source yielding `frames` in order.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            queue: frames.iter().cloned().collect(),
            frames,
        }
    }
}

impl ClipSource for MemoryClipSource {
    fn next_frame(&mut self) -> StimResult<Option<Frame>> {
        Ok(self.queue.pop_front())
    }

    fn frame_count(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn rewind(&mut self) -> StimResult<()> {
        self.queue = self.frames.iter().cloned().collect();
        Ok(())
    }
}

/// Plays a [`ClipSource`] at its own frame rate, scaled to the texture canvas.
///
/// Once the source runs dry the last frame is repeated and a single warning is logged.
pub struct ClipGenerator {
    clock: ClockHandle,
    source: Box<dyn ClipSource>,
    pacer: FramePacer,
    canvas: Canvas,
    last: Option<Frame>,
    exhausted: bool,
}

impl std::fmt::Debug for ClipGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipGenerator")
            .field("rate", &self.pacer.fps())
            .field("canvas", &self.canvas)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl ClipGenerator {
    /// Play `source` at `rate`, resizing every frame to `canvas`.
    pub fn new(clock: ClockHandle, source: Box<dyn ClipSource>, rate: Fps, canvas: Canvas) -> Self {
        Self {
            clock,
            source,
            pacer: FramePacer::new(rate),
            canvas,
            last: None,
            exhausted: false,
        }
    }

    /// Playback length at the clip rate, when the frame count is known.
    pub fn natural_duration(&self) -> Option<f64> {
        let n = self.source.frame_count()?;
        Some(self.pacer.fps().frames_to_secs(n as u64))
    }

    /// `true` once the source has run out of frames.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Generator for ClipGenerator {
    type Params = ();

    fn produce(&mut self, _params: &()) -> StimResult<Frame> {
        let elapsed = self.clock.elapsed();
        if self.pacer.decide(elapsed, self.last.is_some()) == PaceDecision::Advance {
            match self.source.next_frame()? {
                Some(f) => {
                    let (w, h) = (self.canvas.width, self.canvas.height);
                    self.last = Some(f.resized_nearest(w, h));
                }
                None if !self.exhausted => {
                    self.exhausted = true;
                    tracing::warn!(
                        frames = self.pacer.frames_emitted().0 - 1,
                        "clip exhausted, repeating last frame"
                    );
                }
                None => {}
            }
        }
        self.last
            .clone()
            .ok_or_else(|| StimError::media("clip source produced no frames"))
    }

    fn reset(&mut self) {
        self.pacer.reset();
        self.last = None;
        self.exhausted = false;
        if let Err(err) = self.source.rewind() {
            tracing::warn!(error = %err, "clip rewind failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/clip.rs"]
mod tests;
