use crate::foundation::core::{Fps, FrameIndex};

/// Per-tick pacing verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaceDecision {
    /// Compute a new logical frame.
    Advance,
    /// Re-present the previous frame unchanged.
    Hold,
}

/// Render-ahead-never, catch-up-by-skipping frame pacer.
///
/// A frame is due once the actual elapsed time exceeds `frames_emitted / fps`. Slow consumers
/// lose frames instead of queueing them, so latency and memory stay bounded.
#[derive(Clone, Debug)]
pub struct FramePacer {
    fps: Fps,
    frames_emitted: u64,
}

impl FramePacer {
    /// Pacer targeting `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            frames_emitted: 0,
        }
    }

    /// Target rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frames advanced so far.
    pub fn frames_emitted(&self) -> FrameIndex {
        FrameIndex(self.frames_emitted)
    }

    /// Time at which the frames emitted so far were due.
    pub fn theoretical_elapsed(&self) -> f64 {
        self.fps.frames_to_secs(self.frames_emitted)
    }

    /// Decide whether this tick advances. `has_frame` is `false` until a first frame exists,
    /// which forces an advance regardless of timing.
    pub fn decide(&mut self, elapsed: f64, has_frame: bool) -> PaceDecision {
        if elapsed > self.theoretical_elapsed() || !has_frame {
            self.frames_emitted += 1;
            PaceDecision::Advance
        } else {
            PaceDecision::Hold
        }
    }

    /// Forget all emitted frames.
    pub fn reset(&mut self) {
        self.frames_emitted = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pacing/pacer.rs"]
mod tests;
