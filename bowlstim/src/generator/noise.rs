use crate::foundation::clock::ClockHandle;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::Frame;
use crate::foundation::rng::Rng64;
use crate::generator::api::Generator;
use crate::geometry::equirect::FieldOfView;
use crate::pacing::pacer::{FramePacer, PaceDecision};

/// Default refresh rate of the noise pattern.
pub const DEFAULT_NOISE_HZ: u32 = 30;

/// Full-contrast binary block noise drawn over the visible window, refreshed at its own rate.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    clock: ClockHandle,
    pacer: FramePacer,
    seed: u64,
    rng: Rng64,
    canvas: Canvas,
    window: (u32, u32, u32, u32),
    block_px: u32,
    cached: Option<Frame>,
}

impl NoiseGenerator {
    /// Noise over `fov` on `canvas` with square blocks of `block_deg`, redrawn at `rate`.
    pub fn new(
        clock: ClockHandle,
        canvas: Canvas,
        fov: FieldOfView,
        block_deg: f64,
        rate: Fps,
        seed: u64,
    ) -> StimResult<Self> {
        let block = block_deg * canvas.px_per_deg_x();
        if !block.is_finite() || block < 1.0 {
            return Err(StimError::config(format!(
                "noise block of {block_deg} deg is narrower than one pixel"
            )));
        }
        Ok(Self {
            clock,
            pacer: FramePacer::new(rate),
            seed,
            rng: Rng64::new(seed),
            canvas,
            window: fov.window(canvas)?,
            block_px: block as u32,
            cached: None,
        })
    }

    /// Patterns drawn so far.
    pub fn patterns_drawn(&self) -> u64 {
        self.pacer.frames_emitted().0
    }

    fn draw(&mut self) -> Frame {
        let (x0, y0, w, h) = self.window;
        let (x1, y1) = (i64::from(x0 + w), i64::from(y0 + h));
        let b = i64::from(self.block_px);
        let mut f = Frame::gray(self.canvas, 0);
        let mut y = i64::from(y0);
        while y < y1 {
            let mut x = i64::from(x0);
            while x < x1 {
                if self.rng.coin() {
                    f.fill_rect(x, y, (x + b).min(x1), (y + b).min(y1), 255);
                }
                x += b;
            }
            y += b;
        }
        f
    }
}

impl Generator for NoiseGenerator {
    type Params = ();

    fn produce(&mut self, _params: &()) -> StimResult<Frame> {
        let elapsed = self.clock.elapsed();
        if self.pacer.decide(elapsed, self.cached.is_some()) == PaceDecision::Advance {
            let f = self.draw();
            self.cached = Some(f);
        }
        self.cached
            .clone()
            .ok_or_else(|| StimError::media("noise pattern missing"))
    }

    fn reset(&mut self) {
        self.pacer.reset();
        self.rng = Rng64::new(self.seed);
        self.cached = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/noise.rs"]
mod tests;
