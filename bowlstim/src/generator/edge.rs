use crate::foundation::clock::ClockHandle;
use crate::foundation::core::Canvas;
use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;
use crate::generator::api::Generator;

/// Sweep parameters of a [`MovingEdge`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeParams {
    /// Azimuth where the edge starts, in degrees.
    pub start_deg: f64,
    /// Sweep speed in degrees per second; negative sweeps leftwards.
    pub speed_deg_per_sec: f64,
}

/// Vertical edge sweeping across the texture at constant angular speed.
///
/// Columns between the start azimuth and `start + speed * elapsed` are drawn in `color2`, the rest
/// in `color1`.
#[derive(Clone, Debug)]
pub struct MovingEdge {
    clock: ClockHandle,
    canvas: Canvas,
    color1: u8,
    color2: u8,
}

impl MovingEdge {
    /// Edge generator on `canvas` reading run time from `clock`.
    pub fn new(clock: ClockHandle, canvas: Canvas, color1: u8, color2: u8) -> Self {
        Self {
            clock,
            canvas,
            color1,
            color2,
        }
    }
}

impl Generator for MovingEdge {
    type Params = EdgeParams;

    fn produce(&mut self, params: &EdgeParams) -> StimResult<Frame> {
        let ppd = self.canvas.px_per_deg_x();
        let t = self.clock.elapsed();
        let a = (params.start_deg * ppd) as i64;
        let b = ((params.start_deg + params.speed_deg_per_sec * t) * ppd) as i64;
        let mut f = Frame::gray(self.canvas, self.color1);
        f.fill_rect(a.min(b), 0, a.max(b), i64::from(self.canvas.height), self.color2);
        Ok(f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/edge.rs"]
mod tests;
