use crate::foundation::clock::ClockHandle;
use crate::foundation::core::Canvas;
use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;
use crate::generator::api::Generator;

/// Approach parameters of a [`LoomingDisk`], in arbitrary but consistent length units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoomingParams {
    /// Physical radius of the approaching object.
    pub radius: f64,
    /// Approach speed per second.
    pub speed: f64,
    /// Initial distance to the observer.
    pub distance: f64,
    /// Disk intensity.
    pub disc: u8,
    /// Background intensity.
    pub background: u8,
}

/// Angular radius in degrees of an object of `radius` approaching from `distance` at `speed`,
/// `t` seconds into the approach. Once the object has arrived it fills the hemisphere.
pub fn angular_radius_deg(radius: f64, distance: f64, speed: f64, t: f64) -> f64 {
    let position = distance - speed * t;
    if position <= 0.0 {
        return 90.0;
    }
    (radius / position).atan().to_degrees()
}

/// Disk whose angular size follows an object approaching at constant speed.
#[derive(Clone, Debug)]
pub struct LoomingDisk {
    clock: ClockHandle,
    canvas: Canvas,
    center: (f64, f64),
}

impl LoomingDisk {
    /// Disk on `canvas`, centred at `center_deg` (azimuth, elevation) or the canvas centre.
    pub fn new(clock: ClockHandle, canvas: Canvas, center_deg: Option<(f64, f64)>) -> Self {
        let center = match center_deg {
            Some((az, el)) => (az * canvas.px_per_deg_x(), el * canvas.px_per_deg_y()),
            None => (
                f64::from(canvas.width / 2),
                f64::from(canvas.height / 2),
            ),
        };
        Self {
            clock,
            canvas,
            center,
        }
    }
}

impl Generator for LoomingDisk {
    type Params = LoomingParams;

    fn produce(&mut self, p: &LoomingParams) -> StimResult<Frame> {
        let alpha = angular_radius_deg(p.radius, p.distance, p.speed, self.clock.elapsed());
        let r = alpha * self.canvas.px_per_deg_y();
        let r2 = r * r;
        let (cx, cy) = self.center;
        let mut f = Frame::gray(self.canvas, p.background);
        for y in 0..self.canvas.height {
            let dy = f64::from(y) - cy;
            for x in 0..self.canvas.width {
                let dx = f64::from(x) - cx;
                if dx * dx + dy * dy <= r2 {
                    f.set_pixel(x, y, p.disc);
                }
            }
        }
        Ok(f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/looming.rs"]
mod tests;
