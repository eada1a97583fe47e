use crate::foundation::core::{Canvas, Rotation};
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::Frame;
use crate::geometry::stage::Geometry;

/// Field of view as azimuth/elevation windows in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldOfView {
    /// `[start, end)` azimuth in `0..=360`.
    pub azimuth: [f64; 2],
    /// `[start, end)` elevation in `0..=180`, measured from the top of the texture.
    pub elevation: [f64; 2],
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            azimuth: [0.0, 180.0],
            elevation: [15.0, 140.0],
        }
    }
}

impl FieldOfView {
    /// Pixel window `(x, y, width, height)` of this field of view on `texture`.
    pub fn window(&self, texture: Canvas) -> StimResult<(u32, u32, u32, u32)> {
        let [a0, a1] = self.azimuth;
        let [e0, e1] = self.elevation;
        if !(0.0..360.0).contains(&a0) || a1 <= a0 || a1 > 360.0 {
            return Err(StimError::config(format!(
                "invalid azimuth window [{a0}, {a1}]"
            )));
        }
        if !(0.0..180.0).contains(&e0) || e1 <= e0 || e1 > 180.0 {
            return Err(StimError::config(format!(
                "invalid elevation window [{e0}, {e1}]"
            )));
        }
        let x0 = (a0 * texture.px_per_deg_x()).floor() as u32;
        let x1 = ((a1 * texture.px_per_deg_x()).floor() as u32).min(texture.width);
        let y0 = (e0 * texture.px_per_deg_y()).floor() as u32;
        let y1 = ((e1 * texture.px_per_deg_y()).floor() as u32).min(texture.height);
        if x1 <= x0 || y1 <= y0 {
            return Err(StimError::config(
                "field of view covers less than one texture pixel",
            ));
        }
        Ok((x0, y0, x1 - x0, y1 - y0))
    }
}

/// Flat-display geometry over an equirectangular texture.
///
/// Rotation resamples the sphere with nearest-neighbour lookup (pure yaw is an exact column
/// shift), the FOV crop selects the azimuth/elevation window, and projection and masking are the
/// identity. Dome projections plug in through [`Geometry`] instead.
#[derive(Clone, Debug)]
pub struct EquirectGeometry {
    texture: Canvas,
    window: (u32, u32, u32, u32),
}

impl EquirectGeometry {
    /// Geometry for `texture`-sized frames restricted to `fov`.
    pub fn new(texture: Canvas, fov: FieldOfView) -> StimResult<Self> {
        Ok(Self {
            texture,
            window: fov.window(texture)?,
        })
    }

    /// Texture dimensions this geometry expects.
    pub fn texture(&self) -> Canvas {
        self.texture
    }

    fn check_texture(&self, frame: &Frame) -> StimResult<()> {
        if frame.canvas() != self.texture {
            return Err(StimError::geometry(format!(
                "expected {}x{} texture, got {}x{}",
                self.texture.width,
                self.texture.height,
                frame.width(),
                frame.height()
            )));
        }
        Ok(())
    }

    fn rotate_sphere(&self, frame: &Frame, r: Rotation) -> Frame {
        let w = frame.width();
        let h = frame.height();
        let m = rotation_matrix(r);
        let mut out = Frame::filled(w, h, frame.channels(), 0);
        let (fw, fh) = (f64::from(w), f64::from(h));
        for y in 0..h {
            let lat = std::f64::consts::FRAC_PI_2 - (f64::from(y) + 0.5) / fh * std::f64::consts::PI;
            let (slat, clat) = lat.sin_cos();
            for x in 0..w {
                let lon = (f64::from(x) + 0.5) / fw * std::f64::consts::TAU - std::f64::consts::PI;
                let (slon, clon) = lon.sin_cos();
                let v = [clat * clon, clat * slon, slat];
                // Inverse rotation (transpose) finds where this output pixel came from.
                let s = [
                    m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
                    m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
                    m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
                ];
                let src_lat = s[2].clamp(-1.0, 1.0).asin();
                let src_lon = s[1].atan2(s[0]);
                let sx = ((src_lon + std::f64::consts::PI) / std::f64::consts::TAU * fw).floor();
                let sy = ((std::f64::consts::FRAC_PI_2 - src_lat) / std::f64::consts::PI * fh).floor();
                let sx = (sx as i64).rem_euclid(i64::from(w)) as u32;
                let sy = (sy as i64).clamp(0, i64::from(h) - 1) as u32;
                out.set_pixel_from(x, y, frame.pixel(sx, sy));
            }
        }
        out
    }
}

fn rotation_matrix(r: Rotation) -> [[f64; 3]; 3] {
    let (sr, cr) = r.roll.to_radians().sin_cos();
    let (sp, cp) = r.pitch.to_radians().sin_cos();
    let (sy, cy) = r.yaw.to_radians().sin_cos();
    // Rz(yaw) * Ry(pitch) * Rx(roll)
    [
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
        [-sp, cp * sr, cp * cr],
    ]
}

impl Geometry for EquirectGeometry {
    fn rotate(&self, frame: &Frame, rotation: Rotation) -> StimResult<Frame> {
        self.check_texture(frame)?;
        if rotation.roll == 0.0 && rotation.pitch == 0.0 {
            let cols = (rotation.yaw * self.texture.px_per_deg_x()).round() as i64;
            return Ok(frame.shift_columns(cols));
        }
        Ok(self.rotate_sphere(frame, rotation))
    }

    fn crop_to_fov(&self, frame: &Frame) -> StimResult<Frame> {
        self.check_texture(frame)?;
        let (x, y, w, h) = self.window;
        frame.crop(x, y, w, h)
    }

    fn project(&self, frame: &Frame) -> StimResult<Frame> {
        Ok(frame.clone())
    }

    fn mask(&self, frame: &Frame) -> StimResult<Frame> {
        Ok(frame.clone())
    }

    fn output_canvas(&self) -> Canvas {
        Canvas {
            width: self.window.2,
            height: self.window.3,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/equirect.rs"]
mod tests;
