use crate::foundation::core::Canvas;
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::{Channels, Frame};
use crate::foundation::rng::Rng64;

/// Procedural grayscale texture recipes over an equirectangular canvas.
///
/// Sizes are given in degrees and converted with the canvas' horizontal pixels-per-degree.
/// Intensities are raw samples; `255` marks transparent pixels when the texture is used as a
/// scene foreground.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSpec {
    /// Flat field.
    Uniform {
        /// Intensity.
        value: u8,
    },
    /// Vertical square-wave stripes, starting with `color2` at column 0.
    GratingVertical {
        /// Base intensity.
        color1: u8,
        /// Stripe intensity.
        color2: u8,
        /// Stripe width in degrees.
        bar_deg: f64,
    },
    /// Horizontal square-wave stripes, starting with `color2` at row 0.
    GratingHorizontal {
        /// Base intensity.
        color1: u8,
        /// Stripe intensity.
        color2: u8,
        /// Stripe height in degrees.
        bar_deg: f64,
    },
    /// Checkerboard of `color` and black.
    Checkerboard {
        /// Square intensity.
        color: u8,
        /// Square edge in degrees.
        bar_deg: f64,
    },
    /// Sinusoid varying along azimuth.
    SineVertical {
        /// Peak deviation from `offset`.
        amplitude: f64,
        /// Mean intensity.
        offset: f64,
        /// Period in degrees.
        period_deg: f64,
    },
    /// Sinusoid varying along elevation.
    SineHorizontal {
        /// Peak deviation from `offset`.
        amplitude: f64,
        /// Mean intensity.
        offset: f64,
        /// Period in degrees.
        period_deg: f64,
    },
    /// Single vertical bar centred on the canvas.
    BarVertical {
        /// Bar width in degrees.
        width_deg: f64,
        /// Bar intensity.
        color: u8,
        /// Background intensity (`255` for a transparent foreground).
        background: u8,
        /// Horizontal displacement of the bar centre in pixels.
        #[serde(default)]
        offset_px: i64,
    },
    /// Column of random two-level squares centred on the canvas.
    CheckerColumn {
        /// Square edge in degrees.
        block_deg: f64,
        /// Number of square columns.
        columns: u32,
        /// First square intensity.
        color1: u8,
        /// Second square intensity.
        color2: u8,
        /// Background intensity (`255` for a transparent foreground).
        background: u8,
        /// Horizontal displacement of the column centre in pixels.
        #[serde(default)]
        offset_px: i64,
        /// Random seed.
        #[serde(default)]
        seed: u64,
    },
    /// Full-canvas random two-level squares.
    CheckerScreen {
        /// Square edge in degrees.
        block_deg: f64,
        /// First square intensity.
        color1: u8,
        /// Second square intensity.
        color2: u8,
        /// Random seed.
        #[serde(default)]
        seed: u64,
    },
    /// Left half `color2`, right half `color1`.
    EdgeVertical {
        /// Right half intensity.
        color1: u8,
        /// Left half intensity.
        color2: u8,
    },
}

fn px_for_deg(canvas: Canvas, deg: f64, what: &str) -> StimResult<u32> {
    let px = canvas.px_per_deg_x() * deg;
    if !px.is_finite() || px < 1.0 {
        return Err(StimError::config(format!(
            "{what} of {deg} deg is narrower than one pixel"
        )));
    }
    Ok(px as u32)
}

fn sine_samples(n: u32, amplitude: f64, offset: f64, period_deg: f64) -> StimResult<Vec<u8>> {
    if period_deg.is_nan() || period_deg <= 0.0 {
        return Err(StimError::config("sine period must be > 0"));
    }
    let cycles = (360.0 / period_deg).floor();
    let last = f64::from(n.saturating_sub(1).max(1));
    Ok((0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * cycles * f64::from(i) / last;
            (amplitude * t.sin() + offset) as u8
        })
        .collect())
}

impl TextureSpec {
    /// Render the recipe on `canvas` as a gray frame.
    pub fn render(&self, canvas: Canvas) -> StimResult<Frame> {
        let (w, h) = (canvas.width, canvas.height);
        let frame = match *self {
            Self::Uniform { value } => Frame::gray(canvas, value),
            Self::GratingVertical {
                color1,
                color2,
                bar_deg,
            } => {
                let p = px_for_deg(canvas, bar_deg, "stripe")?;
                let mut f = Frame::gray(canvas, color1);
                for x in (0..w).filter(|x| (x / p) % 2 == 0) {
                    f.fill_rect(i64::from(x), 0, i64::from(x) + 1, i64::from(h), color2);
                }
                f
            }
            Self::GratingHorizontal {
                color1,
                color2,
                bar_deg,
            } => {
                let p = px_for_deg(canvas, bar_deg, "stripe")?;
                let mut f = Frame::gray(canvas, color1);
                for y in (0..h).filter(|y| (y / p) % 2 == 0) {
                    f.fill_rect(0, i64::from(y), i64::from(w), i64::from(y) + 1, color2);
                }
                f
            }
            Self::Checkerboard { color, bar_deg } => {
                let p = px_for_deg(canvas, bar_deg, "square")?;
                let mut f = Frame::gray(canvas, 0);
                for y in 0..h {
                    for x in 0..w {
                        if ((x / p) + (y / p)) % 2 == 1 {
                            f.set_pixel(x, y, color);
                        }
                    }
                }
                f
            }
            Self::SineVertical {
                amplitude,
                offset,
                period_deg,
            } => {
                let row = sine_samples(w, amplitude, offset, period_deg)?;
                let data = (0..h).flat_map(|_| row.iter().copied()).collect();
                Frame::from_raw(w, h, Channels::Gray, data)?
            }
            Self::SineHorizontal {
                amplitude,
                offset,
                period_deg,
            } => {
                let col = sine_samples(h, amplitude, offset, period_deg)?;
                let data = col
                    .iter()
                    .flat_map(|&v| std::iter::repeat_n(v, w as usize))
                    .collect();
                Frame::from_raw(w, h, Channels::Gray, data)?
            }
            Self::BarVertical {
                width_deg,
                color,
                background,
                offset_px,
            } => {
                let bw = i64::from(px_for_deg(canvas, width_deg, "bar")?);
                let start = (f64::from(w) / 2.0 + offset_px as f64 - bw as f64 / 2.0) as i64;
                let mut f = Frame::gray(canvas, background);
                f.fill_rect(start, 0, start + bw, i64::from(h), color);
                f
            }
            Self::CheckerColumn {
                block_deg,
                columns,
                color1,
                color2,
                background,
                offset_px,
                seed,
            } => {
                let b = i64::from(px_for_deg(canvas, block_deg, "checker square")?);
                let start = (f64::from(w) / 2.0 + offset_px as f64
                    - (b * i64::from(columns)) as f64 / 2.0) as i64;
                let mut rng = Rng64::new(seed);
                let mut f = Frame::gray(canvas, background);
                for i in 0..i64::from(columns) {
                    for j in 0..i64::from(h) / b {
                        let v = if rng.coin() { color1 } else { color2 };
                        let x0 = start + i * b;
                        f.fill_rect(x0, j * b, x0 + b, (j + 1) * b, v);
                    }
                }
                f
            }
            Self::CheckerScreen {
                block_deg,
                color1,
                color2,
                seed,
            } => {
                let b = i64::from(px_for_deg(canvas, block_deg, "checker square")?);
                let mut rng = Rng64::new(seed);
                let mut f = Frame::gray(canvas, color2);
                for i in 0..i64::from(w) / b {
                    for j in 0..i64::from(h) / b {
                        let v = if rng.coin() { color1 } else { color2 };
                        f.fill_rect(i * b, j * b, (i + 1) * b, (j + 1) * b, v);
                    }
                }
                f
            }
            Self::EdgeVertical { color1, color2 } => {
                let mut f = Frame::gray(canvas, color1);
                f.fill_rect(0, 0, i64::from(w / 2), i64::from(h), color2);
                f
            }
        };
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/texture.rs"]
mod tests;
