use crate::foundation::core::Canvas;
use crate::foundation::error::{StimError, StimResult};

/// Sample value reserved for "transparent, show the background" in foreground textures.
///
/// This is the unsigned bit pattern of the signed `-1` marker, so foreground recipes must keep
/// visible intensities in `0..=254`.
pub const TRANSPARENT: u8 = 255;

/// Channel layout of a [`Frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Channels {
    /// One luminance sample per pixel.
    Gray,
    /// Interleaved RGB, three samples per pixel.
    Rgb,
}

impl Channels {
    /// Samples per pixel.
    pub fn count(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

/// Owned 8-bit image with fixed dimensions, row-major and channel-interleaved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl Frame {
    /// Frame with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: Channels, value: u8) -> Self {
        let len = width as usize * height as usize * channels.count();
        Self {
            width,
            height,
            channels,
            data: vec![value; len],
        }
    }

    /// Gray frame covering `canvas`.
    pub fn gray(canvas: Canvas, value: u8) -> Self {
        Self::filled(canvas.width, canvas.height, Channels::Gray, value)
    }

    /// Black RGB frame covering `canvas`.
    pub fn black_rgb(canvas: Canvas) -> Self {
        Self::filled(canvas.width, canvas.height, Channels::Rgb, 0)
    }

    /// Wrap raw samples, validating the buffer length.
    pub fn from_raw(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> StimResult<Self> {
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(StimError::media(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height}x{}",
                data.len(),
                channels.count()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Channel layout.
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame and return its samples.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// `true` when `other` has identical dimensions and channel layout.
    pub fn same_shape(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels.count()
    }

    /// Samples of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let o = self.offset(x, y);
        &self.data[o..o + self.channels.count()]
    }

    /// First-channel sample of one pixel.
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y)]
    }

    /// Set every channel of one pixel to `value`.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) {
        let o = self.offset(x, y);
        let n = self.channels.count();
        self.data[o..o + n].fill(value);
    }

    /// Copy `px` (one pixel's worth of samples) into `(x, y)`.
    pub fn set_pixel_from(&mut self, x: u32, y: u32, px: &[u8]) {
        let o = self.offset(x, y);
        let n = self.channels.count();
        self.data[o..o + n].copy_from_slice(&px[..n]);
    }

    /// Fill the rectangle `[x0, x1) x [y0, y1)`, clamped to the frame bounds.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
        let xs = x0.clamp(0, i64::from(self.width)) as u32;
        let xe = x1.clamp(0, i64::from(self.width)) as u32;
        let ys = y0.clamp(0, i64::from(self.height)) as u32;
        let ye = y1.clamp(0, i64::from(self.height)) as u32;
        if xs >= xe || ys >= ye {
            return;
        }
        let n = self.channels.count();
        for y in ys..ye {
            let start = self.offset(xs, y);
            let end = start + (xe - xs) as usize * n;
            self.data[start..end].fill(value);
        }
    }

    /// Expand to RGB by replicating the gray channel. RGB frames are cloned.
    pub fn to_rgb(&self) -> Frame {
        match self.channels {
            Channels::Rgb => self.clone(),
            Channels::Gray => {
                let mut data = Vec::with_capacity(self.data.len() * 3);
                for &v in &self.data {
                    data.extend_from_slice(&[v, v, v]);
                }
                Frame {
                    width: self.width,
                    height: self.height,
                    channels: Channels::Rgb,
                    data,
                }
            }
        }
    }

    /// Horizontally shift with wrap-around: output column `x` reads input column
    /// `(x - shift) mod width`.
    pub fn shift_columns(&self, shift: i64) -> Frame {
        let w = i64::from(self.width);
        if w == 0 || shift.rem_euclid(w) == 0 {
            return self.clone();
        }
        let n = self.channels.count();
        let row_len = self.width as usize * n;
        let mut out = vec![0u8; self.data.len()];
        for y in 0..self.height as usize {
            let row = &self.data[y * row_len..(y + 1) * row_len];
            let dst = &mut out[y * row_len..(y + 1) * row_len];
            for x in 0..w {
                let src_x = (x - shift).rem_euclid(w) as usize;
                let d = x as usize * n;
                dst[d..d + n].copy_from_slice(&row[src_x * n..src_x * n + n]);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: out,
        }
    }

    /// Replace every [`TRANSPARENT`] pixel with the corresponding `background` pixel.
    ///
    /// A pixel counts as transparent when all of its channels hold the sentinel.
    pub fn composite_over(&self, background: &Frame) -> StimResult<Frame> {
        if !self.same_shape(background) {
            return Err(StimError::media(format!(
                "cannot composite {}x{} {:?} over {}x{} {:?}",
                self.width,
                self.height,
                self.channels,
                background.width,
                background.height,
                background.channels
            )));
        }
        let n = self.channels.count();
        let mut out = self.data.clone();
        for (dst, bg) in out.chunks_exact_mut(n).zip(background.data.chunks_exact(n)) {
            if dst.iter().all(|&v| v == TRANSPARENT) {
                dst.copy_from_slice(bg);
            }
        }
        Ok(Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: out,
        })
    }

    /// Rotate by 180 degrees (for inverted display mounting).
    pub fn rotated_180(&self) -> Frame {
        let n = self.channels.count();
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(n).rev() {
            data.extend_from_slice(px);
        }
        Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        }
    }

    /// Copy out the `w x h` window whose top-left corner is `(x, y)`.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> StimResult<Frame> {
        if w == 0 || h == 0 || x.saturating_add(w) > self.width || y.saturating_add(h) > self.height
        {
            return Err(StimError::geometry(format!(
                "crop window {w}x{h}+{x}+{y} does not fit {}x{}",
                self.width, self.height
            )));
        }
        let n = self.channels.count();
        let mut data = Vec::with_capacity(w as usize * h as usize * n);
        for row in y..y + h {
            let start = self.offset(x, row);
            data.extend_from_slice(&self.data[start..start + w as usize * n]);
        }
        Ok(Frame {
            width: w,
            height: h,
            channels: self.channels,
            data,
        })
    }

    /// Nearest-neighbour resize.
    pub fn resized_nearest(&self, width: u32, height: u32) -> Frame {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let n = self.channels.count();
        let mut data = Vec::with_capacity(width as usize * height as usize * n);
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height.max(1))) as u32;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width.max(1))) as u32;
                data.extend_from_slice(self.pixel(sx, sy));
            }
        }
        Frame {
            width,
            height,
            channels: self.channels,
            data,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
