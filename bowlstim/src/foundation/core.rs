use crate::foundation::error::{StimError, StimResult};

/// Monotonic logical frame counter of a run.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds). Must be > 0.
    pub den: u32,
}

impl Fps {
    /// Create a validated frame rate (`num > 0`, `den > 0`).
    pub fn new(num: u32, den: u32) -> StimResult<Self> {
        if den == 0 {
            return Err(StimError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StimError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frames-per-second shorthand.
    pub fn hz(num: u32) -> StimResult<Self> {
        Self::new(num, 1)
    }

    /// Frame rate as floating-point frames per second.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Time at which `frames` frames should have been emitted.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

/// Texture canvas in equirectangular pixel space: `width` spans 360 degrees of azimuth and
/// `height` spans 180 degrees of elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated, non-empty canvas.
    pub fn new(width: u32, height: u32) -> StimResult<Self> {
        if width == 0 || height == 0 {
            return Err(StimError::config("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Horizontal pixels per degree of azimuth.
    pub fn px_per_deg_x(self) -> f64 {
        f64::from(self.width) / 360.0
    }

    /// Vertical pixels per degree of elevation.
    pub fn px_per_deg_y(self) -> f64 {
        f64::from(self.height) / 180.0
    }

    /// Number of samples per channel.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Euler rotation in degrees, applied by the geometry collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rotation {
    /// Rotation about the viewing axis.
    #[serde(default)]
    pub roll: f64,
    /// Rotation about the horizontal axis.
    #[serde(default)]
    pub pitch: f64,
    /// Rotation about the vertical axis (azimuth).
    #[serde(default)]
    pub yaw: f64,
}

impl Rotation {
    /// No rotation.
    pub const ZERO: Self = Self {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };

    /// Construct from components in degrees.
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Pure azimuthal rotation.
    pub fn yaw(yaw: f64) -> Self {
        Self {
            yaw,
            ..Self::ZERO
        }
    }

    /// Return `true` when every component is exactly zero.
    pub fn is_zero(self) -> bool {
        self.roll == 0.0 && self.pitch == 0.0 && self.yaw == 0.0
    }

    /// Component-wise scale.
    pub fn scaled(self, k: f64) -> Self {
        Self {
            roll: self.roll * k,
            pitch: self.pitch * k,
            yaw: self.yaw * k,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
