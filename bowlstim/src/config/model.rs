use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Rotation};
use crate::foundation::error::{StimError, StimResult};
use crate::generator::edge::EdgeParams;
use crate::generator::looming::LoomingParams;
use crate::generator::noise::DEFAULT_NOISE_HZ;
use crate::generator::texture::TextureSpec;
use crate::geometry::equirect::FieldOfView;
use crate::present::program::DEFAULT_DEGRADED_WAIT_MS;
use crate::sensor::link::DEFAULT_REGION_BYTES;
use crate::sensor::record::RecordFormat;
use crate::sequence::sequencer::SequenceConfig;

fn default_frame_rate() -> u32 {
    60
}

fn default_noise_hz() -> u32 {
    DEFAULT_NOISE_HZ
}

fn default_region_bytes() -> usize {
    DEFAULT_REGION_BYTES
}

fn default_one() -> f64 {
    1.0
}

fn finite_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Texture canvas, visible window and mounting of the display.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Equirectangular texture size.
    pub canvas: Canvas,
    /// Visible azimuth/elevation window.
    pub fov: FieldOfView,
    /// Fixed mounting rotation in degrees.
    pub rot_offset: Rotation,
    /// Display mounted upside down.
    pub inverted: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 720,
                height: 360,
            },
            fov: FieldOfView::default(),
            rot_offset: Rotation::ZERO,
            inverted: false,
        }
    }
}

/// Loop waits and bracket timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Wait after a regular tick.
    pub hold_wait_ms: u32,
    /// Wait after a tick without tracker data.
    pub degraded_wait_ms: u32,
    /// Show synchronisation brackets around the run.
    pub brackets: bool,
    /// Blanking interval length in seconds.
    pub blank_secs: f64,
    /// Marker display time.
    pub marker_ms: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            hold_wait_ms: 1,
            degraded_wait_ms: DEFAULT_DEGRADED_WAIT_MS,
            brackets: true,
            blank_secs: 0.1,
            marker_ms: 30,
        }
    }
}

/// One scene of a `sequence` program.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    /// Diagnostic name; defaults to `scene<N>`.
    #[serde(default)]
    pub label: Option<String>,
    /// Moving texture.
    pub foreground: TextureSpec,
    /// Static texture.
    pub background: TextureSpec,
}

/// What the run presents.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgramConfig {
    /// Loop/scene/side sequencing of foreground/background pairs.
    Sequence {
        /// Timing.
        timing: SequenceConfig,
        /// Scenes in presentation order.
        scenes: Vec<SceneConfig>,
    },
    /// Texture rotated by the tracker's heading.
    ClosedLoop {
        /// Texture to rotate.
        texture: TextureSpec,
        /// Shared-memory region name or path.
        region: String,
        /// Record tag and minimum token count.
        #[serde(default)]
        record: RecordFormat,
        /// Bytes read from the region per poll.
        #[serde(default = "default_region_bytes")]
        region_bytes: usize,
        /// Multiplier on the tracker's rotation.
        #[serde(default = "default_one")]
        gain: f64,
        /// Display resolution correction factor.
        #[serde(default = "default_one")]
        resolution_scale: f64,
        /// Roll as a fraction of yaw.
        #[serde(default)]
        roll_coupling: f64,
        /// Pitch as a fraction of yaw.
        #[serde(default)]
        pitch_coupling: f64,
    },
    /// Texture rotating at constant speed.
    Rotation {
        /// Texture to rotate.
        texture: TextureSpec,
        /// Degrees per second on each axis.
        speed: Rotation,
    },
    /// Static texture.
    Still {
        /// Texture to show.
        texture: TextureSpec,
    },
    /// Approaching disk.
    Looming {
        /// Object geometry and colours.
        params: LoomingParams,
        /// Disk centre (azimuth, elevation) in degrees; canvas centre when absent.
        #[serde(default)]
        center_deg: Option<[f64; 2]>,
    },
    /// Binary block noise.
    Noise {
        /// Block edge in degrees.
        block_deg: f64,
        /// Pattern refresh rate.
        #[serde(default = "default_noise_hz")]
        rate_hz: u32,
        /// Random seed.
        #[serde(default)]
        seed: u64,
    },
    /// Sweeping vertical edge.
    Edge {
        /// Start and speed.
        params: EdgeParams,
        /// Background intensity.
        color1: u8,
        /// Swept intensity.
        color2: u8,
    },
    /// Directory of PNG frames.
    Clip {
        /// Frame directory.
        dir: PathBuf,
        /// Playback rate.
        rate_hz: u32,
    },
}

impl ProgramConfig {
    /// Tag used in the JSON document.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sequence { .. } => "sequence",
            Self::ClosedLoop { .. } => "closed_loop",
            Self::Rotation { .. } => "rotation",
            Self::Still { .. } => "still",
            Self::Looming { .. } => "looming",
            Self::Noise { .. } => "noise",
            Self::Edge { .. } => "edge",
            Self::Clip { .. } => "clip",
        }
    }
}

/// Command-line adjustments applied on top of a loaded document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    /// Replace `frame_rate`.
    pub frame_rate: Option<u32>,
    /// Replace `duration`.
    pub duration: Option<f64>,
    /// Force the inverted mounting.
    pub inverted: bool,
}

/// A complete experiment description, loaded from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentConfig {
    /// Display geometry.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Outer loop rate in Hz.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Run length in seconds; absent runs until the program ends or the user stops it.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Waits and brackets.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// What to present.
    pub program: ProgramConfig,
}

impl ExperimentConfig {
    /// Parse a JSON document.
    pub fn from_reader<R: std::io::Read>(r: R) -> StimResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StimError::serde(format!("parse experiment JSON: {e}")))
    }

    /// Parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> StimResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StimError::config(format!("open experiment JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(rate) = overrides.frame_rate {
            self.frame_rate = rate;
        }
        if let Some(duration) = overrides.duration {
            self.duration = Some(duration);
        }
        if overrides.inverted {
            self.display.inverted = true;
        }
    }

    /// Structural checks that do not touch the file system or the sensor.
    pub fn validate(&self) -> StimResult<()> {
        if self.frame_rate == 0 {
            return Err(StimError::config("frame_rate must be > 0"));
        }
        if self.duration.is_some_and(|d| !finite_positive(d)) {
            return Err(StimError::config("duration must be > 0 when given"));
        }
        Canvas::new(self.display.canvas.width, self.display.canvas.height)?;
        self.display.fov.window(self.display.canvas)?;
        if !(self.pacing.blank_secs.is_finite() && self.pacing.blank_secs >= 0.0) {
            return Err(StimError::config("pacing.blank_secs must be >= 0"));
        }

        match &self.program {
            ProgramConfig::Sequence { timing, scenes } => {
                if scenes.is_empty() {
                    return Err(StimError::config("sequence needs at least one scene"));
                }
                timing.validate()?;
            }
            ProgramConfig::ClosedLoop {
                region,
                region_bytes,
                gain,
                resolution_scale,
                ..
            } => {
                if region.trim().is_empty() {
                    return Err(StimError::config("closed_loop.region must not be empty"));
                }
                if *region_bytes == 0 {
                    return Err(StimError::config("closed_loop.region_bytes must be > 0"));
                }
                if !gain.is_finite() || !resolution_scale.is_finite() {
                    return Err(StimError::config(
                        "closed_loop gain and resolution_scale must be finite",
                    ));
                }
            }
            ProgramConfig::Noise {
                block_deg, rate_hz, ..
            } => {
                if *rate_hz == 0 {
                    return Err(StimError::config("noise.rate_hz must be > 0"));
                }
                if !finite_positive(*block_deg) {
                    return Err(StimError::config("noise.block_deg must be > 0"));
                }
            }
            ProgramConfig::Clip { rate_hz, .. } => {
                if *rate_hz == 0 {
                    return Err(StimError::config("clip.rate_hz must be > 0"));
                }
            }
            ProgramConfig::Looming { params, .. } => {
                if !params.radius.is_finite()
                    || !params.distance.is_finite()
                    || !params.speed.is_finite()
                {
                    return Err(StimError::config("looming parameters must be finite"));
                }
            }
            ProgramConfig::Rotation { .. }
            | ProgramConfig::Still { .. }
            | ProgramConfig::Edge { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
