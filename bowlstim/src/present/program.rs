use crate::foundation::core::Rotation;
use crate::foundation::error::StimResult;
use crate::foundation::frame::Frame;
use crate::generator::api::Generator;
use crate::sensor::link::SensorLink;
use crate::sensor::motion::{MotionIntegrator, SensorSample};
use crate::sequence::log::EventLogEntry;
use crate::sequence::sequencer::{SceneSequencer, SequenceTick};

/// Inter-frame wait while the tracker is disconnected.
pub const DEFAULT_DEGRADED_WAIT_MS: u32 = 1000;

/// Output of a program for one Advance tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// New texture, or `None` to keep presenting the previous output.
    pub frame: Option<Frame>,
    /// Per-tick rotation handed to the transform stage.
    pub rotation: Rotation,
    /// Overrides the presenter's inter-frame wait for this tick.
    pub wait_ms: Option<u32>,
    /// `false` while running degraded; such ticks are excluded from throughput statistics.
    pub healthy: bool,
}

impl Step {
    /// Present `frame` unrotated.
    pub fn frame(frame: Frame) -> Self {
        Self {
            frame: Some(frame),
            rotation: Rotation::ZERO,
            wait_ms: None,
            healthy: true,
        }
    }

    /// Keep the previous output.
    pub fn unchanged() -> Self {
        Self {
            frame: None,
            rotation: Rotation::ZERO,
            wait_ms: None,
            healthy: true,
        }
    }

    /// Set the per-tick rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mark the tick degraded and throttle the loop to `wait_ms`.
    pub fn degraded(mut self, wait_ms: u32) -> Self {
        self.wait_ms = Some(wait_ms);
        self.healthy = false;
        self
    }
}

/// Object-safe seam between the presentation loop and whatever produces textures.
pub trait Program {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Reset per-run state. `now` is the absolute run start.
    fn start(&mut self, now: f64) -> StimResult<()>;

    /// Produce the texture for an Advance tick at absolute time `now`.
    fn step(&mut self, now: f64) -> StimResult<Step>;

    /// `true` once the program has nothing more to show.
    fn is_finished(&self) -> bool {
        false
    }

    /// Drain the transition log.
    fn take_events(&mut self) -> Vec<EventLogEntry> {
        Vec::new()
    }

    /// Drain the sensor sample log.
    fn take_sensor_samples(&mut self) -> Vec<SensorSample> {
        Vec::new()
    }
}

impl<P: Program + ?Sized> Program for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn start(&mut self, now: f64) -> StimResult<()> {
        (**self).start(now)
    }

    fn step(&mut self, now: f64) -> StimResult<Step> {
        (**self).step(now)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }

    fn take_events(&mut self) -> Vec<EventLogEntry> {
        (**self).take_events()
    }

    fn take_sensor_samples(&mut self) -> Vec<SensorSample> {
        (**self).take_sensor_samples()
    }
}

/// Runs a [`Generator`] with fixed parameters.
#[derive(Debug)]
pub struct GeneratorProgram<G: Generator> {
    name: &'static str,
    generator: G,
    params: G::Params,
}

impl<G: Generator> GeneratorProgram<G> {
    /// Wrap `generator`, calling it with `params` every Advance tick.
    pub fn new(name: &'static str, generator: G, params: G::Params) -> Self {
        Self {
            name,
            generator,
            params,
        }
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl<G: Generator> Program for GeneratorProgram<G> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn start(&mut self, _now: f64) -> StimResult<()> {
        self.generator.reset();
        Ok(())
    }

    fn step(&mut self, _now: f64) -> StimResult<Step> {
        self.generator.produce(&self.params).map(Step::frame)
    }
}

impl Program for SceneSequencer {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn start(&mut self, _now: f64) -> StimResult<()> {
        self.reset();
        Ok(())
    }

    fn step(&mut self, now: f64) -> StimResult<Step> {
        Ok(match self.tick(now)? {
            SequenceTick::Scene(frame) => Step::frame(frame),
            SequenceTick::Break => Step::frame(Frame::gray(self.canvas(), 0)),
            SequenceTick::Unchanged | SequenceTick::Finished => Step::unchanged(),
        })
    }

    fn is_finished(&self) -> bool {
        SceneSequencer::is_finished(self)
    }

    fn take_events(&mut self) -> Vec<EventLogEntry> {
        self.take_log()
    }
}

/// Fixed texture rotating at constant angular speed.
#[derive(Clone, Debug)]
pub struct RotationProgram {
    texture: Frame,
    speed: Rotation,
    started: f64,
}

impl RotationProgram {
    /// Rotate `texture` by `speed` degrees per second on each axis.
    pub fn new(texture: Frame, speed: Rotation) -> Self {
        Self {
            texture,
            speed,
            started: 0.0,
        }
    }
}

impl Program for RotationProgram {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn start(&mut self, now: f64) -> StimResult<()> {
        self.started = now;
        Ok(())
    }

    fn step(&mut self, now: f64) -> StimResult<Step> {
        let rotation = self.speed.scaled(now - self.started);
        Ok(Step::frame(self.texture.clone()).with_rotation(rotation))
    }
}

/// Gain and coupling of the tracker-driven rotation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClosedLoopOpts {
    /// Multiplier on the tracker's rotation.
    pub gain: f64,
    /// Display resolution correction factor.
    pub resolution_scale: f64,
    /// Roll as a fraction of the yaw offset.
    pub roll_coupling: f64,
    /// Pitch as a fraction of the yaw offset.
    pub pitch_coupling: f64,
    /// Wait between frames while the tracker is disconnected.
    pub degraded_wait_ms: u32,
}

impl Default for ClosedLoopOpts {
    fn default() -> Self {
        Self {
            gain: 1.0,
            resolution_scale: 1.0,
            roll_coupling: 0.0,
            pitch_coupling: 0.0,
            degraded_wait_ms: DEFAULT_DEGRADED_WAIT_MS,
        }
    }
}

/// Rotates a fixed texture by the accumulated tracker heading.
///
/// A tick without a valid record keeps the current rotation, throttles the loop and is left out
/// of throughput statistics. The run never ends because of a dropout.
#[derive(Debug)]
pub struct ClosedLoopProgram<L: SensorLink> {
    link: L,
    texture: Frame,
    opts: ClosedLoopOpts,
    integrator: MotionIntegrator,
    connected: Option<bool>,
    dropouts: u64,
}

impl<L: SensorLink> ClosedLoopProgram<L> {
    /// Drive `texture` from `link`.
    pub fn new(link: L, texture: Frame, opts: ClosedLoopOpts) -> Self {
        Self {
            link,
            texture,
            integrator: MotionIntegrator::new(opts.gain, opts.resolution_scale),
            opts,
            connected: None,
            dropouts: 0,
        }
    }

    /// Accumulated yaw offset in degrees.
    pub fn offset_deg(&self) -> f64 {
        self.integrator.offset_deg()
    }

    /// Ticks without a valid record.
    pub fn dropouts(&self) -> u64 {
        self.dropouts
    }

    /// The sensor link.
    pub fn link(&self) -> &L {
        &self.link
    }

    fn rotation(&self) -> Rotation {
        let yaw = self.integrator.offset_deg();
        Rotation::new(
            self.opts.roll_coupling * yaw,
            self.opts.pitch_coupling * yaw,
            yaw,
        )
    }
}

impl<L: SensorLink> Program for ClosedLoopProgram<L> {
    fn name(&self) -> &'static str {
        "closed_loop"
    }

    fn start(&mut self, _now: f64) -> StimResult<()> {
        self.integrator.reset();
        self.connected = None;
        self.dropouts = 0;
        Ok(())
    }

    fn step(&mut self, now: f64) -> StimResult<Step> {
        match self.link.poll() {
            Some(delta) => {
                if self.connected != Some(true) {
                    tracing::info!(sequence_id = delta.sequence_id, "sensor connected");
                }
                self.connected = Some(true);
                self.integrator.apply(&delta, now);
                Ok(Step::frame(self.texture.clone()).with_rotation(self.rotation()))
            }
            None => {
                self.dropouts += 1;
                if self.connected != Some(false) {
                    tracing::warn!(
                        wait_ms = self.opts.degraded_wait_ms,
                        "sensor not connected, throttling"
                    );
                } else {
                    tracing::debug!(dropouts = self.dropouts, "sensor still disconnected");
                }
                self.connected = Some(false);
                Ok(Step::frame(self.texture.clone())
                    .with_rotation(self.rotation())
                    .degraded(self.opts.degraded_wait_ms))
            }
        }
    }

    fn take_sensor_samples(&mut self) -> Vec<SensorSample> {
        self.integrator.take_samples()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/program.rs"]
mod tests;
