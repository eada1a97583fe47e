use std::rc::Rc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::Frame;
use crate::foundation::rng::Rng64;
use crate::sequence::log::{EventKind, EventLog, EventLogEntry};
use crate::sequence::scene::SceneSpec;
use crate::sequence::state::SequencerState;

fn default_sides() -> u32 {
    2
}

fn default_origin_px() -> f64 {
    1.0
}

/// Timing of a loop/scene/side run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceConfig {
    /// Seconds per side (one sweep of the foreground).
    pub side_duration: f64,
    /// Sides per scene; even sides sweep left, odd sides sweep right.
    #[serde(default = "default_sides")]
    pub sides_per_scene: u32,
    /// Blank interval at the start of every scene, in seconds.
    #[serde(default)]
    pub break_duration: f64,
    /// Index of the last loop; `0` runs a single loop.
    #[serde(default)]
    pub iterations: u32,
    /// Sweep amplitude in degrees of azimuth.
    #[serde(default)]
    pub bounce_deg: f64,
    /// Sweep centre offset in pixels. Defaults to 1 px, the rig's calibrated centre.
    #[serde(default = "default_origin_px")]
    pub origin_px: f64,
    /// Draw scenes in random order instead of sequentially.
    #[serde(default)]
    pub randomize: bool,
    /// Seed for randomised scene order.
    #[serde(default)]
    pub seed: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            side_duration: 1.0,
            sides_per_scene: default_sides(),
            break_duration: 0.0,
            iterations: 0,
            bounce_deg: 0.0,
            origin_px: default_origin_px(),
            randomize: false,
            seed: 0,
        }
    }
}

impl SequenceConfig {
    /// Check durations and counts.
    pub fn validate(&self) -> StimResult<()> {
        if !(self.side_duration.is_finite() && self.side_duration > 0.0) {
            return Err(StimError::config("side_duration must be > 0"));
        }
        if self.sides_per_scene == 0 {
            return Err(StimError::config("sides_per_scene must be >= 1"));
        }
        if !(self.break_duration.is_finite() && self.break_duration >= 0.0) {
            return Err(StimError::config("break_duration must be >= 0"));
        }
        if !self.bounce_deg.is_finite() || !self.origin_px.is_finite() {
            return Err(StimError::config("bounce_deg and origin_px must be finite"));
        }
        Ok(())
    }
}

/// Result of one sequencer evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceTick {
    /// A side is active; the composed texture.
    Scene(Frame),
    /// Inside the inter-scene break; show a blank texture.
    Break,
    /// A transition happened this tick; keep showing the previous output.
    Unchanged,
    /// All iterations are done.
    Finished,
}

/// Hierarchical loop/scene/side state machine.
///
/// Evaluated once per Advance tick with the absolute time of the tick. Every completed side, scene
/// and loop is appended to an [`EventLog`] that survives cancellation.
#[derive(Clone, Debug)]
pub struct SceneSequencer {
    scenes: Rc<[SceneSpec]>,
    config: SequenceConfig,
    canvas: Canvas,
    bounce_px: f64,
    rng: Rng64,
    state: SequencerState,
    log: EventLog,
}

impl SceneSequencer {
    /// Sequencer over `scenes`. Fails on an empty scene list or textures of differing shape.
    pub fn new(scenes: Rc<[SceneSpec]>, config: SequenceConfig) -> StimResult<Self> {
        config.validate()?;
        let first = scenes
            .first()
            .ok_or_else(|| StimError::config("scene list must not be empty"))?;
        for scene in scenes.iter() {
            if !scene.foreground.same_shape(&first.foreground)
                || !scene.background.same_shape(&first.foreground)
            {
                return Err(StimError::config(format!(
                    "scene '{}' textures differ in shape from scene '{}'",
                    scene.label, first.label
                )));
            }
        }
        let canvas = first.foreground.canvas();
        Ok(Self {
            bounce_px: config.bounce_deg * canvas.px_per_deg_x(),
            rng: Rng64::new(config.seed),
            canvas,
            scenes,
            config,
            state: SequencerState::initial(),
            log: EventLog::new(),
        })
    }

    /// Timing configuration.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Texture dimensions shared by every scene.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of scenes per loop.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Current state snapshot.
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    /// Transitions recorded so far.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Move the recorded transitions out.
    pub fn take_log(&mut self) -> Vec<EventLogEntry> {
        self.log.take()
    }

    /// `true` once the loop index has passed the configured iterations.
    pub fn is_finished(&self) -> bool {
        self.state.loop_index > self.config.iterations
    }

    /// Return to the initial state, clearing the log and reseeding the scene order.
    pub fn reset(&mut self) {
        self.state = SequencerState::initial();
        self.log = EventLog::new();
        self.rng = Rng64::new(self.config.seed);
    }

    fn first_scene(&mut self) -> usize {
        if self.config.randomize {
            self.rng.below(self.scenes.len())
        } else {
            0
        }
    }

    fn next_scene(&mut self) -> usize {
        if self.config.randomize {
            self.rng.below(self.scenes.len())
        } else {
            self.state.scene_index + 1
        }
    }

    /// Evaluate the state machine at absolute time `now`.
    pub fn tick(&mut self, now: f64) -> StimResult<SequenceTick> {
        if self.is_finished() {
            return Ok(SequenceTick::Finished);
        }

        if self.state.new_loop {
            let first = self.first_scene();
            let s = &mut self.state;
            s.loop_start = now;
            s.scene_index = first;
            s.scenes_completed = 0;
            s.new_scene = true;
            s.new_loop = false;
            tracing::debug!(loop_index = s.loop_index, "loop started");
        }

        if self.state.new_scene {
            let s = &mut self.state;
            s.scene_start = now;
            s.side_index = 0;
            s.new_scene = false;
            tracing::debug!(
                scene = %self.scenes[s.scene_index].label,
                scene_index = s.scene_index,
                "scene started"
            );
        }

        let scene_elapsed = now - self.state.scene_start - self.config.break_duration;
        if scene_elapsed < 0.0 {
            self.state.in_break = true;
            return Ok(SequenceTick::Break);
        }
        if self.state.in_break {
            self.state.new_side = true;
            self.state.in_break = false;
        }
        if self.state.new_side {
            self.state.side_start = now;
            self.state.new_side = false;
        }

        let side_elapsed = now - self.state.side_start;
        if side_elapsed >= self.config.side_duration {
            let s = &mut self.state;
            self.log
                .record(EventKind::Side, u64::from(s.side_index), s.side_start, now);
            s.new_side = true;
            s.side_index += 1;
        }

        if self.state.side_index == self.config.sides_per_scene {
            let next = self.next_scene();
            let s = &mut self.state;
            self.log
                .record(EventKind::Scene, s.scene_index as u64, s.scene_start, now);
            s.new_scene = true;
            s.side_index = 0;
            s.scenes_completed += 1;
            s.scene_index = next;
        }

        if self.state.scenes_completed >= self.scenes.len() {
            let s = &mut self.state;
            self.log
                .record(EventKind::Loop, u64::from(s.loop_index), s.loop_start, now);
            s.new_loop = true;
            s.loop_index += 1;
        }

        let s = &self.state;
        if s.new_scene || s.new_side || s.new_loop {
            return Ok(SequenceTick::Unchanged);
        }

        let p = (side_elapsed / self.config.side_duration).clamp(0.0, 1.0);
        let direction = if s.side_index % 2 == 0 { -1.0 } else { 1.0 };
        let start = self.config.origin_px - direction * self.bounce_px / 2.0;
        let shift = start + p * self.bounce_px * direction;
        let scene = &self.scenes[s.scene_index];
        (scene.composer)(&scene.foreground, &scene.background, shift).map(SequenceTick::Scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
