use std::rc::Rc;

use crate::config::model::{ExperimentConfig, ProgramConfig};
use crate::foundation::clock::ClockHandle;
use crate::foundation::core::Fps;
use crate::foundation::error::StimResult;
use crate::generator::clip::{ClipGenerator, ImageSequenceSource};
use crate::generator::edge::MovingEdge;
use crate::generator::looming::LoomingDisk;
use crate::generator::noise::NoiseGenerator;
use crate::generator::still::StillGenerator;
use crate::geometry::equirect::EquirectGeometry;
use crate::geometry::stage::{StageOpts, TransformStage};
use crate::present::presenter::PresenterOpts;
use crate::present::program::{
    ClosedLoopOpts, ClosedLoopProgram, GeneratorProgram, Program, RotationProgram,
};
use crate::sensor::link::{SensorLink, ShmSensorLink};
use crate::sequence::scene::SceneSpec;
use crate::sequence::sequencer::SceneSequencer;

/// Everything a [`Presenter`](crate::Presenter) needs besides the sink and the clock.
pub struct RunPlan {
    /// What to present.
    pub program: Box<dyn Program>,
    /// Geometry applied to every produced texture.
    pub stage: TransformStage,
    /// Loop timing.
    pub opts: PresenterOpts,
}

impl std::fmt::Debug for RunPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunPlan")
            .field("program", &self.program.name())
            .field("stage", &self.stage)
            .field("opts", &self.opts)
            .finish()
    }
}

impl ExperimentConfig {
    /// Validate and assemble the run. Closed-loop programs open the configured shared-memory
    /// region.
    pub fn build(&self, clock: &ClockHandle) -> StimResult<RunPlan> {
        self.build_with_link(clock, None)
    }

    /// Like [`ExperimentConfig::build`], but a closed-loop program reads from `link` when given.
    #[tracing::instrument(level = "debug", skip(self, clock, link), fields(program = self.program.kind()))]
    pub fn build_with_link(
        &self,
        clock: &ClockHandle,
        link: Option<Box<dyn SensorLink>>,
    ) -> StimResult<RunPlan> {
        self.validate()?;
        let canvas = self.display.canvas;
        let geometry = EquirectGeometry::new(canvas, self.display.fov)?;
        let stage = TransformStage::new(
            Box::new(geometry),
            StageOpts {
                rot_offset: self.display.rot_offset,
                inverted: self.display.inverted,
            },
        );
        let mut opts = PresenterOpts::new(Fps::hz(self.frame_rate)?);
        opts.duration = self.duration;
        opts.hold_wait_ms = self.pacing.hold_wait_ms;
        opts.brackets = self.pacing.brackets;
        opts.blank_secs = self.pacing.blank_secs;
        opts.marker_ms = self.pacing.marker_ms;

        let program: Box<dyn Program> = match &self.program {
            ProgramConfig::Sequence { timing, scenes } => {
                let specs = scenes
                    .iter()
                    .enumerate()
                    .map(|(i, scene)| {
                        let label = scene.label.clone().unwrap_or_else(|| format!("scene{i}"));
                        Ok(SceneSpec::new(
                            label,
                            scene.foreground.render(canvas)?,
                            scene.background.render(canvas)?,
                        ))
                    })
                    .collect::<StimResult<Vec<_>>>()?;
                Box::new(SceneSequencer::new(Rc::from(specs), timing.clone())?)
            }
            ProgramConfig::ClosedLoop {
                texture,
                region,
                record,
                region_bytes,
                gain,
                resolution_scale,
                roll_coupling,
                pitch_coupling,
            } => {
                let link = match link {
                    Some(link) => link,
                    None => {
                        let shm = ShmSensorLink::new(region, record.clone(), *region_bytes);
                        tracing::info!(path = %shm.path().display(), "reading tracker region");
                        Box::new(shm) as Box<dyn SensorLink>
                    }
                };
                let cl = ClosedLoopOpts {
                    gain: *gain,
                    resolution_scale: *resolution_scale,
                    roll_coupling: *roll_coupling,
                    pitch_coupling: *pitch_coupling,
                    degraded_wait_ms: self.pacing.degraded_wait_ms,
                };
                Box::new(ClosedLoopProgram::new(link, texture.render(canvas)?, cl))
            }
            ProgramConfig::Rotation { texture, speed } => {
                Box::new(RotationProgram::new(texture.render(canvas)?, *speed))
            }
            ProgramConfig::Still { texture } => Box::new(GeneratorProgram::new(
                "still",
                StillGenerator::from_texture(texture, canvas)?,
                (),
            )),
            ProgramConfig::Looming { params, center_deg } => Box::new(GeneratorProgram::new(
                "looming",
                LoomingDisk::new(clock.clone(), canvas, center_deg.map(|[az, el]| (az, el))),
                *params,
            )),
            ProgramConfig::Noise {
                block_deg,
                rate_hz,
                seed,
            } => Box::new(GeneratorProgram::new(
                "noise",
                NoiseGenerator::new(
                    clock.clone(),
                    canvas,
                    self.display.fov,
                    *block_deg,
                    Fps::hz(*rate_hz)?,
                    *seed,
                )?,
                (),
            )),
            ProgramConfig::Edge {
                params,
                color1,
                color2,
            } => Box::new(GeneratorProgram::new(
                "edge",
                MovingEdge::new(clock.clone(), canvas, *color1, *color2),
                *params,
            )),
            ProgramConfig::Clip { dir, rate_hz } => {
                let source = ImageSequenceSource::open(dir)?;
                let clip = ClipGenerator::new(
                    clock.clone(),
                    Box::new(source),
                    Fps::hz(*rate_hz)?,
                    canvas,
                );
                if opts.duration.is_none() {
                    opts.duration = clip.natural_duration();
                }
                Box::new(GeneratorProgram::new("clip", clip, ()))
            }
        };

        Ok(RunPlan {
            program,
            stage,
            opts,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/build.rs"]
mod tests;
