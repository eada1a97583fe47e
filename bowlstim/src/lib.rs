//! Bowlstim is a closed-loop visual stimulus presentation engine for behavioural rigs.
//!
//! A run is a single-threaded loop:
//!
//! - Load and validate an [`ExperimentConfig`] and [`build`](ExperimentConfig::build) a [`RunPlan`]
//! - Wrap it in a [`Presenter`] together with an [`OutputSink`] and a [`ClockHandle`]
//! - Drive it with [`Presenter::run`], or tick it from an external display loop
//!
//! Programs produce equirectangular textures (sequenced scenes, tracker-driven rotation,
//! generators); the [`TransformStage`] maps them onto the display.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod config;
/// CSV exports of event and sensor logs.
pub mod export;
pub(crate) mod generator;
pub(crate) mod geometry;
pub(crate) mod pacing;
pub(crate) mod present;
pub(crate) mod sensor;
pub(crate) mod sequence;

pub use crate::foundation::clock::{
    ClockHandle, ClockState, ManualClock, SystemClock, TimeSource, Timebase,
};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rotation};
pub use crate::foundation::error::{StimError, StimResult};
pub use crate::foundation::frame::{Channels, Frame, TRANSPARENT};
pub use crate::foundation::rng::Rng64;

pub use crate::config::build::RunPlan;
pub use crate::config::model::{
    DisplayConfig, ExperimentConfig, Overrides, PacingConfig, ProgramConfig, SceneConfig,
};
pub use crate::generator::api::Generator;
pub use crate::generator::clip::{ClipGenerator, ClipSource, ImageSequenceSource, MemoryClipSource};
pub use crate::generator::edge::{EdgeParams, MovingEdge};
pub use crate::generator::looming::{LoomingDisk, LoomingParams, angular_radius_deg};
pub use crate::generator::noise::{DEFAULT_NOISE_HZ, NoiseGenerator};
pub use crate::generator::still::StillGenerator;
pub use crate::generator::texture::TextureSpec;
pub use crate::geometry::equirect::{EquirectGeometry, FieldOfView};
pub use crate::geometry::stage::{Geometry, StageOpts, TransformStage};
pub use crate::pacing::pacer::{FramePacer, PaceDecision};
pub use crate::pacing::throughput::{MIN_TICK_SECS, ThroughputMeter, ThroughputReport};
pub use crate::present::presenter::{
    MARKER_LEVEL, Presenter, PresenterOpts, RunReport, TickOutcome, TickStatus, sync_marker,
};
pub use crate::present::program::{
    ClosedLoopOpts, ClosedLoopProgram, DEFAULT_DEGRADED_WAIT_MS, GeneratorProgram, Program,
    RotationProgram, Step,
};
pub use crate::present::sink::{HeadlessSink, OutputSink, PngSequenceSink, StopCondition};
pub use crate::sensor::link::{
    DEFAULT_REGION_BYTES, ScriptedSensorLink, SensorLink, ShmSensorLink, resolve_region_path,
};
pub use crate::sensor::motion::{MotionIntegrator, SensorSample};
pub use crate::sensor::record::{
    DEFAULT_MIN_TOKENS, DEFAULT_TAG, PoseDelta, RecordFormat, first_record,
};
pub use crate::sequence::log::{EventKind, EventLog, EventLogEntry};
pub use crate::sequence::scene::{Composer, SceneSpec, compose_shifted};
pub use crate::sequence::sequencer::{SceneSequencer, SequenceConfig, SequenceTick};
pub use crate::sequence::state::SequencerState;
