use crate::foundation::clock::{ClockHandle, ClockState};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{StimError, StimResult};
use crate::foundation::frame::Frame;
use crate::geometry::stage::TransformStage;
use crate::pacing::pacer::{FramePacer, PaceDecision};
use crate::pacing::throughput::{ThroughputMeter, ThroughputReport};
use crate::present::program::Program;
use crate::present::sink::OutputSink;
use crate::sensor::motion::SensorSample;
use crate::sequence::log::EventLogEntry;

/// Intensity of the synchronisation marker square.
pub const MARKER_LEVEL: u8 = 128;

/// Synchronisation marker: black frame with a 40 px mid-grey square 5 px in from the
/// bottom-right corner.
pub fn sync_marker(canvas: Canvas) -> Frame {
    let mut f = Frame::black_rgb(canvas);
    let (w, h) = (i64::from(canvas.width), i64::from(canvas.height));
    f.fill_rect(w - 45, h - 45, w - 5, h - 5, MARKER_LEVEL);
    f
}

/// Timing knobs of a presentation run.
#[derive(Clone, Debug, PartialEq)]
pub struct PresenterOpts {
    /// Outer loop rate.
    pub frame_rate: Fps,
    /// Run length in seconds; `None` runs until the program finishes or the user cancels.
    pub duration: Option<f64>,
    /// Wait after a regular tick.
    pub hold_wait_ms: u32,
    /// Show the leading and trailing synchronisation brackets.
    pub brackets: bool,
    /// Length of each blanking interval in a bracket.
    pub blank_secs: f64,
    /// How long a marker stays up.
    pub marker_ms: u32,
}

impl PresenterOpts {
    /// Defaults for `frame_rate`: 1 ms hold wait, brackets on, 0.1 s blanks, 30 ms markers.
    pub fn new(frame_rate: Fps) -> Self {
        Self {
            frame_rate,
            duration: None,
            hold_wait_ms: 1,
            brackets: true,
            blank_secs: 0.1,
            marker_ms: 30,
        }
    }
}

/// What the caller should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Wait, then tick again.
    Continue,
    /// The program finished or the run duration elapsed.
    Finished,
    /// The sink reported a cancellation request.
    Cancelled,
}

/// Result of [`Presenter::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Milliseconds to wait before the next tick.
    pub wait_ms: u32,
    /// Whether to keep going.
    pub status: TickStatus,
}

impl TickOutcome {
    /// `true` when the user cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == TickStatus::Cancelled
    }
}

/// Summary of a finished (or cancelled) run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Program that ran.
    pub program: &'static str,
    /// Logical frames advanced.
    pub frames: FrameIndex,
    /// Loop iterations, including hold ticks.
    pub ticks: u64,
    /// Seconds from run start to the last tick.
    pub elapsed: f64,
    /// Mean frame rate over healthy ticks.
    pub throughput: ThroughputReport,
    /// The run ended by user request.
    pub cancelled: bool,
    /// Sequencing transitions.
    pub events: Vec<EventLogEntry>,
    /// Applied tracker samples.
    pub sensor_samples: Vec<SensorSample>,
}

/// Single-threaded presentation loop: pace, step the program, transform, present, poll.
///
/// Drive it with [`Presenter::run`], or call [`Presenter::begin`], [`Presenter::tick`] and
/// [`Presenter::finish`] from an external loop that owns the waiting.
pub struct Presenter<S: OutputSink> {
    program: Box<dyn Program>,
    stage: TransformStage,
    sink: S,
    state: ClockState,
    opts: PresenterOpts,
    pacer: FramePacer,
    meter: ThroughputMeter,
    ticks: u64,
    healthy: bool,
    cancelled: bool,
    closed: bool,
}

impl<S: OutputSink> std::fmt::Debug for Presenter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("program", &self.program.name())
            .field("opts", &self.opts)
            .field("ticks", &self.ticks)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

impl<S: OutputSink> Presenter<S> {
    /// Assemble a run.
    pub fn new(
        program: Box<dyn Program>,
        stage: TransformStage,
        sink: S,
        clock: ClockHandle,
        opts: PresenterOpts,
    ) -> Self {
        Self {
            program,
            stage,
            sink,
            state: ClockState::new(clock),
            pacer: FramePacer::new(opts.frame_rate),
            opts,
            meter: ThroughputMeter::new(),
            ticks: 0,
            healthy: true,
            cancelled: false,
            closed: false,
        }
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the presenter and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> FrameIndex {
        self.pacer.frames_emitted()
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn show(&mut self, frame: &Frame, ms: u32) -> StimResult<()> {
        self.sink.present(frame)?;
        self.sink.wait(ms)
    }

    fn blank_ms(&self) -> u32 {
        (self.opts.blank_secs * 1000.0).round() as u32
    }

    /// Leading bracket (marker, blank, blank, marker), then reset the clock and the program.
    #[tracing::instrument(level = "info", skip(self), fields(program = self.program.name()))]
    pub fn begin(&mut self) -> StimResult<()> {
        if self.opts.brackets {
            let canvas = self.stage.output_canvas();
            let marker = sync_marker(canvas);
            let blank = Frame::black_rgb(canvas);
            let (marker_ms, blank_ms) = (self.opts.marker_ms, self.blank_ms());
            self.show(&marker, marker_ms)?;
            self.show(&blank, blank_ms)?;
            self.show(&blank, blank_ms)?;
            self.show(&marker, marker_ms)?;
        }
        let start = self.state.reset();
        self.pacer.reset();
        // The first tick only sets the meter's reference timestamp.
        self.meter = ThroughputMeter::new();
        self.ticks = 0;
        self.healthy = true;
        self.cancelled = false;
        self.program.start(start)?;
        tracing::info!(run_start = start, "run started");
        Ok(())
    }

    /// One loop iteration. Presents exactly one frame unless the run is already over.
    pub fn tick(&mut self) -> StimResult<TickOutcome> {
        let clock = self.state.clock().clone();
        let now = clock.update();
        let elapsed = clock.elapsed();
        let finished = |status| TickOutcome {
            wait_ms: 0,
            status,
        };
        if self.cancelled {
            return Ok(finished(TickStatus::Cancelled));
        }
        if self.program.is_finished() || self.opts.duration.is_some_and(|d| elapsed >= d) {
            return Ok(finished(TickStatus::Finished));
        }

        let mut wait_ms = self.opts.hold_wait_ms;
        let was_healthy = self.healthy;
        let decision = self.pacer.decide(elapsed, self.state.last_frame().is_some());
        clock.set_frame_index(self.pacer.frames_emitted());
        if decision == PaceDecision::Advance {
            let step = self.program.step(now)?;
            self.healthy = step.healthy;
            if let Some(ms) = step.wait_ms {
                wait_ms = ms;
            }
            if let Some(frame) = step.frame {
                let out = self.stage.apply(&frame, step.rotation)?;
                self.state.set_last_frame(out);
            }
        }

        if let Some(frame) = self.state.last_frame() {
            self.sink.present(frame)?;
        }
        // An interval that spans a degraded tick is not a frame-rate sample.
        self.meter.mark(clock.now(), self.healthy && was_healthy);
        self.ticks += 1;

        if self.sink.poll_cancel() {
            self.cancelled = true;
            tracing::info!(ticks = self.ticks, "run cancelled");
            return Ok(finished(TickStatus::Cancelled));
        }
        if self.program.is_finished() {
            return Ok(finished(TickStatus::Finished));
        }
        Ok(TickOutcome {
            wait_ms,
            status: TickStatus::Continue,
        })
    }

    /// Trailing bracket (skipped after cancellation), close the sink and collect the logs.
    pub fn finish(&mut self) -> StimResult<RunReport> {
        if self.closed {
            return Err(StimError::sink("run already finished"));
        }
        if self.opts.brackets && !self.cancelled {
            let canvas = self.stage.output_canvas();
            let blank_ms = self.blank_ms();
            self.show(&sync_marker(canvas), self.opts.marker_ms)?;
            self.show(&Frame::black_rgb(canvas), blank_ms)?;
        }
        self.closed = true;
        self.sink.close()?;

        let report = RunReport {
            program: self.program.name(),
            frames: self.pacer.frames_emitted(),
            ticks: self.ticks,
            elapsed: self.state.clock().elapsed(),
            throughput: self.meter.report(),
            cancelled: self.cancelled,
            events: self.program.take_events(),
            sensor_samples: self.program.take_sensor_samples(),
        };
        tracing::info!(
            frames = report.frames.0,
            ticks = report.ticks,
            cancelled = report.cancelled,
            "{}",
            report.throughput.summary()
        );
        Ok(report)
    }

    /// Run to completion or cancellation, waiting on the sink between ticks.
    pub fn run(&mut self) -> StimResult<RunReport> {
        if let Err(err) = self.begin().and_then(|()| self.run_ticks()) {
            self.closed = true;
            if let Err(close_err) = self.sink.close() {
                tracing::warn!(error = %close_err, "sink close failed after error");
            }
            return Err(err);
        }
        self.finish()
    }

    fn run_ticks(&mut self) -> StimResult<()> {
        loop {
            let outcome = self.tick()?;
            match outcome.status {
                TickStatus::Continue => self.sink.wait(outcome.wait_ms)?,
                TickStatus::Finished | TickStatus::Cancelled => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/presenter.rs"]
mod tests;
