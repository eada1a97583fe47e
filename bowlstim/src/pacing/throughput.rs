/// Shortest tick duration used when computing instantaneous rates.
pub const MIN_TICK_SECS: f64 = 1.0e-6;

/// Post-run throughput summary.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ThroughputReport {
    /// Number of recorded tick samples.
    pub samples: usize,
    /// Mean instantaneous rate, `None` when nothing was recorded.
    pub mean_fps: Option<f64>,
}

impl ThroughputReport {
    /// Human-readable one-liner.
    pub fn summary(&self) -> String {
        match self.mean_fps {
            Some(fps) => format!("mean fps {fps:.2} over {} ticks", self.samples),
            None => "no frames recorded".to_string(),
        }
    }
}

/// Samples tick-to-tick durations from high-resolution timestamps.
#[derive(Clone, Debug, Default)]
pub struct ThroughputMeter {
    last_mark: Option<f64>,
    samples: Vec<f64>,
}

impl ThroughputMeter {
    /// Empty meter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current tick at `now`. The instantaneous rate is returned and, when `record`
    /// is set, kept for the report. The first mark only sets the reference timestamp.
    /// Zero-length ticks are clamped to [`MIN_TICK_SECS`].
    pub fn mark(&mut self, now: f64, record: bool) -> Option<f64> {
        let prev = self.last_mark.replace(now)?;
        let dt = (now - prev).max(MIN_TICK_SECS);
        let fps = 1.0 / dt;
        if record {
            self.samples.push(fps);
        }
        Some(fps)
    }

    /// Recorded instantaneous rates.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean of recorded rates.
    pub fn report(&self) -> ThroughputReport {
        let mean_fps = if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        };
        ThroughputReport {
            samples: self.samples.len(),
            mean_fps,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pacing/throughput.rs"]
mod tests;
