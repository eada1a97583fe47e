use crate::sensor::record::PoseDelta;

/// One accepted motion sample, exported as `AbsoluteTime,DirY`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SensorSample {
    /// Absolute time the sample was applied.
    #[serde(rename = "AbsoluteTime")]
    pub absolute_time: f64,
    /// Angular shift contributed by this sample (degrees).
    #[serde(rename = "DirY")]
    pub dir_y: f64,
}

/// Turns tracker deltas into an accumulated stimulus rotation.
///
/// `shift = degrees(dy) * gain * resolution_scale`. A record whose counter matches the last
/// applied one is stale (the tracker has not written since) and contributes nothing.
#[derive(Clone, Debug)]
pub struct MotionIntegrator {
    gain: f64,
    resolution_scale: f64,
    offset_deg: f64,
    last_sequence: Option<u64>,
    samples: Vec<SensorSample>,
}

impl MotionIntegrator {
    /// Integrator with the given closed-loop gain and degree-to-column scale.
    pub fn new(gain: f64, resolution_scale: f64) -> Self {
        Self {
            gain,
            resolution_scale,
            offset_deg: 0.0,
            last_sequence: None,
            samples: Vec::new(),
        }
    }

    /// Running absolute offset in degrees.
    pub fn offset_deg(&self) -> f64 {
        self.offset_deg
    }

    /// Apply one delta at absolute time `now`. Returns the shift applied, or `None` when the
    /// record was stale.
    pub fn apply(&mut self, delta: &PoseDelta, now: f64) -> Option<f64> {
        if self.last_sequence == Some(delta.sequence_id) {
            return None;
        }
        self.last_sequence = Some(delta.sequence_id);
        let shift = delta.dy.to_degrees() * self.gain * self.resolution_scale;
        self.offset_deg += shift;
        self.samples.push(SensorSample {
            absolute_time: now,
            dir_y: shift,
        });
        Some(shift)
    }

    /// Samples applied so far.
    pub fn samples(&self) -> &[SensorSample] {
        &self.samples
    }

    /// Move the sample log out.
    pub fn take_samples(&mut self) -> Vec<SensorSample> {
        std::mem::take(&mut self.samples)
    }

    /// Zero the offset and forget history.
    pub fn reset(&mut self) {
        self.offset_deg = 0.0;
        self.last_sequence = None;
        self.samples.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sensor/motion.rs"]
mod tests;
