use std::collections::VecDeque;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::sensor::record::{PoseDelta, RecordFormat, first_record};

/// Minimum size of the tracker's shared-memory region.
pub const DEFAULT_REGION_BYTES: usize = 1024;

/// Directory backing POSIX named shared memory.
const SHM_ROOT: &str = "/dev/shm";

/// Source of live pose deltas.
///
/// `poll` never blocks for long and never fails: any IO or format problem is reported as `None`,
/// meaning "tracker disconnected this tick". There is no reconnect handshake.
pub trait SensorLink {
    /// Latest pose delta, or `None` when the channel is absent or the record is invalid.
    fn poll(&mut self) -> Option<PoseDelta>;
}

impl<L: SensorLink + ?Sized> SensorLink for Box<L> {
    fn poll(&mut self) -> Option<PoseDelta> {
        (**self).poll()
    }
}

/// Reads the tracker's record from a named shared-memory region.
///
/// The region is a plain file under `/dev/shm` (or any explicit path), re-opened on every poll so
/// a tracker that starts late, restarts, or disappears is picked up without extra state.
#[derive(Debug)]
pub struct ShmSensorLink {
    path: PathBuf,
    format: RecordFormat,
    region_bytes: usize,
    buf: Vec<u8>,
}

impl ShmSensorLink {
    /// Link to region `name`. Opening is deferred to [`SensorLink::poll`].
    pub fn new(name: &str, format: RecordFormat, region_bytes: usize) -> Self {
        Self {
            path: resolve_region_path(name),
            format,
            region_bytes: region_bytes.max(1),
            buf: Vec::with_capacity(region_bytes),
        }
    }

    /// Filesystem path backing the region.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_region(&mut self) -> std::io::Result<()> {
        self.buf.clear();
        let f = std::fs::File::open(&self.path)?;
        f.take(self.region_bytes as u64).read_to_end(&mut self.buf)?;
        Ok(())
    }
}

impl SensorLink for ShmSensorLink {
    fn poll(&mut self) -> Option<PoseDelta> {
        if let Err(e) = self.read_region() {
            tracing::debug!(path = %self.path.display(), error = %e, "sensor region unreadable");
            return None;
        }
        let Some(line) = first_record(&self.buf) else {
            tracing::debug!(path = %self.path.display(), "sensor region holds no record");
            return None;
        };
        let delta = self.format.parse(line);
        if delta.is_none() {
            tracing::debug!(record = line, "sensor record rejected");
        }
        delta
    }
}

/// Map a region name to its backing file: bare names live under `/dev/shm`, anything containing
/// a path separator is used as-is.
pub fn resolve_region_path(name: &str) -> PathBuf {
    let p = Path::new(name);
    if p.is_absolute() || name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
        p.to_path_buf()
    } else {
        Path::new(SHM_ROOT).join(name)
    }
}

/// Replays a fixed list of raw records, one per poll. `None` entries and an exhausted script
/// behave like a disconnected tracker.
#[derive(Debug, Default)]
pub struct ScriptedSensorLink {
    format: RecordFormat,
    records: VecDeque<Option<String>>,
    polls: u64,
}

impl ScriptedSensorLink {
    /// Script of raw records (`None` = nothing readable that tick).
    pub fn new(format: RecordFormat, records: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            format,
            records: records.into_iter().collect(),
            polls: 0,
        }
    }

    /// Number of polls served so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Records still queued.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl SensorLink for ScriptedSensorLink {
    fn poll(&mut self) -> Option<PoseDelta> {
        self.polls += 1;
        let raw = self.records.pop_front()??;
        self.format.parse(&raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sensor/link.rs"]
mod tests;
