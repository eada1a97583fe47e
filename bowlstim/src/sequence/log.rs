/// Kind of unit an [`EventLogEntry`] closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One side (sweep direction) of a scene.
    Side,
    /// One scene: break plus all of its sides.
    Scene,
    /// One pass over every scene.
    Loop,
}

impl EventKind {
    /// Lower-case name used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Scene => "scene",
            Self::Loop => "loop",
        }
    }
}

/// A completed side, scene or loop with absolute timestamps in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventLogEntry {
    /// Unit kind.
    pub kind: EventKind,
    /// Side, scene or loop index.
    pub id: u64,
    /// Absolute start time.
    pub start: f64,
    /// Absolute end time.
    pub end: f64,
    /// `end - start`.
    pub duration: f64,
}

/// Append-only transition log of a sequencing run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed unit.
    pub fn record(&mut self, kind: EventKind, id: u64, start: f64, end: f64) {
        let entry = EventLogEntry {
            kind,
            id,
            start,
            end,
            duration: end - start,
        };
        tracing::debug!(
            kind = kind.as_str(),
            id,
            duration = entry.duration,
            "sequence unit completed"
        );
        self.entries.push(entry);
    }

    /// Entries in emission order.
    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    /// Number of entries of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move all entries out, leaving the log empty.
    pub fn take(&mut self) -> Vec<EventLogEntry> {
        std::mem::take(&mut self.entries)
    }
}
