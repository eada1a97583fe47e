/// Header token written by the tracker at the start of every record.
pub const DEFAULT_TAG: &str = "FT";
/// A record must carry strictly more tokens than this to be trusted.
pub const DEFAULT_MIN_TOKENS: usize = 24;

/// Incremental motion estimate decoded from one tracker record.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PoseDelta {
    /// Tracker frame counter.
    pub sequence_id: u64,
    /// Rotation delta about the camera x axis (radians).
    pub dx: f64,
    /// Rotation delta about the camera y axis (radians).
    pub dy: f64,
    /// Rotation delta about the camera z axis (radians).
    pub dz: f64,
}

/// Structural rules a record must satisfy before any field is trusted.
///
/// The channel is unsynchronised, so a read can observe a torn or half-written record; the
/// header and token-count checks reject those.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordFormat {
    /// Expected first token.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Minimum token count (exclusive).
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_min_tokens() -> usize {
    DEFAULT_MIN_TOKENS
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            min_tokens: default_min_tokens(),
        }
    }
}

impl RecordFormat {
    /// Decode one text record. Anything malformed yields `None`.
    ///
    /// Layout: `TAG, counter, d1, d2, d3, ...`; only the counter and the three deltas are read.
    pub fn parse(&self, raw: &str) -> Option<PoseDelta> {
        let tokens: Vec<&str> = raw.trim().split(',').map(str::trim).collect();
        if tokens.len() <= self.min_tokens || tokens.len() < 5 || tokens[0] != self.tag {
            return None;
        }
        let sequence_id = tokens[1].parse::<u64>().ok()?;
        let dx = parse_finite(tokens[2])?;
        let dy = parse_finite(tokens[3])?;
        let dz = parse_finite(tokens[4])?;
        Some(PoseDelta {
            sequence_id,
            dx,
            dy,
            dz,
        })
    }
}

fn parse_finite(tok: &str) -> Option<f64> {
    tok.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract the first newline-terminated record from a raw region snapshot. Trailing NUL padding
/// is dropped; non UTF-8 content yields `None`.
pub fn first_record(region: &[u8]) -> Option<&str> {
    let end = region
        .iter()
        .position(|&b| b == b'\n' || b == 0)
        .unwrap_or(region.len());
    let line = std::str::from_utf8(&region[..end]).ok()?.trim();
    if line.is_empty() { None } else { Some(line) }
}

#[cfg(test)]
#[path = "../../tests/unit/sensor/record.rs"]
mod tests;
