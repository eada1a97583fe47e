//! Flat CSV exports of run logs.

use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::StimResult;
use crate::sensor::motion::SensorSample;
use crate::sequence::log::EventLogEntry;

/// Header row of the sequencing event log.
pub const EVENT_CSV_HEADER: &str = "Event,ID,AbsoluteStart,AbsoluteEnd,Duration";
/// Header row of the sensor sample log.
pub const SENSOR_CSV_HEADER: &str = "AbsoluteTime,DirY";

fn csv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(out)
}

/// Write sequencing events as CSV.
pub fn write_event_csv<W: Write>(out: W, entries: &[EventLogEntry]) -> StimResult<()> {
    let mut writer = csv_writer(out);
    writer
        .write_record(EVENT_CSV_HEADER.split(','))
        .context("write event csv header")?;
    for e in entries {
        writer
            .write_record([
                e.kind.as_str().to_owned(),
                e.id.to_string(),
                e.start.to_string(),
                e.end.to_string(),
                e.duration.to_string(),
            ])
            .context("write event csv row")?;
    }
    writer.flush().context("flush event csv")?;
    Ok(())
}

/// Write sensor samples as CSV.
pub fn write_sensor_csv<W: Write>(out: W, samples: &[SensorSample]) -> StimResult<()> {
    let mut writer = csv_writer(out);
    writer
        .write_record(SENSOR_CSV_HEADER.split(','))
        .context("write sensor csv header")?;
    for s in samples {
        writer
            .write_record([s.absolute_time.to_string(), s.dir_y.to_string()])
            .context("write sensor csv row")?;
    }
    writer.flush().context("flush sensor csv")?;
    Ok(())
}

fn create(path: &Path) -> StimResult<std::io::BufWriter<std::fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file =
        std::fs::File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    Ok(std::io::BufWriter::new(file))
}

/// Write sequencing events to `path`, creating parent directories.
pub fn save_event_csv(path: &Path, entries: &[EventLogEntry]) -> StimResult<()> {
    write_event_csv(create(path)?, entries)
}

/// Write sensor samples to `path`, creating parent directories.
pub fn save_sensor_csv(path: &Path, samples: &[SensorSample]) -> StimResult<()> {
    write_sensor_csv(create(path)?, samples)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
