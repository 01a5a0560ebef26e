use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

use crate::policy::{ControllerMode, ModeParseError};
use crate::scenario::{Cycle, Scenario};
use crate::sim::CycleRecord;

/// Header expected on the first non-comment line of a trace.
pub const TRACE_HEADER: &str = "mode,cruise_speed,vehicle_speed,accelerator";

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),
    #[error("trace is missing the mode,cruise_speed,vehicle_speed,accelerator header")]
    MissingHeader,
    #[error("line {line}: expected 4 columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}: {column} is not a number: {value:?}")]
    Number {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: {source}")]
    Mode {
        line: usize,
        #[source]
        source: ModeParseError,
    },
}

// ---------------------------------------------------------------------------
// Trace input
// ---------------------------------------------------------------------------

/// Read a recorded cycle trace.
///
/// Columns: mode, cruise_speed, vehicle_speed, accelerator. The mode column
/// holds the single-character mode code. Blank lines and lines starting with
/// `#` are skipped. Line numbers in errors are 1-based.
pub fn read_trace<R: BufRead>(reader: R, name: &str) -> Result<Scenario, TraceError> {
    let mut cycles = vec![];
    let mut header_seen = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if !header_seen {
            if trimmed.replace(' ', "") != TRACE_HEADER {
                return Err(TraceError::MissingHeader);
            }
            header_seen = true;
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(TraceError::ColumnCount { line: line_no, found: fields.len() });
        }

        let mode = fields[0]
            .parse::<ControllerMode>()
            .map_err(|source| TraceError::Mode { line: line_no, source })?;

        cycles.push(Cycle {
            mode,
            cruise_speed: number(fields[1], line_no, "cruise_speed")?,
            vehicle_speed: number(fields[2], line_no, "vehicle_speed")?,
            accelerator: number(fields[3], line_no, "accelerator")?,
        });
    }

    if !header_seen {
        return Err(TraceError::MissingHeader);
    }

    Ok(Scenario { name: name.to_string(), cycles })
}

/// Read a trace file; the scenario is named after the file stem.
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Scenario, TraceError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".into());
    let file = File::open(path)?;
    read_trace(BufReader::new(file), &name)
}

fn number(text: &str, line: usize, column: &'static str) -> Result<f64, TraceError> {
    text.parse().map_err(|_| TraceError::Number {
        line,
        column,
        value: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Record output
// ---------------------------------------------------------------------------

/// Write replay records to CSV format.
///
/// Columns: index, time, mode (code), cruise_speed, vehicle_speed, throttle,
///          saturated, pedal_pressed, speed_in_range
/// Throttle and saturated are left empty on cycles where the regulator did
/// not run; saturated is also empty when the controller does not report it.
pub fn write_records<W: Write>(writer: &mut W, records: &[CycleRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "index,time,mode,cruise_speed,vehicle_speed,throttle,saturated,pedal_pressed,speed_in_range"
    )?;

    for r in records {
        let throttle = r.throttle.map(|t| format!("{:.4}", t)).unwrap_or_default();
        let saturated = r.saturated.map(|s| (s as u8).to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{},{:.3},{},{:.3},{:.3},{},{},{},{}",
            r.index,
            r.time,
            r.mode.code(),
            r.cruise_speed,
            r.vehicle_speed,
            throttle,
            saturated,
            r.pedal_pressed as u8,
            r.speed_in_range as u8,
        )?;
    }

    Ok(())
}

/// Write records to a CSV file at the given path.
pub fn write_records_file(path: impl AsRef<Path>, records: &[CycleRecord]) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_records(&mut file, records)
}
