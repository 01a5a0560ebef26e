use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::scenario::Scenario;
use crate::sim::CycleRecord;

/// Summary statistics computed from a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub active_cycles: usize,
    /// Active cycles the controller reported as clamped.
    pub saturated_cycles: usize,
    pub peak_throttle: f64,
    /// Tracking error on the last regulated cycle, km/h.
    pub final_error: Option<f64>,
    /// Mean absolute tracking error over regulated cycles, km/h.
    pub mean_abs_error: f64,
}

impl ReplaySummary {
    /// Compute summary from replay records.
    ///
    /// Saturation is counted from the flag the controller reported, never
    /// inferred from the command value.
    pub fn from_records(records: &[CycleRecord]) -> Self {
        let active: Vec<&CycleRecord> = records.iter().filter(|r| r.is_active()).collect();

        let saturated_cycles = active.iter().filter(|r| r.is_saturated()).count();
        let peak_throttle = active
            .iter()
            .filter_map(|r| r.throttle)
            .fold(0.0_f64, f64::max);

        let mean_abs_error = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|r| r.error().abs()).sum::<f64>() / active.len() as f64
        };

        ReplaySummary {
            cycles: records.len(),
            active_cycles: active.len(),
            saturated_cycles,
            peak_throttle,
            final_error: active.last().map(|r| r.error()),
            mean_abs_error,
        }
    }
}

/// Write replay summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &Scenario,
    summary: &ReplaySummary,
) -> io::Result<()> {
    let final_error = summary
        .final_error
        .map(|e| format!("{:.3}", e))
        .unwrap_or_else(|| "null".into());

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"scenario\": {{")?;
    writeln!(writer, "    \"name\": \"{}\",", escape(&scenario.name))?;
    writeln!(writer, "    \"cycles\": {}", summary.cycles)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"regulation\": {{")?;
    writeln!(writer, "    \"active_cycles\": {},", summary.active_cycles)?;
    writeln!(writer, "    \"saturated_cycles\": {},", summary.saturated_cycles)?;
    writeln!(writer, "    \"peak_throttle\": {:.3},", summary.peak_throttle)?;
    writeln!(writer, "    \"final_error_kmh\": {},", final_error)?;
    writeln!(writer, "    \"mean_abs_error_kmh\": {:.3}", summary.mean_abs_error)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write replay summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    scenario: &Scenario,
    summary: &ReplaySummary,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_summary(&mut file, scenario, summary)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
