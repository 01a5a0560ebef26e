use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use cruise_control::io::{self, ReplaySummary};
use cruise_control::scenario::{presets, Scenario};
use cruise_control::sim::event::{ActivationDetector, EventDetector, EventKind, RailDetector};
use cruise_control::sim::{self, ReplayConfig};

/// Replay a cycle trace through the cruise-control throttle regulator.
#[derive(Parser, Debug)]
#[command(name = "cruise-control", version)]
struct Args {
    /// Trace CSV (mode,cruise_speed,vehicle_speed,accelerator). Defaults to the highway preset.
    trace: Option<PathBuf>,

    /// Write per-cycle records as CSV.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write the replay summary as JSON.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    // -----------------------------------------------------------------------
    // Load scenario
    // -----------------------------------------------------------------------
    let scenario: Scenario = match &args.trace {
        Some(path) => io::read_trace_file(path)?,
        None => presets::highway_engage(),
    };
    let config = ReplayConfig::default();

    // -----------------------------------------------------------------------
    // Replay
    // -----------------------------------------------------------------------
    let records = sim::replay(&scenario, &config);
    let summary = ReplaySummary::from_records(&records);

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(ActivationDetector),
        Box::new(RailDetector),
    ];
    let events = sim::detect_events(&records, &mut detectors);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  CRUISE CONTROL REPLAY — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Regulation");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Cycles:        {:>8}       Regulated:    {:>8}",
        summary.cycles, summary.active_cycles
    );
    println!(
        "  Saturated:     {:>8}       Peak throttle:{:>8.1} %",
        summary.saturated_cycles, summary.peak_throttle
    );
    match summary.final_error {
        Some(e) => println!(
            "  Final error:   {:>8.2} km/h  Mean |error|: {:>8.2} km/h",
            e, summary.mean_abs_error
        ),
        None => println!("  Final error:        n/a       (regulator never engaged)"),
    }
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for ev in &events {
        let text = match &ev.kind {
            EventKind::Activated { target } => format!("ACTIVATED   target={:.1} km/h", target),
            EventKind::Deactivated { to } => format!("DEACTIVATED to {}", to),
            EventKind::RailReached { command } => format!("RAIL        throttle={:.1} %", command),
            EventKind::RailReleased { command } => format!("RELEASED    throttle={:.1} %", command),
        };
        println!("  t={:>6.1}s  #{:<5} {}", ev.time, ev.index, text);
    }
    if events.is_empty() {
        println!("  (none)");
    }
    println!();

    // -----------------------------------------------------------------------
    // Cycle table (sampled)
    // -----------------------------------------------------------------------
    println!("  Cycles");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>9}  {:>9}  {:>9}  {:>5}",
        "t (s)", "mode", "target", "speed", "throttle", "pedal"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (records.len() / 30).max(1);
    for (i, r) in records.iter().enumerate() {
        let changed = i > 0 && records[i - 1].mode != r.mode;
        if !(i % sample_interval == 0 || changed || i == records.len() - 1) {
            continue;
        }

        let throttle = r
            .throttle
            .map(|t| format!("{:.2}", t))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:>7.1}  {:>8}  {:>9.1}  {:>9.1}  {:>9}  {:>5}",
            r.time,
            r.mode.to_string(),
            r.cruise_speed,
            r.vehicle_speed,
            throttle,
            if r.pedal_pressed { "yes" } else { "" }
        );
    }
    println!();
    println!("  Replay: {} cycles, cycle time={} s", records.len(), config.cycle_time);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Optional outputs
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        io::write_records_file(path, &records)?;
        log::info!("wrote {} records to {}", records.len(), path.display());
    }
    if let Some(path) = &args.json {
        io::write_summary_file(path, &scenario, &summary)?;
        log::info!("wrote summary to {}", path.display());
    }

    Ok(())
}
