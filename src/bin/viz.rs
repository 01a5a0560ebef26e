use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use cruise_control::io::ReplaySummary;
use cruise_control::control::THROTTLE_MAX;
use cruise_control::scenario::{presets, Scenario};
use cruise_control::sim::{self, CycleRecord, ReplayConfig};

fn main() -> eframe::Result {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let scenarios = vec![
        presets::highway_engage(),
        presets::hill_climb(),
        presets::lever_sweep(),
    ];
    let config = ReplayConfig::default();
    let runs = scenarios
        .into_iter()
        .map(|s| {
            let records = sim::replay(&s, &config);
            (s, records)
        })
        .collect();

    let app = ReplayViz { runs, selected: 0 };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Cruise Control Replay", options, Box::new(|_| Ok(Box::new(app))))
}

struct ReplayViz {
    runs: Vec<(Scenario, Vec<CycleRecord>)>,
    selected: usize,
}

impl eframe::App for ReplayViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (i, (s, _)) in self.runs.iter().enumerate() {
                    ui.selectable_value(&mut self.selected, i, s.name.as_str());
                }
            });

            let (scenario, records) = &self.runs[self.selected];
            let summary = ReplaySummary::from_records(records);
            ui.heading(format!("Scenario: {}", scenario.name));
            ui.label(format!(
                "Regulated: {} / {} cycles  |  Saturated: {}  |  Peak throttle: {:.1} %  |  Mean |error|: {:.2} km/h",
                summary.active_cycles,
                summary.cycles,
                summary.saturated_cycles,
                summary.peak_throttle,
                summary.mean_abs_error,
            ));
        });

        let (_, records) = &self.runs[self.selected];

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_h = available.y / 2.0 - 8.0;

            // Target vs measured speed
            ui.label("Speed (km/h)");
            let target: PlotPoints = records.iter().map(|r| [r.time, r.cruise_speed]).collect();
            let speed: PlotPoints = records.iter().map(|r| [r.time, r.vehicle_speed]).collect();
            Plot::new("speed")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Target", target));
                    plot_ui.line(Line::new("Vehicle", speed));
                });

            // Throttle command, regulated cycles only
            ui.label("Throttle (%)");
            let throttle: PlotPoints = records
                .iter()
                .filter_map(|r| r.throttle.map(|t| [r.time, t]))
                .collect();
            Plot::new("throttle")
                .height(half_h)
                .x_axis_label("Time (s)")
                .include_y(0.0)
                .include_y(THROTTLE_MAX)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Throttle", throttle));
                });
        });
    }
}
