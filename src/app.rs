use eframe::egui;

use crate::data::loader::SourceInput;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SolarCompareApp {
    pub state: AppState,
}

impl SolarCompareApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Hand files dropped onto the window to the state.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let inputs: Vec<(String, SourceInput)> = dropped
            .into_iter()
            .filter_map(|file| match (file.path, file.bytes) {
                (Some(path), _) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.name.clone());
                    Some((name, SourceInput::Path(path)))
                }
                (None, Some(bytes)) => Some((
                    file.name.clone(),
                    SourceInput::Upload {
                        name: file.name,
                        bytes: bytes.to_vec(),
                    },
                )),
                (None, None) => None,
            })
            .collect();

        let unmatched = self.state.assign_dropped(inputs);
        if !unmatched.is_empty() && self.state.error.is_none() {
            self.state.error = Some(format!(
                "Could not tell which country these files belong to: {}",
                unmatched.join(", ")
            ));
        }
    }
}

impl eframe::App for SolarCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sources + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plots and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
    }
}

fn central_panel(ui: &mut egui::Ui, state: &AppState) {
    let Some(output) = &state.output else {
        ui.centered_and_justified(|ui| {
            ui.heading("Upload all three cleaned datasets (File → Open…) to compare countries");
        });
        return;
    };
    let metric = output.request.metric;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.heading(format!("{metric} Distribution by Country"));
            plot::distribution_plot(ui, state);
            ui.add_space(12.0);

            ui.heading(format!("Summary Statistics for {metric}"));
            table::summary_table(ui, state);
            ui.add_space(12.0);

            ui.heading(format!("Average {metric} by Country"));
            plot::average_chart(ui, state);
            ui.add_space(12.0);

            ui.heading("Observations");
            ui.label(
                "• Countries with higher GHI (Global Horizontal Irradiance) tend to have \
                 stronger solar potential.",
            );
            ui.label("• Comparing median values gives a better idea of consistency across regions.");
            ui.label(
                "• The variability (standard deviation) can help identify stable vs. \
                 fluctuating solar regions.",
            );
        });
}
