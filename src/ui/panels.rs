use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::SourceMode;
use crate::data::loader::SourceInput;
use crate::data::model::{Country, Metric};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – sources and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: one source slot per country, then the filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            sources_section(ui, state);
            ui.add_space(8.0);
            filters_section(ui, state);
        });
}

fn sources_section(ui: &mut Ui, state: &mut AppState) {
    let heading = match state.mode {
        SourceMode::Upload => "Upload Cleaned Data Files",
        SourceMode::LocalPaths => "Data Files",
    };
    ui.heading(heading);
    ui.separator();

    let counts = state.table.as_ref().map(|t| t.country_counts());
    for country in Country::ALL {
        let current = state.sources.get(country).map(SourceInput::display_name);
        let rows = counts
            .as_ref()
            .and_then(|counts| counts.iter().find(|(c, _)| *c == country))
            .map(|(_, n)| *n);
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(country.label()).strong());
            match &current {
                Some(name) => ui.label(name),
                None => ui.weak("not loaded"),
            };
            if let Some(n) = rows {
                ui.weak(format!("({n} rows)"));
            }
        });
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("Open…").clicked() {
                open_source_dialog(state, country);
            }
            if current.is_some() && ui.small_button("Clear").clicked() {
                state.clear_source(country);
            }
        });
    }

    if state.mode == SourceMode::Upload {
        ui.weak("Files dropped on the window are matched by name.");
    }
}

fn filters_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter and Visualization Options");
    ui.separator();

    if state.table.is_none() {
        ui.label("Load all three datasets to enable filters.");
        return;
    }

    // ---- Countries ----
    ui.strong("Select countries to display:");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_countries();
        }
        if ui.small_button("None").clicked() {
            state.select_no_countries();
        }
    });
    for country in Country::ALL {
        let mut checked = state.request.countries.contains(&country);
        let text = RichText::new(country.label()).color(state.colors.color_for(country));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_country(country);
        }
    }
    ui.separator();

    // ---- Metric ----
    ui.strong("Select solar metric:");
    let current = state.request.metric;
    egui::ComboBox::from_id_salt("metric")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                if ui
                    .selectable_label(current == metric, metric.to_string())
                    .clicked()
                    && metric != current
                {
                    state.set_metric(metric);
                }
            }
        });
    ui.separator();

    // ---- Value range ----
    ui.strong("Filter by Value Range");
    let ranges = state
        .output
        .as_ref()
        .and_then(|o| Some((o.bounds?, o.active_range?)));
    let Some((bounds, active)) = ranges else {
        ui.label("No values to filter.");
        return;
    };

    let mut low = active.low();
    let mut high = active.high();
    let span = bounds.low()..=bounds.high();
    let low_changed = ui
        .add(egui::Slider::new(&mut low, span.clone()).text(format!("min {}", current)))
        .changed();
    let high_changed = ui
        .add(egui::Slider::new(&mut high, span).text(format!("max {}", current)))
        .changed();
    if low_changed || high_changed {
        state.set_range(low, high);
    }
    if ui.small_button("Reset range").clicked() {
        state.reset_range();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for country in Country::ALL {
                if ui.button(format!("Open {country}…")).clicked() {
                    open_source_dialog(state, country);
                    ui.close_menu();
                }
            }
            ui.separator();
            let has_output = state.output.is_some();
            if ui
                .add_enabled(has_output, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_summary_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_output, egui::Button::new("Export filtered rows…"))
                .clicked()
            {
                export_rows_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let visible = state.output.as_ref().map_or(0, |o| o.rows.len());
            ui.label(format!("{} rows loaded, {} visible", table.len(), visible));
            ui.separator();
        }

        if let Some(msg) = state.status_line() {
            let color = if state.error.is_some() {
                Color32::RED
            } else if state.warning.is_some() {
                Color32::YELLOW
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_source_dialog(state: &mut AppState, country: Country) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {country} data"))
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_source(country, SourceInput::Path(path));
    }
}

fn export_summary_dialog(state: &mut AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name(format!("{}_summary.csv", output.request.metric))
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::export::export_summary(&path, &output.summary) {
            log::error!("Failed to export summary: {e:#}");
            state.error = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_rows_dialog(state: &mut AppState) {
    let (Some(table), Some(output)) = (&state.table, &state.output) else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name("filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        let result = std::fs::File::create(&path)
            .map_err(anyhow::Error::from)
            .and_then(|f| crate::export::write_rows_csv(f, table, &output.rows));
        match result {
            Ok(()) => log::info!("Exported {} rows to {}", output.rows.len(), path.display()),
            Err(e) => {
                log::error!("Failed to export rows: {e:#}");
                state.error = Some(format!("Error: {e:#}"));
            }
        }
    }
}
