use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::summary::SUMMARY_DECIMALS;
use crate::state::AppState;

/// Summary statistics of the selected metric, one row per country.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    let Some(output) = &state.output else {
        return;
    };
    if output.summary.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let decimals = SUMMARY_DECIMALS as usize;
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(80.0), 4)
        .header(20.0, |mut header| {
            for title in ["Country", "count", "mean", "median", "std"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for record in &output.summary {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(
                            RichText::new(record.country.label())
                                .color(state.colors.color_for(record.country)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(record.count.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.decimals$}", record.mean));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.decimals$}", record.median));
                    });
                    row.col(|ui| {
                        let text = record
                            .std
                            .map_or_else(|| "–".to_string(), |s| format!("{s:.decimals$}"));
                        ui.label(text);
                    });
                });
            }
        });
}
