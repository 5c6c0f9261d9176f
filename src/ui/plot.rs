use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot};

use crate::data::model::Country;
use crate::data::summary::box_stats;
use crate::state::AppState;

/// Country name for a tick on the categorical x axis.
fn country_tick(mark: GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    Country::ALL
        .get(rounded as usize)
        .map(|c| c.label().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Distribution plot
// ---------------------------------------------------------------------------

/// Box plot of the selected metric, one box per country in the view.
pub fn distribution_plot(ui: &mut Ui, state: &AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let metric = output.request.metric;

    let boxes: Vec<BoxElem> = output
        .groups
        .iter()
        .filter_map(|(country, values)| {
            let stats = box_stats(values)?;
            let color = state.colors.color_for(*country);
            Some(
                BoxElem::new(
                    country.index() as f64,
                    BoxSpread::new(
                        stats.lower_whisker,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.upper_whisker,
                    ),
                )
                .name(country.label())
                .box_width(0.5)
                .fill(color.linear_multiply(0.5))
                .stroke(Stroke::new(1.5, color)),
            )
        })
        .collect();

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .height(320.0)
        .x_axis_formatter(|mark, _range| country_tick(mark))
        .y_axis_label(metric.to_string())
        .include_x(-0.5)
        .include_x(Country::ALL.len() as f64 - 0.5)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if !boxes.is_empty() {
                plot_ui.box_plot(BoxPlot::new(boxes).name(metric.to_string()));
            }
        });
}

// ---------------------------------------------------------------------------
// Average bar chart
// ---------------------------------------------------------------------------

/// Bar chart of per-country means.
pub fn average_chart(ui: &mut Ui, state: &AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let metric = output.request.metric;

    let bars: Vec<Bar> = output
        .averages
        .iter()
        .map(|avg| {
            Bar::new(avg.country.index() as f64, avg.mean)
                .name(format!("{} ({:.2})", avg.country, avg.mean))
                .width(0.6)
                .fill(state.colors.color_for(avg.country))
        })
        .collect();

    Plot::new("average_chart")
        .height(260.0)
        .x_axis_formatter(|mark, _range| country_tick(mark))
        .y_axis_label(format!("mean {metric}"))
        .include_x(-0.5)
        .include_x(Country::ALL.len() as f64 - 0.5)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if !bars.is_empty() {
                plot_ui.bar_chart(BarChart::new(bars).name(format!("Average {metric}")));
            }
        });
}
