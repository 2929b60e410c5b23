use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Corner, GridInput, GridMark, HLine, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints,
    Points,
};

use versus::color::Rgb;
use versus::compare::ComparisonChart;
use versus::config::Marker;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Comparison plot (central panel)
// ---------------------------------------------------------------------------

pub fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Square => MarkerShape::Square,
        Marker::Triangle => MarkerShape::Up,
        Marker::Circle => MarkerShape::Circle,
    }
}

/// Render the selected metric's chart in the central panel.
pub fn comparison_plot(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = state.current() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No metrics configured");
        });
        return;
    };

    let chart = match &outcome.result {
        Ok(chart) => chart,
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("{} chart unavailable:\n{e}", outcome.metric))
                        .color(Color32::RED)
                        .heading(),
                );
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&chart.title);
    });
    draw_chart(ui, chart, state.show_baselines);
}

fn draw_chart(ui: &mut Ui, chart: &ComparisonChart, show_baselines: bool) {
    let ticks = chart.x_ticks();
    let tick_step = ticks
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    let tick_step = if tick_step.is_finite() { tick_step } else { 1.0 };

    let mut plot = Plot::new(("comparison_plot", chart.metric))
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .x_grid_spacer(move |input: GridInput| {
            let (lo, hi) = input.bounds;
            ticks
                .iter()
                .filter(|&&x| x >= lo && x <= hi)
                .map(|&value| GridMark {
                    value,
                    step_size: tick_step,
                })
                .collect()
        })
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some([min, max]) = chart.y_bounds {
        plot = plot.include_y(min).include_y(max);
    }

    plot.show(ui, |plot_ui| {
        for pair in &chart.pairs {
            let color = color32(pair.color);
            let name = chart.series_name(pair);
            let points = pair.series.plot_points();

            let line_points: PlotPoints = points.iter().copied().collect();
            plot_ui.line(Line::new(line_points).name(&name).color(color).width(1.5));

            let marker_points: PlotPoints = points.iter().copied().collect();
            plot_ui.points(
                Points::new(marker_points)
                    .name(&name)
                    .shape(marker_shape(pair.marker))
                    .filled(true)
                    .radius(5.0)
                    .color(color),
            );

            if show_baselines {
                plot_ui.hline(
                    HLine::new(pair.baseline)
                        .name(chart.baseline_name(pair))
                        .color(color32(pair.color.baseline_shade()))
                        .style(LineStyle::Dashed { length: 10.0 })
                        .width(2.0),
                );
            }
        }
    });
}
