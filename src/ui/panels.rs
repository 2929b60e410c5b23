use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use versus::data::model::GroupKey;

use crate::state::AppState;
use crate::ui::plot::color32;

// ---------------------------------------------------------------------------
// Left side panel – per-level values
// ---------------------------------------------------------------------------

/// Render the left panel with the numbers behind the current chart.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Datasets");
    ui.label(format!("Directory: {}", state.config.data_dir.display()));
    ui.label(format!("Window: {} s", state.config.window_secs));
    ui.separator();

    let Some(outcome) = state.current() else {
        ui.label("No metric selected.");
        return;
    };
    let chart = match &outcome.result {
        Ok(chart) => chart,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for pair in &chart.pairs {
                let color = color32(pair.color);
                egui::CollapsingHeader::new(
                    RichText::new(format!("● {}", pair.label)).color(color).strong(),
                )
                .id_salt((chart.metric, pair.load))
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    egui::Grid::new(("values", chart.metric, pair.load))
                        .striped(true)
                        .show(ui, |ui: &mut Ui| {
                            ui.strong(&chart.x_label);
                            ui.strong(chart.metric.unit());
                            ui.end_row();
                            for (key, value) in pair.series.iter() {
                                ui.label(key.to_string());
                                ui.label(format!("{value:.3}"));
                                ui.end_row();
                            }
                            ui.label(
                                RichText::new(&chart.baseline_name)
                                    .color(color32(pair.color.baseline_shade())),
                            );
                            ui.label(format!("{:.3}", pair.baseline));
                            ui.end_row();
                        });
                });
            }

            if !chart.warnings.is_empty() {
                ui.separator();
                ui.strong("Warnings");
                for warning in &chart.warnings {
                    ui.label(RichText::new(warning.to_string()).color(Color32::from_rgb(230, 140, 0)));
                }
            }

            ui.separator();
            let ticks: Vec<String> = chart
                .x_ticks()
                .into_iter()
                .map(|x| GroupKey(x).to_string())
                .collect();
            ui.label(format!("{}: {}", chart.x_label, ticks.join(", ")));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut clicked = None;
        for (i, outcome) in state.outcomes.iter().enumerate() {
            let mut text = RichText::new(outcome.metric.title());
            if outcome.result.is_err() {
                text = text.color(Color32::RED);
            }
            if ui.selectable_label(state.selected == i, text).clicked() {
                clicked = Some(i);
            }
        }
        if let Some(i) = clicked {
            state.selected = i;
        }

        ui.separator();

        if ui
            .selectable_label(state.show_baselines, "Baselines")
            .clicked()
        {
            state.show_baselines = !state.show_baselines;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open benchmark data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("switching data directory to {}", dir.display());
        state.set_data_dir(dir);
    }
}
