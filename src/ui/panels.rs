use std::collections::BTreeSet;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::CategoryColumn;
use crate::state::{AppState, Interaction};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Widgets edit a draft of the filter state;
/// a changed draft is emitted as a single `FiltersChanged` event.
pub fn side_panel(ui: &mut Ui, state: &AppState, events: &mut Vec<Interaction>) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No listings loaded.");
        return;
    }

    let mut draft = state.filters.clone();
    let table = &state.table;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Model year range ----
            if let Some((lo, hi)) = table.year_bounds() {
                ui.strong("Model year");
                ui.add(egui::Slider::new(&mut draft.year_range.0, lo..=hi).text("from"));
                ui.add(egui::Slider::new(&mut draft.year_range.1, lo..=hi).text("to"));
                if draft.year_range.0 > draft.year_range.1 {
                    draft.year_range.1 = draft.year_range.0;
                }
                ui.separator();
            }

            // ---- Colour-by selector ----
            ui.strong("Color charts by");
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(draft.color_by.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in CategoryColumn::ALL {
                        ui.selectable_value(&mut draft.color_by, col, col.name());
                    }
                });
            ui.separator();

            multi_select(ui, "Condition", table.condition_options(), &mut draft.conditions);
            multi_select(ui, "Manufacturer", table.manufacturer_options(), &mut draft.manufacturers);
        });

    if draft != state.filters {
        events.push(Interaction::FiltersChanged(draft));
    }
}

/// Collapsible checkbox list with All / None shortcuts.
fn multi_select(ui: &mut Ui, title: &str, options: &[String], selected: &mut BTreeSet<String>) {
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().cloned());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for value in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, events: &mut Vec<Interaction>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, events);
                ui.close_menu();
            }
            let can_export = state.chart.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export chart spec…"))
                .clicked()
            {
                export_chart_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} listings loaded, {} match the filters",
            state.table.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, events: &mut Vec<Interaction>) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_csv(&path) {
            Ok(table) => events.push(Interaction::DatasetLoaded(table)),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_chart_dialog(state: &mut AppState) {
    let Some(chart) = &state.chart else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart spec")
        .add_filter("JSON", &["json"])
        .set_file_name("chart.json")
        .save_file();

    if let Some(path) = file {
        let title = chart.title().to_string();
        let result = chart
            .to_json()
            .context("serializing chart spec")
            .and_then(|json| {
                std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
            });
        match result {
            Ok(()) => {
                log::info!("Exported \"{title}\" to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export chart spec: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
