use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{PayloadRange, SiteSelection};
use crate::state::{AppState, ControlEvent};

// ---------------------------------------------------------------------------
// Left side panel – the two controls
// ---------------------------------------------------------------------------

/// Render the site dropdown and the payload range sliders.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Launch site");
    ui.separator();

    // Clone what we need so we can mutate state inside the closures.
    let options = state.layout.dropdown.options.clone();
    let current = state.filters().site.clone();

    egui::ComboBox::from_id_salt(state.layout.dropdown.id)
        .selected_text(current.label())
        .width(210.0)
        .show_ui(ui, |ui: &mut Ui| {
            for option in &options {
                if ui
                    .selectable_label(current.label() == option.as_str(), option)
                    .clicked()
                {
                    state.apply(ControlEvent::SiteChanged(SiteSelection::parse(option)));
                }
            }
        });

    ui.add_space(12.0);
    ui.heading("Payload range (Kg)");
    ui.separator();

    let slider = state.layout.slider.clone();
    let PayloadRange { mut min, mut max } = state.filters().payload;

    let min_changed = ui
        .add(
            egui::Slider::new(&mut min, slider.min..=slider.max)
                .step_by(slider.step)
                .text("min"),
        )
        .changed();
    let max_changed = ui
        .add(
            egui::Slider::new(&mut max, slider.min..=slider.max)
                .step_by(slider.step)
                .text("max"),
        )
        .changed();

    if min_changed || max_changed {
        let (mut min, mut max) = (slider.snap(min), slider.snap(max));
        // Dragging one handle past the other pushes it along, like a range slider.
        if min > max {
            if min_changed {
                max = min;
            } else {
                min = max;
            }
        }
        state.apply(ControlEvent::PayloadChanged(PayloadRange::new(min, max)));
    }

    ui.add_space(12.0);
    if ui.button("Reset").clicked() {
        state.reset();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(state.layout.title).strong().size(20.0));
        ui.separator();
        ui.label(format!(
            "{} launches loaded, {} plotted",
            state.dataset().len(),
            state.visible_indices().len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Records table
// ---------------------------------------------------------------------------

/// The records behind the current scatter chart.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let records = state.dataset().records();
    let visible = state.visible_indices();

    egui::CollapsingHeader::new(RichText::new(format!("Launches ({})", visible.len())).strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(160.0))
                .column(Column::auto().at_least(140.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    header.col(|ui| {
                        ui.strong("Launch Site");
                    });
                    header.col(|ui| {
                        ui.strong("Payload Mass (kg)");
                    });
                    header.col(|ui| {
                        ui.strong("class");
                    });
                })
                .body(|body| {
                    body.rows(18.0, visible.len(), |mut row| {
                        let idx = visible[row.index()];
                        let record = &records[idx];
                        row.col(|ui| {
                            ui.label(idx.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&record.site);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", record.payload_mass_kg));
                        });
                        row.col(|ui| {
                            ui.label(record.outcome.class().to_string());
                        });
                    });
                });
        });
}
