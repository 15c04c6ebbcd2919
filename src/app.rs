use std::sync::Arc;

use eframe::egui;

use crate::data::model::LaunchDataset;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title + counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: records behind the scatter ----
        egui::TopBottomPanel::bottom("records_panel")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                panels::records_table(ui, &self.state);
            });

        // ---- Central panel: both charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let half = ui.available_height() / 2.0;
            plot::pie_chart(ui, &self.state, half);
            ui.separator();
            plot::scatter_chart(ui, &self.state);
        });
    }
}
