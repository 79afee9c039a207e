use std::time::Duration;

use eframe::egui;

use crate::state::{AppState, Interaction};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VehicleDashApp {
    pub state: AppState,
}

impl VehicleDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for VehicleDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events: Vec<Interaction> = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut events);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut events);
            });

        // ---- Central panel: preview and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                plot::dashboard(ui, &self.state, &mut events);
            });
        });

        if self.state.playback.playing {
            events.push(Interaction::Tick(ctx.input(|i| i.time)));
        }

        for event in events {
            self.state.handle(event);
        }

        if self.state.playback.playing {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
