use eframe::egui;

use crate::config::AppConfig;
use crate::state::{Action, AppState};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LazConverterApp {
    pub state: AppState,
}

impl LazConverterApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for LazConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Work queued last frame; its spinner has already been painted.
        if self.state.pending.is_some() {
            self.state.run_pending();
        }

        self.take_dropped_file(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: first rows ----
        egui::TopBottomPanel::bottom("rows_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                egui::CollapsingHeader::new("Points")
                    .default_open(false)
                    .show(ui, |ui| table::point_table(ui, &self.state));
            });

        // ---- Central panel: preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::preview_plot(ui, &self.state);
        });

        if self.state.pending.is_some() {
            ctx.request_repaint();
        }
    }
}

impl LazConverterApp {
    /// Queue the first file dropped onto the window as an upload.
    fn take_dropped_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };
        if let Some(bytes) = file.bytes {
            self.state.queue(Action::Upload {
                name: file.name,
                bytes: bytes.to_vec(),
            });
        } else if let Some(path) = file.path {
            self.state.queue_upload_path(&path);
        }
    }
}
