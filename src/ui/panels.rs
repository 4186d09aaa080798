use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::backend;
use crate::data::model::ExportFormat;
use crate::data::source::AuthKind;
use crate::state::{Action, AppState, MessageKind};

// ---------------------------------------------------------------------------
// Left side panel – source, format, counter, messages
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("LAZ Converter");
            ui.label("Convert a .laz LiDAR file to .csv or .xyz.");
            ui.separator();

            format_selector(ui, state);
            ui.separator();

            ui.strong("Local file");
            if ui.button("Open LAZ…").clicked() {
                open_file_dialog(state);
            }
            ui.small("…or drop a .laz file onto the window.");
            ui.separator();

            url_form(ui, state);
            ui.separator();

            counter(ui, state);
            ui.separator();

            status(ui, state);
        });
}

fn format_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Output format");
    ui.horizontal(|ui: &mut Ui| {
        for format in ExportFormat::ALL {
            if ui.radio(state.output_format == format, format.label()).clicked() {
                state.set_output_format(format);
            }
        }
    });
}

fn url_form(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Or fetch from URL (S3/HTTP)");
    ui.add(
        egui::TextEdit::singleline(&mut state.url_input)
            .hint_text("https://…/cloud.laz")
            .desired_width(f32::INFINITY),
    );

    if state.url_input.trim().is_empty() {
        return;
    }

    egui::ComboBox::from_id_salt("auth_kind")
        .selected_text(state.auth_kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in AuthKind::ALL {
                ui.selectable_value(&mut state.auth_kind, kind, kind.label());
            }
        });

    match state.auth_kind {
        AuthKind::None => {}
        AuthKind::Bearer => {
            ui.add(
                egui::TextEdit::singleline(&mut state.token_input)
                    .password(true)
                    .hint_text("Bearer token"),
            );
        }
        AuthKind::Basic => {
            ui.add(egui::TextEdit::singleline(&mut state.username_input).hint_text("Username"));
            ui.add(
                egui::TextEdit::singleline(&mut state.password_input)
                    .password(true)
                    .hint_text("Password"),
            );
        }
    }

    if ui.button("Fetch").clicked() {
        state.queue_fetch();
    }
}

fn counter(ui: &mut Ui, state: &mut AppState) {
    let ctx = ui.ctx().clone();
    if ui.button("Increment counter").clicked() {
        state.counter.increment(&ctx);
    }
    ui.label(format!(
        "Counter value (persists for this session): {}",
        state.counter.value(&ctx)
    ));
}

fn status(ui: &mut Ui, state: &mut AppState) {
    if let Some(action) = &state.pending {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label(action.spinner_text());
        });
        return;
    }

    for message in &state.messages {
        let color = match message.kind {
            MessageKind::Info => ui.visuals().text_color(),
            MessageKind::Success => Color32::from_rgb(60, 180, 75),
            MessageKind::Error => Color32::RED,
        };
        ui.label(RichText::new(&message.text).color(color));
    }

    if state.backend_missing && ui.button("Install LAZ backend now").clicked() {
        state.queue(Action::InstallBackend);
    }

    if let Some(conversion) = &state.conversion {
        let label = format!("📥 Save {} file…", conversion.table.format.label());
        if ui.button(label).clicked() {
            save_file_dialog(state);
        }
    } else if state.messages.is_empty() {
        ui.label("Please open a .laz file to start.");
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_save = state.conversion.is_some();
            if ui.add_enabled(can_save, egui::Button::new("Save As…")).clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(conversion) = &state.conversion {
            ui.label(format!(
                "{}: {} points",
                conversion.origin,
                conversion.cloud.len()
            ));
            ui.separator();
        }

        if !backend::backend_compiled_in() {
            ui.label(
                RichText::new(format!(
                    "built without the `{}` feature",
                    backend::BACKEND_FEATURE
                ))
                .color(Color32::YELLOW),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open LAZ file")
        .add_filter("Point clouds", &["laz", "las"])
        .add_filter("LAZ", &["laz"])
        .pick_file();

    if let Some(path) = file {
        state.queue_upload_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(conversion) = &state.conversion else {
        return;
    };
    let format = conversion.table.format;
    let file = rfd::FileDialog::new()
        .set_title("Save converted points")
        .set_file_name(conversion.table.file_name.as_str())
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        state.save_export(&path);
    }
}
