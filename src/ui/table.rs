use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Rows listed in the bottom panel.
const PREVIEW_ROWS: usize = 100;

/// First rows of the loaded cloud, in decoder order.
pub fn point_table(ui: &mut Ui, state: &AppState) {
    let Some(conversion) = &state.conversion else {
        ui.label("No points loaded.");
        return;
    };
    let rows: Vec<[f64; 3]> = conversion.cloud.points().take(PREVIEW_ROWS).collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(60.0))
        .columns(Column::remainder(), 3)
        .header(20.0, |mut header| {
            for name in ["#", "X", "Y", "Z"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let index = row.index();
                let [x, y, z] = rows[index];
                row.col(|ui| {
                    ui.label(index.to_string());
                });
                for value in [x, y, z] {
                    row.col(|ui| {
                        ui.label(format!("{value:.3}"));
                    });
                }
            });
        });
}
