use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::HeightRamp;
use crate::state::AppState;

/// Number of colour bands in the height ramp.
const HEIGHT_BANDS: usize = 8;

// ---------------------------------------------------------------------------
// Plan-view preview (central panel)
// ---------------------------------------------------------------------------

/// Render a top-down X/Y scatter of the loaded cloud, coloured by height.
pub fn preview_plot(ui: &mut Ui, state: &AppState) {
    let Some(conversion) = &state.conversion else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a .laz file or fetch a URL to preview points");
        });
        return;
    };
    let cloud = &conversion.cloud;

    let Some((z_min, z_max)) = cloud.z_range() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The file contains no points");
        });
        return;
    };

    let ramp = HeightRamp::new(z_min, z_max, HEIGHT_BANDS);
    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); ramp.bands()];
    for [x, y, z] in cloud.sample(state.config.preview_max_points) {
        bands[ramp.band_for(z)].push([x, y]);
    }

    Plot::new("preview_plot")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("X")
        .y_axis_label("Y")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (band, coords) in bands.into_iter().enumerate() {
                if coords.is_empty() {
                    continue;
                }
                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(format!("z ≥ {:.2}", ramp.band_floor(band)))
                        .color(ramp.color(band))
                        .radius(1.5),
                );
            }
        });
}
