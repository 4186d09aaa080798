use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Height ramp palette
// ---------------------------------------------------------------------------

/// Generates `n` colours sweeping from blue (low) to red (high).
pub fn height_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(240.0 * (1.0 - t), 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Height bands: z value → band index → Color32
// ---------------------------------------------------------------------------

/// Splits a Z range into equal bands, one colour per band.
#[derive(Debug, Clone)]
pub struct HeightRamp {
    min: f64,
    max: f64,
    colors: Vec<Color32>,
}

impl HeightRamp {
    pub fn new(min: f64, max: f64, bands: usize) -> Self {
        HeightRamp {
            min,
            max,
            colors: height_palette(bands.max(1)),
        }
    }

    pub fn bands(&self) -> usize {
        self.colors.len()
    }

    /// Band index for `z`, clamped to the ramp.
    pub fn band_for(&self, z: f64) -> usize {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON || !z.is_finite() {
            return 0;
        }
        let t = ((z - self.min) / range).clamp(0.0, 1.0);
        ((t * self.bands() as f64) as usize).min(self.bands() - 1)
    }

    pub fn color(&self, band: usize) -> Color32 {
        self.colors.get(band).copied().unwrap_or(Color32::GRAY)
    }

    /// Lower Z bound of `band`, for legend labels.
    pub fn band_floor(&self, band: usize) -> f64 {
        self.min + (self.max - self.min) * band as f64 / self.bands() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_runs_blue_to_red() {
        let colors = height_palette(3);
        assert_eq!(colors.len(), 3);
        assert!(colors[0].b() > colors[0].r());
        assert!(colors[2].r() > colors[2].b());
        assert!(height_palette(0).is_empty());
    }

    #[test]
    fn bands_cover_range_and_clamp() {
        let ramp = HeightRamp::new(0.0, 10.0, 5);
        assert_eq!(ramp.band_for(0.0), 0);
        assert_eq!(ramp.band_for(4.9), 2);
        assert_eq!(ramp.band_for(10.0), 4);
        assert_eq!(ramp.band_for(-3.0), 0);
        assert_eq!(ramp.band_for(42.0), 4);
        assert_eq!(ramp.band_floor(1), 2.0);
    }

    #[test]
    fn flat_cloud_uses_first_band() {
        let ramp = HeightRamp::new(3.0, 3.0, 8);
        assert_eq!(ramp.band_for(3.0), 0);
    }
}
