use eframe::egui::Color32;
use palette::{LinSrgb, Srgb};

// ---------------------------------------------------------------------------
// Density → gray tone
// ---------------------------------------------------------------------------

/// Fraction of light a patch of the given density lets through.
pub fn transmittance(od: f64) -> f64 {
    10f64.powf(-od).clamp(0.0, 1.0)
}

/// How a patch of the given density looks on a light box.
///
/// Transmittance is linear light, so it is encoded to sRGB before display.
pub fn od_to_gray(od: f64) -> Color32 {
    let t = transmittance(od) as f32;
    let rgb = Srgb::<u8>::from_linear(LinSrgb::new(t, t, t));
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// One patch colour per plotted step.
pub fn wedge_colors(series: &[f64]) -> Vec<Color32> {
    series.iter().map(|&od| od_to_gray(od)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmittance() {
        assert_eq!(transmittance(0.0), 1.0);
        assert!((transmittance(1.0) - 0.1).abs() < 1e-12);
        assert!((transmittance(2.0) - 0.01).abs() < 1e-12);
        // Negative density cannot pass more than all the light.
        assert_eq!(transmittance(-0.3), 1.0);
    }

    #[test]
    fn test_gray_extremes() {
        assert_eq!(od_to_gray(0.0), Color32::from_rgb(255, 255, 255));
        assert_eq!(od_to_gray(6.0), Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn test_denser_is_darker() {
        let colors = wedge_colors(&[0.3, 1.0, 2.0]);
        assert!(colors[0].r() > colors[1].r());
        assert!(colors[1].r() > colors[2].r());
        assert!(colors.iter().all(|c| c.r() == c.g() && c.g() == c.b()));
    }
}
