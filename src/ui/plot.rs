use eframe::egui::{pos2, vec2, Color32, Rect, RichText, Sense, Ui};
use egui_plot::{GridMark, Line, MarkerShape, Plot, PlotBounds, Points};

use crate::color::wedge_colors;
use crate::data::model::{CurveGeometry, GammaMetric};
use crate::state::AppState;

const WEDGE_HEIGHT: f32 = 28.0;

// ---------------------------------------------------------------------------
// Characteristic curve (central panel)
// ---------------------------------------------------------------------------

/// Render the H&D curve, its Gamma readout and the step wedge bar.
pub fn curve_plot(ui: &mut Ui, state: &AppState) {
    let geometry = match &state.geometry {
        Some(geo) => geo,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Enter densities and press \"Plot curve\"");
            });
            return;
        }
    };

    ui.heading("Characteristic curve (H&D)");
    if let Some(gamma) = &geometry.gamma {
        ui.label(RichText::new(gamma_text(gamma)).strong());
    }
    ui.add_space(4.0);

    let plot_height = (ui.available_height() - WEDGE_HEIGHT - 24.0).max(160.0);
    curve_chart(ui, geometry, plot_height);

    ui.add_space(6.0);
    step_wedge(ui, geometry);
}

fn gamma_text(gamma: &GammaMetric) -> String {
    match gamma.from_position {
        Some(pos) => format!(
            "Gamma: {:.2}   (steepest between exposure steps {pos} and {})",
            gamma.value,
            pos + 1
        ),
        None => format!("Gamma: {:.2}   (single step, slope undefined)", gamma.value),
    }
}

/// Grid marks at exactly the given values, all drawn at full strength.
fn fixed_marks(values: &[f64], span: f64) -> Vec<GridMark> {
    values
        .iter()
        .map(|&value| GridMark {
            value,
            step_size: span,
        })
        .collect()
}

fn curve_chart(ui: &mut Ui, geometry: &CurveGeometry, height: f32) {
    let n = geometry.len();
    let axes = &geometry.axes;
    let (x_min, x_max) = axes.x_range;
    let (y_min, y_max) = axes.y_range;

    let curve_color = if ui.visuals().dark_mode {
        Color32::LIGHT_GRAY
    } else {
        Color32::BLACK
    };

    let x_marks: Vec<f64> = axes.x_ticks.iter().map(|&s| s as f64).collect();
    let x_span = x_max - x_min;
    let mut plot = Plot::new("hd_curve")
        .height(height)
        .x_axis_label(format!("Relative exposure step (step {n} → step 1)"))
        .y_axis_label("Optical density (OD)")
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_grid_spacer(move |_input| fixed_marks(&x_marks, x_span))
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64));

    if let Some(ticks) = axes.y_ticks.clone() {
        let y_span = y_max - y_min;
        plot = plot
            .y_grid_spacer(move |_input| fixed_marks(&ticks, y_span))
            .y_axis_formatter(|mark, _range| format!("{:.1}", mark.value));
    }

    let points: Vec<[f64; 2]> = geometry
        .points()
        .map(|(pos, od)| [pos as f64, od])
        .collect();
    let steepest: Option<Vec<[f64; 2]>> = geometry
        .gamma
        .and_then(|g| g.from_position)
        .map(|pos| points[pos - 1..=pos].to_vec());

    plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

        plot_ui.line(
            Line::new(points.clone())
                .name("OD")
                .color(curve_color)
                .width(2.0),
        );
        plot_ui.points(
            Points::new(points)
                .name("OD")
                .shape(MarkerShape::Circle)
                .radius(3.5)
                .filled(true)
                .color(curve_color),
        );

        if let Some(segment) = steepest {
            plot_ui.line(
                Line::new(segment)
                    .name("Gamma")
                    .color(Color32::from_rgb(200, 60, 40))
                    .width(3.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Step wedge bar
// ---------------------------------------------------------------------------

/// Gray patches in plot order, each shaded by its density.
fn step_wedge(ui: &mut Ui, geometry: &CurveGeometry) {
    let colors = wedge_colors(&geometry.series);
    if colors.is_empty() {
        return;
    }

    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), WEDGE_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let patch_width = rect.width() / colors.len() as f32;

    for (i, color) in colors.iter().enumerate() {
        let left = rect.left() + i as f32 * patch_width;
        let patch = Rect::from_min_max(pos2(left, rect.top()), pos2(left + patch_width, rect.bottom()));
        painter.rect_filled(patch, 0.0, *color);
    }

    if let Some(pointer) = response.hover_pos() {
        let idx = (((pointer.x - rect.left()) / patch_width) as usize).min(colors.len() - 1);
        let position = idx + 1;
        response.on_hover_text(format!(
            "Exposure step {position} (entered as step {}): OD {:.2}",
            geometry.entered_step(position),
            geometry.series[idx]
        ));
    }
}
