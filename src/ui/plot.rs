use std::f64::consts::PI;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::state::AppState;

/// Segments per full turn when approximating pie arcs.
const ARC_SEGMENTS: f64 = 128.0;

// ---------------------------------------------------------------------------
// Success pie (upper half of the central panel)
// ---------------------------------------------------------------------------

pub fn pie_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let pie = state.pie();
    ui.label(RichText::new(&pie.title).strong());

    let fractions = pie.fractions();
    if fractions.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No data");
            });
        });
        return;
    }

    let site = &state.filters().site;

    Plot::new(state.layout.graphs[0].id)
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Start at twelve o'clock, clockwise.
            let mut angle = PI / 2.0;
            for (slice, fraction) in pie.slices.iter().zip(&fractions) {
                let sweep = fraction * 2.0 * PI;
                if sweep <= 0.0 {
                    continue;
                }
                let color = state.color_map.pie_color(site, &slice.label);

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge(angle, angle - sweep)))
                        .name(&slice.label)
                        .fill_color(color.gamma_multiply(0.9))
                        .stroke((1.0, Color32::WHITE)),
                );

                let mid = angle - sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    format!("{:.1}%", fraction * 100.0),
                ));
                angle -= sweep;
            }
        });
}

/// Unit-circle wedge from `start` to `end` (radians), as a closed polygon.
fn wedge(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((start - end).abs() / (2.0 * PI)) * ARC_SEGMENTS).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let a = start + (end - start) * i as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter (lower half)
// ---------------------------------------------------------------------------

pub fn scatter_chart(ui: &mut Ui, state: &AppState) {
    let chart = state.scatter();
    ui.label(RichText::new(&chart.title).strong());

    if chart.point_count() == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No launches in this range");
        });
        return;
    }

    Plot::new(state.layout.graphs[1].id)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|p| [p.payload_mass_kg, f64::from(p.class)])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(&series.site)
                        .color(state.color_map.color_for(&series.site))
                        .radius(4.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_starts_at_centre_and_follows_the_arc() {
        let pts = wedge(PI / 2.0, 0.0);
        assert_eq!(pts[0], [0.0, 0.0]);
        assert!(pts[1][0].abs() < 1e-9 && (pts[1][1] - 1.0).abs() < 1e-9);
        let last = pts.last().unwrap();
        assert!((last[0] - 1.0).abs() < 1e-9 && last[1].abs() < 1e-9);
        assert!(pts[1..].iter().all(|[x, y]| (x * x + y * y - 1.0).abs() < 1e-9));
        // A quarter turn gets a quarter of the segments.
        assert_eq!(pts.len(), 32 + 2);
    }
}
