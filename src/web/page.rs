//! Server-side rendering of the dashboard page. Charts are emitted as inline
//! SVG so the page needs no client-side charting library; changing a control
//! resubmits the form and the server recomputes both charts.

use std::f64::consts::PI;
use std::fmt::Write as _;

use super::{ControlQuery, QueryError};
use crate::chart::{PieChart, ScatterChart};
use crate::color::{to_hex, ColorMap};
use crate::data::filter::FilterState;
use crate::data::model::{PayloadRange, SiteSelection};
use crate::layout::{Layout, RangeSlider};

const PIE_SIZE: f64 = 360.0;
const PIE_RADIUS: f64 = 150.0;

const SCATTER_WIDTH: f64 = 760.0;
const SCATTER_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 50.0;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text of the two payload inputs, plus the reason the submitted controls
/// were not applied, if they were not.
pub struct ControlInputs {
    pub payload_min: String,
    pub payload_max: String,
    pub error: Option<String>,
}

impl ControlInputs {
    /// Inputs for a range that was applied to the charts.
    pub fn applied(range: PayloadRange, slider: &RangeSlider) -> Self {
        let (low, high) = slider_inputs(range, slider.min, slider.max);
        Self {
            payload_min: low.to_string(),
            payload_max: high.to_string(),
            error: None,
        }
    }

    /// Inputs echoing the submitted bounds as typed, with the error.
    pub(super) fn rejected(controls: &ControlQuery, error: &QueryError) -> Self {
        Self {
            payload_min: controls.payload_min.clone().unwrap_or_default(),
            payload_max: controls.payload_max.clone().unwrap_or_default(),
            error: Some(error.to_string()),
        }
    }
}

/// The whole dashboard document for the given control values.
pub fn render_page(
    layout: &Layout,
    filters: &FilterState,
    inputs: &ControlInputs,
    pie: &PieChart,
    scatter: &ScatterChart,
    colors: &ColorMap,
) -> String {
    let mut options = String::new();
    for option in &layout.dropdown.options {
        let selected = if option == filters.site.label() {
            " selected"
        } else {
            ""
        };
        let option = escape_html(option);
        let _ = write!(options, r#"<option value="{option}"{selected}>{option}</option>"#);
    }

    let slider = &layout.slider;
    let error = inputs
        .error
        .as_deref()
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
  body {{ font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }}
  h1 {{ text-align: center; color: #503D36; font-size: 40px; }}
  #{dropdown_id} {{ width: 210px; }}
  .graph {{ margin: 1.5rem 0; }}
  .graph h3 {{ font-weight: 500; }}
  .legend {{ list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 1rem; }}
  .swatch {{ display: inline-block; width: 0.8rem; height: 0.8rem; margin-right: 0.3rem; }}
  .empty {{ color: #888; font-style: italic; }}
  .error {{ color: #b00020; margin: 0.3rem 0 0; }}
  svg text {{ font-size: 12px; fill: #444; }}
</style>
</head>
<body>
<h1>{title}</h1>
<form method="get" action="/">
  <select id="{dropdown_id}" name="site" onchange="this.form.submit()">{options}</select>
  <div class="graph" id="{pie_id}">{pie}</div>
  <p>Payload range (Kg):</p>
  <fieldset id="{slider_id}">
    <input type="number" name="payload_min" min="{min}" max="{max}" step="{step}" value="{low}" onchange="this.form.submit()">
    &ndash;
    <input type="number" name="payload_max" min="{min}" max="{max}" step="{step}" value="{high}" onchange="this.form.submit()">
    <noscript><button type="submit">Update</button></noscript>
    {error}
  </fieldset>
  <div class="graph" id="{scatter_id}">{scatter}</div>
</form>
</body>
</html>
"#,
        title = escape_html(layout.title),
        dropdown_id = layout.dropdown.id,
        slider_id = slider.id,
        pie_id = layout.graphs[0].id,
        scatter_id = layout.graphs[1].id,
        min = slider.min,
        max = slider.max,
        step = slider.step,
        low = escape_html(&inputs.payload_min),
        high = escape_html(&inputs.payload_max),
        pie = pie_html(pie, &filters.site, colors),
        scatter = scatter_html(scatter, filters.payload, colors),
    )
}

/// Values shown in the two number inputs; anything non-finite falls back to
/// the slider bounds.
fn slider_inputs(range: PayloadRange, min: f64, max: f64) -> (f64, f64) {
    let low = if range.min.is_finite() { range.min } else { min };
    let high = if range.max.is_finite() { range.max } else { max };
    (low, high)
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

pub fn pie_html(pie: &PieChart, site: &SiteSelection, colors: &ColorMap) -> String {
    let mut html = format!("<h3>{}</h3>", escape_html(&pie.title));

    let fractions = pie.fractions();
    if fractions.is_empty() {
        html.push_str(r#"<p class="empty">No data</p>"#);
        return html;
    }

    let c = PIE_SIZE / 2.0;
    let _ = write!(
        html,
        r#"<svg width="{PIE_SIZE}" height="{PIE_SIZE}" viewBox="0 0 {PIE_SIZE} {PIE_SIZE}">"#
    );

    // Start at twelve o'clock, clockwise.
    let mut angle = -PI / 2.0;
    for (slice, fraction) in pie.slices.iter().zip(&fractions) {
        if *fraction <= 0.0 {
            continue;
        }
        let fill = to_hex(colors.pie_color(site, &slice.label));
        let sweep = fraction * 2.0 * PI;

        if *fraction >= 0.9999 {
            let _ = write!(
                html,
                r#"<circle cx="{c}" cy="{c}" r="{PIE_RADIUS}" fill="{fill}"/>"#
            );
        } else {
            let (x0, y0) = polar(c, PIE_RADIUS, angle);
            let (x1, y1) = polar(c, PIE_RADIUS, angle + sweep);
            let large_arc = u8::from(sweep > PI);
            let _ = write!(
                html,
                r##"<path d="M {c} {c} L {x0:.2} {y0:.2} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 {x1:.2} {y1:.2} Z" fill="{fill}" stroke="#fff"/>"##
            );
        }

        let (lx, ly) = polar(c, PIE_RADIUS * 0.62, angle + sweep / 2.0);
        let _ = write!(
            html,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle">{:.1}%</text>"#,
            fraction * 100.0
        );
        angle += sweep;
    }
    html.push_str("</svg>");

    html.push_str(r#"<ul class="legend">"#);
    for slice in &pie.slices {
        let fill = to_hex(colors.pie_color(site, &slice.label));
        let _ = write!(
            html,
            r#"<li><span class="swatch" style="background:{fill}"></span>{}</li>"#,
            escape_html(&slice.label)
        );
    }
    html.push_str("</ul>");
    html
}

fn polar(center: f64, radius: f64, angle: f64) -> (f64, f64) {
    (center + radius * angle.cos(), center + radius * angle.sin())
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// X extent for the scatter axes: the selected range when usable, else the
/// extent of the points, padded when degenerate.
fn x_domain(chart: &ScatterChart, range: PayloadRange) -> (f64, f64) {
    let usable = range.min.is_finite() && range.max.is_finite() && range.min < range.max;
    let (mut lo, mut hi) = if usable {
        (range.min, range.max)
    } else {
        chart.points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.payload_mass_kg), hi.max(p.payload_mass_kg))
        })
    };
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1000.0;
    }
    if hi - lo < f64::EPSILON {
        lo -= 500.0;
        hi += 500.0;
    }
    (lo, hi)
}

pub fn scatter_html(chart: &ScatterChart, range: PayloadRange, colors: &ColorMap) -> String {
    let mut html = format!("<h3>{}</h3>", escape_html(&chart.title));

    if chart.point_count() == 0 {
        html.push_str(r#"<p class="empty">No launches in this range</p>"#);
        return html;
    }

    let (x_lo, x_hi) = x_domain(chart, range);
    let (y_lo, y_hi) = (-0.25, 1.25);
    let plot_w = SCATTER_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = SCATTER_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let sx = |x: f64| MARGIN_LEFT + (x - x_lo) / (x_hi - x_lo) * plot_w;
    let sy = |y: f64| MARGIN_TOP + (y_hi - y) / (y_hi - y_lo) * plot_h;

    let _ = write!(
        html,
        r#"<svg width="{SCATTER_WIDTH}" height="{SCATTER_HEIGHT}" viewBox="0 0 {SCATTER_WIDTH} {SCATTER_HEIGHT}">"#
    );

    // Axes
    let x_axis_y = MARGIN_TOP + plot_h;
    let _ = write!(
        html,
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{x_axis_y}\" x2=\"{}\" y2=\"{x_axis_y}\" stroke=\"#999\"/>\
         <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{x_axis_y}\" stroke=\"#999\"/>",
        MARGIN_LEFT + plot_w
    );
    for i in 0..=5 {
        let x = x_lo + (x_hi - x_lo) * f64::from(i) / 5.0;
        let _ = write!(
            html,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{x:.0}</text>"#,
            sx(x),
            x_axis_y + 16.0
        );
    }
    for y in [0.0, 1.0] {
        let _ = write!(
            html,
            r##"<line x1="{MARGIN_LEFT}" y1="{py:.1}" x2="{:.1}" y2="{py:.1}" stroke="#eee"/><text x="{:.1}" y="{:.1}" text-anchor="end">{y}</text>"##,
            MARGIN_LEFT + plot_w,
            MARGIN_LEFT - 8.0,
            sy(y) + 4.0,
            py = sy(y),
        );
    }
    let _ = write!(
        html,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text><text x="14" y="{:.1}" text-anchor="middle" transform="rotate(-90 14 {:.1})">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        SCATTER_HEIGHT - 8.0,
        escape_html(&chart.x_label),
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        escape_html(&chart.y_label),
    );

    for series in &chart.series {
        let fill = to_hex(colors.color_for(&series.site));
        for p in &series.points {
            let _ = write!(
                html,
                r#"<circle cx="{:.1}" cy="{:.1}" r="5" fill="{fill}" fill-opacity="0.8"><title>{}: {} kg, class {}</title></circle>"#,
                sx(p.payload_mass_kg),
                sy(f64::from(p.class)),
                escape_html(&series.site),
                p.payload_mass_kg,
                p.class
            );
        }
    }
    html.push_str("</svg>");

    html.push_str(r#"<ul class="legend">"#);
    for series in &chart.series {
        let fill = to_hex(colors.color_for(&series.site));
        let _ = write!(
            html,
            r#"<li><span class="swatch" style="background:{fill}"></span>{}</li>"#,
            escape_html(&series.site)
        );
    }
    html.push_str("</ul>");
    html
}
