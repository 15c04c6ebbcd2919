use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::SiteSelection;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// `#rrggbb`, for SVG output.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

// ---------------------------------------------------------------------------
// Color mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps chart labels (site names, outcome classes) to distinct colours.
/// Both front ends build it from the same label order, so a site keeps its
/// colour across the pie and the scatter.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label; unknown labels get grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Slice colour: site colours for the all-sites pie, fixed outcome
    /// colours when a single site is selected.
    pub fn pie_color(&self, site: &SiteSelection, label: &str) -> Color32 {
        match site {
            SiteSelection::All => self.color_for(label),
            SiteSelection::Site(_) => outcome_color(label),
        }
    }
}

/// Fixed colours for the per-site outcome pie.
pub fn outcome_color(label: &str) -> Color32 {
    match label {
        "1" => Color32::from_rgb(0x3f, 0xb9, 0x50),
        "0" => Color32::from_rgb(0xf8, 0x51, 0x49),
        _ => Color32::GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_label_is_grey() {
        let map = ColorMap::new(&["CCAFS", "VAFB"]);
        assert_ne!(map.color_for("CCAFS"), map.color_for("VAFB"));
        assert_eq!(map.color_for("KSC"), Color32::GRAY);
    }

    #[test]
    fn hex_format() {
        assert_eq!(to_hex(Color32::from_rgb(255, 0, 16)), "#ff0010");
    }
}
