//! Static dashboard structure: the title, both controls and the two chart
//! regions. Shared by the web page, the `/api/layout` endpoint and the
//! desktop window so the IDs and bounds only live here.

use serde::Serialize;

use crate::data::model::{LaunchDataset, ALL_SITES};

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

pub const SITE_DROPDOWN_ID: &str = "site-dropdown";
pub const PAYLOAD_SLIDER_ID: &str = "payload-slider";
pub const PIE_CHART_ID: &str = "success-pie-chart";
pub const SCATTER_CHART_ID: &str = "success-payload-scatter-chart";

pub const PAYLOAD_STEP: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: [f64; 2],
}

impl RangeSlider {
    /// Snap a raw value onto the slider grid `min + k * step`, clamped to
    /// `[min, max]`. The top bound is always reachable even when the extent
    /// is not a multiple of the step.
    pub fn snap(&self, raw: f64) -> f64 {
        if raw >= self.max {
            return self.max;
        }
        if raw <= self.min || self.step <= 0.0 {
            return self.min;
        }
        let k = ((raw - self.min) / self.step).round();
        (self.min + k * self.step).min(self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub dropdown: Dropdown,
    pub slider: RangeSlider,
    pub graphs: [Graph; 2],
}

pub fn build_layout(dataset: &LaunchDataset) -> Layout {
    let bounds = dataset.payload_bounds();
    Layout {
        title: DASHBOARD_TITLE,
        dropdown: Dropdown {
            id: SITE_DROPDOWN_ID,
            options: dataset.site_options(),
            value: ALL_SITES.to_string(),
        },
        slider: RangeSlider {
            id: PAYLOAD_SLIDER_ID,
            min: bounds.min,
            max: bounds.max,
            step: PAYLOAD_STEP,
            value: [bounds.min, bounds.max],
        },
        graphs: [Graph { id: PIE_CHART_ID }, Graph { id: SCATTER_CHART_ID }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    #[test]
    fn layout_reflects_dataset() {
        let ds = LaunchDataset::from_records(vec![
            record("CCAFS", 0.0, 1),
            record("VAFB", 9600.0, 0),
        ])
        .unwrap();
        let layout = build_layout(&ds);

        assert_eq!(layout.dropdown.options, ["All sites", "CCAFS", "VAFB"]);
        assert_eq!(layout.dropdown.value, "All sites");
        assert_eq!(layout.slider.value, [0.0, 9600.0]);
        assert_eq!(layout.slider.step, 1000.0);

        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["dropdown"]["id"], "site-dropdown");
        assert_eq!(json["slider"]["id"], "payload-slider");
        assert_eq!(json["graphs"][0]["id"], "success-pie-chart");
        assert_eq!(json["graphs"][1]["id"], "success-payload-scatter-chart");
    }

    #[test]
    fn snap_uses_the_slider_grid() {
        let slider = RangeSlider {
            id: PAYLOAD_SLIDER_ID,
            min: 0.0,
            max: 9600.0,
            step: 1000.0,
            value: [0.0, 9600.0],
        };
        assert_eq!(slider.snap(1400.0), 1000.0);
        assert_eq!(slider.snap(1600.0), 2000.0);
        assert_eq!(slider.snap(9400.0), 9000.0);
        assert_eq!(slider.snap(9550.0), 9600.0);
        assert_eq!(slider.snap(-5.0), 0.0);
        assert_eq!(slider.snap(12_000.0), 9600.0);
    }
}
