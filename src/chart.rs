use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::site_records;
use crate::data::model::{
    LaunchDataset, Outcome, PayloadRange, SiteSelection, CLASS_COLUMN, PAYLOAD_COLUMN,
};

// ---------------------------------------------------------------------------
// Chart values
// ---------------------------------------------------------------------------

/// One pie wedge. For "All sites" the value is a success rate, for a single
/// site it is a launch count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Each slice's share of the whole, in slice order. Empty when the
    /// slices sum to zero.
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        self.slices.iter().map(|s| s.value / total).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
}

/// Points of one launch site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub site: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

/// Tagged form used on the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

impl From<PieChart> for ChartSpec {
    fn from(chart: PieChart) -> Self {
        ChartSpec::Pie(chart)
    }
}

impl From<ScatterChart> for ChartSpec {
    fn from(chart: ScatterChart) -> Self {
        ChartSpec::Scatter(chart)
    }
}

// ---------------------------------------------------------------------------
// Updaters
// ---------------------------------------------------------------------------

pub fn pie_title(site: &SiteSelection) -> String {
    format!("Total Success Launches By Site: {site}")
}

pub fn scatter_title(site: &SiteSelection) -> String {
    format!("Correlation between Payload and Success for Site: {site}")
}

/// Success pie for the selected site.
///
/// * "All sites": one slice per site (sorted by name), valued by its mean
///   outcome, i.e. the site's success rate.
/// * a single site: one slice per outcome class present, valued by count,
///   largest first.
///
/// A site without records yields a chart with no slices.
pub fn update_pie(dataset: &LaunchDataset, site: &SiteSelection) -> PieChart {
    let slices: Vec<PieSlice> = match site {
        SiteSelection::All => {
            let mut by_site: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
            for r in dataset.records() {
                let (successes, total) = by_site.entry(r.site.as_str()).or_default();
                *successes += u32::from(r.outcome.class());
                *total += 1;
            }
            by_site
                .into_iter()
                .map(|(name, (successes, total))| PieSlice {
                    label: name.to_string(),
                    value: f64::from(successes) / f64::from(total),
                })
                .collect()
        }
        SiteSelection::Site(_) => {
            let mut counts: BTreeMap<Outcome, u32> = BTreeMap::new();
            for r in site_records(dataset, site) {
                *counts.entry(r.outcome).or_default() += 1;
            }
            let mut counts: Vec<(Outcome, u32)> = counts.into_iter().collect();
            // Stable sort keeps class order among equal counts.
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            counts
                .into_iter()
                .map(|(outcome, count)| PieSlice {
                    label: outcome.class().to_string(),
                    value: f64::from(count),
                })
                .collect()
        }
    };

    log::debug!("pie for {site}: {} slices", slices.len());
    PieChart {
        title: pie_title(site),
        slices,
    }
}

/// Payload vs. outcome scatter for the selected site and payload range
/// (inclusive). Series are grouped by site in order of first appearance.
pub fn update_scatter(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    payload: &PayloadRange,
) -> ScatterChart {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for r in site_records(dataset, site).filter(|r| payload.contains(r.payload_mass_kg)) {
        let point = ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            class: r.outcome.class(),
        };
        match series.iter_mut().find(|s| s.site == r.site) {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                site: r.site.clone(),
                points: vec![point],
            }),
        }
    }

    let chart = ScatterChart {
        title: scatter_title(site),
        x_label: PAYLOAD_COLUMN.to_string(),
        y_label: CLASS_COLUMN.to_string(),
        series,
    };
    log::debug!(
        "scatter for {site} [{}, {}]: {} points",
        payload.min,
        payload.max,
        chart.point_count()
    );
    chart
}

/// The pie shown when the control values could not be interpreted.
pub fn empty_pie(site: &SiteSelection) -> PieChart {
    PieChart {
        title: pie_title(site),
        slices: Vec::new(),
    }
}

/// The scatter shown when the control values could not be interpreted.
pub fn empty_scatter(site: &SiteSelection) -> ScatterChart {
    ScatterChart {
        title: scatter_title(site),
        x_label: PAYLOAD_COLUMN.to_string(),
        y_label: CLASS_COLUMN.to_string(),
        series: Vec::new(),
    }
}
