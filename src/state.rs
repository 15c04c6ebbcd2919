use std::sync::Arc;

use crate::chart::{update_pie, update_scatter, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};
use crate::layout::{build_layout, Layout, PIE_CHART_ID, SCATTER_CHART_ID};

// ---------------------------------------------------------------------------
// Control events
// ---------------------------------------------------------------------------

/// A change to one of the two dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SiteChanged(SiteSelection),
    PayloadChanged(PayloadRange),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Charts are recomputed only when an event touches one of their inputs:
/// the pie depends on the site, the scatter on site and payload range.
pub struct AppState {
    dataset: Arc<LaunchDataset>,
    pub layout: Layout,
    filters: FilterState,
    pie: PieChart,
    scatter: ScatterChart,

    /// Indices of records behind the current scatter (cached).
    visible_indices: Vec<usize>,

    /// One colour per site, in dataset order.
    pub color_map: ColorMap,
}

impl AppState {
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        let filters = FilterState::initial(&dataset);
        let pie = update_pie(&dataset, &filters.site);
        let scatter = update_scatter(&dataset, &filters.site, &filters.payload);
        let visible_indices = filtered_indices(&dataset, &filters.site, &filters.payload);
        let color_map = ColorMap::new(dataset.sites());

        Self {
            layout: build_layout(&dataset),
            dataset,
            filters,
            pie,
            scatter,
            visible_indices,
            color_map,
        }
    }

    /// Route a control change to the affected updaters. Returns the IDs of
    /// the chart regions that were recomputed; an event that leaves the
    /// control value unchanged recomputes nothing.
    pub fn apply(&mut self, event: ControlEvent) -> Vec<&'static str> {
        match event {
            ControlEvent::SiteChanged(site) => {
                if site == self.filters.site {
                    return Vec::new();
                }
                log::debug!("site changed to {site}");
                self.filters.site = site;
                self.pie = update_pie(&self.dataset, &self.filters.site);
                self.refresh_scatter();
                vec![PIE_CHART_ID, SCATTER_CHART_ID]
            }
            ControlEvent::PayloadChanged(range) => {
                if range == self.filters.payload {
                    return Vec::new();
                }
                log::debug!("payload range changed to [{}, {}]", range.min, range.max);
                self.filters.payload = range;
                self.refresh_scatter();
                vec![SCATTER_CHART_ID]
            }
        }
    }

    /// Put both controls back to their initial values.
    pub fn reset(&mut self) -> Vec<&'static str> {
        let initial = FilterState::initial(&self.dataset);
        let mut updated = self.apply(ControlEvent::SiteChanged(initial.site));
        for id in self.apply(ControlEvent::PayloadChanged(initial.payload)) {
            if !updated.contains(&id) {
                updated.push(id);
            }
        }
        updated
    }

    fn refresh_scatter(&mut self) {
        let FilterState { site, payload } = &self.filters;
        self.scatter = update_scatter(&self.dataset, site, payload);
        self.visible_indices = filtered_indices(&self.dataset, site, payload);
    }

    pub fn dataset(&self) -> &LaunchDataset {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pie(&self) -> &PieChart {
        &self.pie
    }

    pub fn scatter(&self) -> &ScatterChart {
        &self.scatter
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }
}
