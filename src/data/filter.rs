use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Filter state: the current value of both controls
// ---------------------------------------------------------------------------

/// Dropdown + range slider values. Owned by whichever front end is driving
/// the dashboard; the dataset itself never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl FilterState {
    /// "All sites" over the full payload extent of the dataset.
    pub fn initial(dataset: &LaunchDataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload: dataset.payload_bounds(),
        }
    }
}

/// Records belonging to the selected site (every record for "All sites").
pub fn site_records<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset.records().iter().filter(move |r| site.matches(&r.site))
}

/// Return indices of records matching both the site and the payload range.
pub fn filtered_indices(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    payload: &PayloadRange,
) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| site.matches(&r.site) && payload.contains(r.payload_mass_kg))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("CCAFS", 500.0, 1),
            record("VAFB", 1500.0, 0),
            record("CCAFS", 2500.0, 0),
            record("KSC", 4000.0, 1),
        ])
        .unwrap()
    }

    #[test]
    fn initial_state_covers_everything() {
        let ds = dataset();
        let state = FilterState::initial(&ds);
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload, PayloadRange::new(500.0, 4000.0));
        assert_eq!(
            filtered_indices(&ds, &state.site, &state.payload),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn site_and_range_are_combined() {
        let ds = dataset();
        let ccafs = SiteSelection::Site("CCAFS".into());
        assert_eq!(
            filtered_indices(&ds, &ccafs, &PayloadRange::new(0.0, 10_000.0)),
            vec![0, 2]
        );
        assert_eq!(
            filtered_indices(&ds, &ccafs, &PayloadRange::new(1000.0, 3000.0)),
            vec![2]
        );
        assert_eq!(
            filtered_indices(&ds, &SiteSelection::All, &PayloadRange::new(1500.0, 2500.0)),
            vec![1, 2]
        );
        assert_eq!(site_records(&ds, &ccafs).count(), 2);
    }
}
