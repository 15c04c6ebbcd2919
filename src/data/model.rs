use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::DatasetError;

/// Sentinel dropdown option meaning "no site filter".
pub const ALL_SITES: &str = "All sites";

pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome. Ordered so that `Failure` (class 0) sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` value. Only exactly 0 or 1 are accepted.
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Failure)
        } else if value == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// SiteSelection – dropdown value
// ---------------------------------------------------------------------------

/// Either the "All sites" sentinel or one specific launch site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value; the sentinel maps to [`SiteSelection::All`].
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// The label shown in the dropdown and in chart titles.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(name) => name,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == site,
        }
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PayloadRange – slider value
// ---------------------------------------------------------------------------

/// Inclusive payload bounds in kilograms.
///
/// No normalisation happens on construction: a range whose `min` exceeds its
/// `max`, or that has a NaN bound, simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    pub min: f64,
    pub max: f64,
}

impl PayloadRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.min <= payload_mass_kg && payload_mass_kg <= self.max
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, immutable dataset with pre-computed site list and payload bounds.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in order of first appearance.
    sites: Vec<String>,
    min_payload: i64,
    max_payload: i64,
}

impl LaunchDataset {
    /// Build the derived indices. Fails on an empty record list, since the
    /// payload bounds would be undefined.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, DatasetError> {
        let first = records.first().ok_or(DatasetError::Empty)?;
        let mut min = first.payload_mass_kg;
        let mut max = first.payload_mass_kg;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut sites = Vec::new();
        for record in &records {
            min = min.min(record.payload_mass_kg);
            max = max.max(record.payload_mass_kg);
            if seen.insert(record.site.as_str()) {
                sites.push(record.site.clone());
            }
        }

        Ok(LaunchDataset {
            min_payload: min.trunc() as i64,
            max_payload: max.trunc() as i64,
            sites,
            records,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn min_payload(&self) -> i64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> i64 {
        self.max_payload
    }

    /// The slider's full extent, `[min_payload, max_payload]`.
    pub fn payload_bounds(&self) -> PayloadRange {
        PayloadRange::new(self.min_payload as f64, self.max_payload as f64)
    }

    /// Dropdown options: the "All sites" sentinel followed by every site.
    pub fn site_options(&self) -> Vec<String> {
        std::iter::once(ALL_SITES.to_string())
            .chain(self.sites.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) fn record(site: &str, payload_mass_kg: f64, class: u8) -> LaunchRecord {
    LaunchRecord {
        site: site.to_string(),
        payload_mass_kg,
        outcome: if class == 1 {
            Outcome::Success
        } else {
            Outcome::Failure
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_truncated_and_sites_keep_first_appearance_order() {
        let dataset = LaunchDataset::from_records(vec![
            record("VAFB SLC-4E", 9600.7, 1),
            record("CCAFS LC-40", 0.0, 0),
            record("VAFB SLC-4E", 500.9, 0),
            record("KSC LC-39A", 3170.2, 1),
        ])
        .unwrap();

        assert_eq!(dataset.min_payload(), 0);
        assert_eq!(dataset.max_payload(), 9600);
        assert_eq!(dataset.sites(), ["VAFB SLC-4E", "CCAFS LC-40", "KSC LC-39A"]);
        assert_eq!(
            dataset.site_options(),
            ["All sites", "VAFB SLC-4E", "CCAFS LC-40", "KSC LC-39A"]
        );
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            LaunchDataset::from_records(Vec::new()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn site_selection_parses_and_serializes_as_its_label() {
        assert_eq!(SiteSelection::parse("All sites"), SiteSelection::All);
        assert_eq!(
            SiteSelection::parse("CCAFS"),
            SiteSelection::Site("CCAFS".into())
        );
        assert_eq!(SiteSelection::Site("CCAFS".into()).to_string(), "CCAFS");
        assert!(SiteSelection::All.matches("anything"));
        assert!(!SiteSelection::Site("CCAFS".into()).matches("VAFB"));

        let json = serde_json::to_string(&SiteSelection::All).unwrap();
        assert_eq!(json, "\"All sites\"");
    }

    #[test]
    fn payload_range_is_inclusive_and_inverted_ranges_are_empty() {
        let range = PayloadRange::new(1000.0, 2000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(2000.0));
        assert!(!range.contains(2000.5));

        let inverted = PayloadRange::new(2000.0, 1000.0);
        assert!(!inverted.contains(1500.0));
        assert!(!PayloadRange::new(f64::NAN, 10.0).contains(5.0));
    }

    #[test]
    fn outcome_accepts_only_binary_classes() {
        assert_eq!(Outcome::from_class(1.0), Some(Outcome::Success));
        assert_eq!(Outcome::from_class(0.0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_class(2.0), None);
        assert_eq!(Outcome::from_class(0.5), None);
    }
}
