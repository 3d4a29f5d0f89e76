//! Selection state and the filter that derives a view from it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::models::EnrollmentRecord;

/// Label that stands for "every value" in a multi-select.
pub const ALL: &str = "All";

/// One multi-select dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Choice<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: Ord> Choice<T> {
    /// An empty selection means no constraint.
    pub fn any_of(values: impl IntoIterator<Item = T>) -> Self {
        let values: BTreeSet<T> = values.into_iter().collect();
        if values.is_empty() {
            Choice::All
        } else {
            Choice::Only(values)
        }
    }

    pub fn allows(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(values) => values.contains(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T: Ord + FromStr> Choice<T> {
    /// Builds a choice from widget labels. The [`ALL`] sentinel anywhere in the
    /// list wins over concrete values.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, T::Err> {
        if labels
            .iter()
            .any(|label| label.as_ref().trim().eq_ignore_ascii_case(ALL))
        {
            return Ok(Choice::All);
        }
        let values = labels
            .iter()
            .map(|label| label.as_ref().trim().parse::<T>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Choice::any_of(values))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum DayType {
    #[default]
    All,
    WeekdayOnly,
    WeekendOnly,
}

impl DayType {
    pub fn allows(self, is_weekend: bool) -> bool {
        match self {
            DayType::All => true,
            DayType::WeekdayOnly => !is_weekend,
            DayType::WeekendOnly => is_weekend,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayType::All => "All",
            DayType::WeekdayOnly => "Weekday Only",
            DayType::WeekendOnly => "Weekend Only",
        };
        f.write_str(label)
    }
}

/// The four filter dimensions. Every dimension defaults to all values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub states: Choice<String>,
    pub years: Choice<i32>,
    pub quarters: Choice<u8>,
    pub day_type: DayType,
}

impl Selection {
    pub fn matches(&self, record: &EnrollmentRecord) -> bool {
        self.states.allows(&record.state)
            && self.years.allows(&record.year)
            && self.quarters.allows(&record.quarter)
            && self.day_type.allows(record.is_weekend)
    }
}

/// Read-only subset of a dataset, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<&'a EnrollmentRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            rows: dataset.records().iter().collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn rows(&self) -> &[&'a EnrollmentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of the view belonging to one state.
    pub fn for_state(&self, state: &str) -> FilteredView<'a> {
        FilteredView {
            dataset: self.dataset,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|record| record.state == state)
                .collect(),
        }
    }

    /// Sorted distinct states present in the view.
    pub fn states(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|record| record.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

pub fn apply<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let rows: Vec<&EnrollmentRecord> = dataset
        .records()
        .iter()
        .filter(|record| selection.matches(record))
        .collect();
    log::debug!("filter kept {} of {} records", rows.len(), dataset.len());
    FilteredView { dataset, rows }
}

/// Values offered by the state, year and quarter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub years: Vec<i32>,
    pub quarters: Vec<u8>,
}

impl FilterOptions {
    pub fn from_records<'a>(records: impl Iterator<Item = &'a EnrollmentRecord>) -> Self {
        let mut states = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut quarters = BTreeSet::new();
        for record in records {
            states.insert(record.state.clone());
            years.insert(record.year);
            quarters.insert(record.quarter);
        }
        Self {
            states: states.into_iter().collect(),
            years: years.into_iter().collect(),
            quarters: quarters.into_iter().collect(),
        }
    }
}
