use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::{Chart, ChartKind};
use crate::filter::FilteredView;
use crate::models::GroupSummary;
use crate::stats::{self, group_enrollment};

pub const MAX_COMPARED_STATES: usize = 5;
const DEFAULT_COMPARED_STATES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMonthTotal {
    pub state: String,
    pub month: u8,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSpread {
    pub state: String,
    pub total: u64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateComparison {
    pub options: Vec<String>,
    pub selected: Vec<String>,
    pub monthly: Vec<StateMonthTotal>,
    pub spread: Vec<StateSpread>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub total: u64,
    pub mean: f64,
    /// Undefined for the first year and after a year with no enrollments.
    pub growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    pub years: Vec<YearSummary>,
    pub charts: Vec<Chart>,
}

impl YearOverYear {
    /// Growth needs at least two years to compare.
    pub fn is_comparable(&self) -> bool {
        self.years.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparative {
    pub states: StateComparison,
    pub year_over_year: YearOverYear,
}

pub fn compute(view: &FilteredView<'_>, compare_states: Option<&[String]>) -> Comparative {
    Comparative {
        states: compare(view, compare_states),
        year_over_year: year_over_year(view),
    }
}

/// Per-state monthly totals and spread for up to five states. Without an
/// explicit choice the first three states of the view are compared.
pub fn compare(view: &FilteredView<'_>, compare_states: Option<&[String]>) -> StateComparison {
    let options = view.states();
    let mut selected: Vec<String> = match compare_states {
        Some(states) => {
            let mut unique: Vec<String> = Vec::new();
            for state in states {
                if !unique.contains(state) {
                    unique.push(state.clone());
                }
            }
            unique
        }
        None => options
            .iter()
            .take(DEFAULT_COMPARED_STATES)
            .cloned()
            .collect(),
    };
    if selected.len() > MAX_COMPARED_STATES {
        log::warn!(
            "comparing the first {MAX_COMPARED_STATES} of {} requested states",
            selected.len()
        );
        selected.truncate(MAX_COMPARED_STATES);
    }

    let mut monthly_totals: BTreeMap<(&str, u8), u64> = BTreeMap::new();
    let mut values: BTreeMap<&str, (u64, Vec<f64>)> = BTreeMap::new();
    for record in view.rows() {
        if !selected.contains(&record.state) {
            continue;
        }
        *monthly_totals
            .entry((record.state.as_str(), record.month))
            .or_default() += record.total_enrollment;
        let (total, state_values) = values.entry(record.state.as_str()).or_default();
        *total += record.total_enrollment;
        state_values.push(record.total_enrollment as f64);
    }

    let monthly: Vec<StateMonthTotal> = monthly_totals
        .into_iter()
        .map(|((state, month), total)| StateMonthTotal {
            state: state.to_string(),
            month,
            total,
        })
        .collect();

    let spread = values
        .into_iter()
        .map(|(state, (total, values))| StateSpread {
            state: state.to_string(),
            total,
            mean: stats::mean(&values),
            median: stats::median(&values),
            std_dev: stats::std_dev(&values),
        })
        .collect();

    let chart = Chart::new(ChartKind::Line, "Monthly Enrollment Comparison").with_series_points(
        monthly
            .iter()
            .map(|point| (&point.state, point.month, point.total as f64)),
    );

    StateComparison {
        options,
        selected,
        monthly,
        spread,
        chart,
    }
}

pub fn year_over_year(view: &FilteredView<'_>) -> YearOverYear {
    let yearly: Vec<GroupSummary<i32>> = group_enrollment(view.rows().iter().copied(), |r| r.year);
    let totals: Vec<f64> = yearly.iter().map(|g| g.total as f64).collect();
    let years: Vec<YearSummary> = yearly
        .iter()
        .zip(stats::pct_change(&totals))
        .map(|(group, growth_pct)| YearSummary {
            year: group.key,
            total: group.total,
            mean: group.mean,
            growth_pct,
        })
        .collect();

    let charts = vec![
        Chart::new(ChartKind::Bar, "Total Enrollment by Year")
            .with_points(years.iter().map(|y| (y.year, y.total as f64))),
        Chart::new(ChartKind::Line, "Year-over-Year Growth Rate (%)").with_points(
            years
                .iter()
                .filter_map(|y| y.growth_pct.map(|growth| (y.year, growth))),
        ),
    ];

    YearOverYear { years, charts }
}
