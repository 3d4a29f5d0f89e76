use serde::Serialize;

use crate::chart::{Chart, ChartKind};
use crate::filter::FilteredView;
use crate::models::{DistrictSummary, GroupSummary};
use crate::stats::{self, group_enrollment, rank_by_total};

pub const TREEMAP_TOP: usize = 30;
pub const SUNBURST_TOP: usize = 20;
pub const DISTRICT_BAR_TOP: usize = 20;
pub const STATE_BAR_TOP: usize = 15;
pub const TOP_LIST: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTotal {
    pub state: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Alphabetical by state.
    pub states: Vec<GroupSummary<String>>,
    pub highest: Option<StateTotal>,
    pub lowest: Option<StateTotal>,
    pub average_per_state: Option<f64>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDown {
    pub options: Vec<String>,
    pub focus_state: Option<String>,
    /// Districts of the focus state, highest total first.
    pub districts: Vec<GroupSummary<String>>,
    pub total_enrollment: u64,
    pub average_per_district: Option<f64>,
    pub charts: Vec<Chart>,
}

impl DrillDown {
    pub fn top_districts(&self) -> &[GroupSummary<String>] {
        &self.districts[..self.districts.len().min(TOP_LIST)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRanking {
    /// Highest total first.
    pub states: Vec<GroupSummary<String>>,
    pub highest_total: Option<u64>,
    pub top_state: Option<String>,
    pub chart: Chart,
}

impl StateRanking {
    pub fn top_states(&self) -> &[GroupSummary<String>] {
        &self.states[..self.states.len().min(TOP_LIST)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictRanking {
    /// Every (state, district) pair, highest total first.
    pub districts: Vec<DistrictSummary>,
    pub top_district: Option<String>,
    pub highest_total: Option<u64>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geographic {
    pub map: MapView,
    pub drill_down: DrillDown,
    pub state_ranking: StateRanking,
    pub district_ranking: DistrictRanking,
}

pub fn compute(view: &FilteredView<'_>, focus_state: Option<&str>) -> Geographic {
    let by_state = group_enrollment(view.rows().iter().copied(), |r| r.state.clone());
    Geographic {
        map: map_view(&by_state),
        drill_down: drill_down(view, focus_state),
        state_ranking: state_ranking(by_state),
        district_ranking: district_ranking(view),
    }
}

fn map_view(by_state: &[GroupSummary<String>]) -> MapView {
    let as_total = |group: &GroupSummary<String>| StateTotal {
        state: group.key.clone(),
        total: group.total,
    };
    let totals: Vec<f64> = by_state.iter().map(|g| g.total as f64).collect();

    MapView {
        states: by_state.to_vec(),
        highest: by_state
            .iter()
            .rev()
            .max_by_key(|g| g.total)
            .map(as_total),
        lowest: by_state.iter().min_by_key(|g| g.total).map(as_total),
        average_per_state: stats::mean(&totals),
        chart: Chart::new(ChartKind::Choropleth, "Total Enrollment by State")
            .with_points(by_state.iter().map(|g| (&g.key, g.total as f64))),
    }
}

/// District breakdown inside one state. Without an explicit focus the first
/// state of the view is used; a focus outside the view yields no districts.
pub fn drill_down(view: &FilteredView<'_>, focus_state: Option<&str>) -> DrillDown {
    let options = view.states();
    let focus_state = match focus_state {
        Some(state) => {
            if !options.iter().any(|option| option == state) {
                log::warn!("drill-down state {state:?} has no rows in the current view");
            }
            Some(state.to_string())
        }
        None => options.first().cloned(),
    };

    let mut districts = match &focus_state {
        Some(state) => group_enrollment(view.for_state(state).rows().iter().copied(), |r| {
            r.district.clone()
        }),
        None => Vec::new(),
    };
    rank_by_total(&mut districts);

    let means: Vec<f64> = districts.iter().map(|g| g.mean).collect();
    let label = focus_state.clone().unwrap_or_default();
    let top = |n: usize| districts.iter().take(n);

    let charts = vec![
        Chart::new(ChartKind::Treemap, format!("Top {TREEMAP_TOP} Districts Treemap"))
            .with_points(top(TREEMAP_TOP).map(|g| (&g.key, g.total as f64))),
        Chart::new(
            ChartKind::Sunburst,
            format!("Top {SUNBURST_TOP} Districts Hierarchy"),
        )
        .with_series_points(top(SUNBURST_TOP).map(|g| (&label, &g.key, g.total as f64))),
        Chart::new(
            ChartKind::HorizontalBar,
            format!("Top {DISTRICT_BAR_TOP} Districts in {label}"),
        )
        .with_points(top(DISTRICT_BAR_TOP).map(|g| (&g.key, g.total as f64))),
    ];

    DrillDown {
        options,
        focus_state,
        total_enrollment: districts.iter().map(|g| g.total).sum(),
        average_per_district: stats::mean(&means),
        districts,
        charts,
    }
}

fn state_ranking(mut states: Vec<GroupSummary<String>>) -> StateRanking {
    rank_by_total(&mut states);
    let chart = Chart::new(
        ChartKind::HorizontalBar,
        format!("Top {STATE_BAR_TOP} States by Total Enrollment"),
    )
    .with_points(
        states
            .iter()
            .take(STATE_BAR_TOP)
            .map(|g| (&g.key, g.total as f64)),
    );

    StateRanking {
        highest_total: states.first().map(|g| g.total),
        top_state: states.first().map(|g| g.key.clone()),
        states,
        chart,
    }
}

fn district_ranking(view: &FilteredView<'_>) -> DistrictRanking {
    let mut grouped = group_enrollment(view.rows().iter().copied(), |r| {
        (r.state.clone(), r.district.clone())
    });
    rank_by_total(&mut grouped);

    let districts: Vec<DistrictSummary> = grouped
        .into_iter()
        .map(|group| {
            let (state, district) = group.key;
            DistrictSummary {
                state,
                district,
                total: group.total,
                mean: group.mean,
                records: group.records,
            }
        })
        .collect();

    let chart = Chart::new(
        ChartKind::HorizontalBar,
        format!("Top {DISTRICT_BAR_TOP} Districts by Total Enrollment"),
    )
    .with_points(
        districts
            .iter()
            .take(DISTRICT_BAR_TOP)
            .map(|d| (d.label(), d.total as f64)),
    );

    DistrictRanking {
        top_district: districts.first().map(|d| d.district.clone()),
        highest_total: districts.first().map(|d| d.total),
        districts,
        chart,
    }
}
