//! One full evaluation of the dashboard: filter once, then run every block
//! against the same view.

use serde::Serialize;

use crate::blocks::comparative::{self, Comparative};
use crate::blocks::demographic::{self, Demographics};
use crate::blocks::explorer::{self, Explorer};
use crate::blocks::geographic::{self, Geographic};
use crate::blocks::kpi::{self, Kpis};
use crate::blocks::statistical::{self, Statistical};
use crate::blocks::temporal::{self, Temporal};
use crate::dataset::Dataset;
use crate::filter::{self, FilterOptions, Selection};

/// Per-block choices. `None` picks the same default the controls start with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderParams {
    pub focus_state: Option<String>,
    pub compare_states: Option<Vec<String>>,
    pub columns: Option<Vec<String>>,
    pub metric: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStatus {
    pub shown: usize,
    pub total: usize,
}

impl FilterStatus {
    pub fn is_filtered(&self) -> bool {
        self.shown < self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: Selection,
    pub options: FilterOptions,
    pub status: FilterStatus,
    pub kpis: Kpis,
    pub temporal: Temporal,
    pub geographic: Geographic,
    pub demographics: Demographics,
    pub comparative: Comparative,
    pub explorer: Explorer,
    pub statistical: Statistical,
}

/// Pure and idempotent: the same inputs always give the same dashboard.
pub fn render(dataset: &Dataset, selection: &Selection, params: &RenderParams) -> Dashboard {
    let view = filter::apply(dataset, selection);

    Dashboard {
        selection: selection.clone(),
        options: dataset.filter_options(),
        status: FilterStatus {
            shown: view.len(),
            total: dataset.len(),
        },
        kpis: kpi::compute(&view),
        temporal: temporal::compute(&view),
        geographic: geographic::compute(&view, params.focus_state.as_deref()),
        demographics: demographic::compute(&view),
        comparative: comparative::compute(&view, params.compare_states.as_deref()),
        explorer: explorer::compute(&view, params.columns.as_deref()),
        statistical: statistical::compute(&view, params.metric.as_deref()),
    }
}
