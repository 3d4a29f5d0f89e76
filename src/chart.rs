//! Chart descriptors handed to whatever draws the dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    Pie,
    Donut,
    Treemap,
    Sunburst,
    Choropleth,
    Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Series name for multi-line charts, parent node for hierarchies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl Chart {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            points: Vec::new(),
        }
    }

    pub fn with_points<L, I>(mut self, points: I) -> Self
    where
        L: ToString,
        I: IntoIterator<Item = (L, f64)>,
    {
        self.points.extend(points.into_iter().map(|(label, value)| ChartPoint {
            label: label.to_string(),
            value,
            series: None,
        }));
        self
    }

    pub fn with_series_points<L, S, I>(mut self, points: I) -> Self
    where
        L: ToString,
        S: ToString,
        I: IntoIterator<Item = (S, L, f64)>,
    {
        self.points
            .extend(points.into_iter().map(|(series, label, value)| ChartPoint {
                label: label.to_string(),
                value,
                series: Some(series.to_string()),
            }));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
