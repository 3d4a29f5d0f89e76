use serde::Serialize;

use crate::chart::{Chart, ChartKind};
use crate::dataset::numeric_cell;
use crate::filter::FilteredView;
use crate::stats::{self, HistogramBin, HISTOGRAM_BINS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Non-empty cells that went into the figures below.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Vec<HistogramBin>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistical {
    pub options: Vec<String>,
    pub metric: Option<String>,
    pub summary: Option<MetricSummary>,
}

pub fn compute(view: &FilteredView<'_>, metric: Option<&str>) -> Statistical {
    let dataset = view.dataset();
    let options: Vec<String> = dataset
        .numeric_columns()
        .into_iter()
        .map(str::to_string)
        .collect();

    let metric = match metric {
        Some(name) if dataset.numeric_column_index(name).is_some() => Some(name.to_string()),
        Some(name) => {
            log::warn!("{name:?} is not a numeric column");
            None
        }
        None => options.first().cloned(),
    };

    let summary = metric.as_deref().and_then(|name| {
        let index = dataset.numeric_column_index(name)?;
        let values: Vec<f64> = view
            .rows()
            .iter()
            .filter_map(|record| numeric_cell(record, index))
            .collect();
        Some(summarize(name, &values))
    });

    Statistical {
        options,
        metric,
        summary,
    }
}

fn summarize(name: &str, values: &[f64]) -> MetricSummary {
    let histogram = stats::histogram(values, HISTOGRAM_BINS);
    let chart = Chart::new(ChartKind::Histogram, format!("Distribution of {name}")).with_points(
        histogram
            .iter()
            .map(|bin| (format!("{:.2}-{:.2}", bin.lower, bin.upper), bin.count as f64)),
    );
    MetricSummary {
        count: values.len(),
        mean: stats::mean(values),
        median: stats::median(values),
        std_dev: stats::std_dev(values),
        min: stats::min(values),
        max: stats::max(values),
        histogram,
        chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::filter::{apply, Choice, Selection};

    #[test]
    fn defaults_to_first_numeric_column() {
        let dataset = sample();
        let statistical = compute(&FilteredView::all(&dataset), None);
        assert_eq!(statistical.metric.as_deref(), Some("year"));
        assert!(!statistical.options.iter().any(|o| o == "state"));
    }

    #[test]
    fn summarizes_total_enrollment() {
        let dataset = sample();
        let statistical = compute(&FilteredView::all(&dataset), Some("total_enrollment"));
        let summary = statistical.summary.unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, Some(92.0));
        assert_eq!(summary.median, Some(80.0));
        assert_eq!(summary.min, Some(30.0));
        assert_eq!(summary.max, Some(200.0));
        assert_eq!(summary.histogram.len(), HISTOGRAM_BINS);
        assert_eq!(
            summary.histogram.iter().map(|bin| bin.count).sum::<usize>(),
            5
        );
    }

    #[test]
    fn empty_view_has_undefined_figures() {
        let dataset = sample();
        let view = apply(
            &dataset,
            &Selection {
                quarters: Choice::any_of([8]),
                ..Selection::default()
            },
        );
        let summary = compute(&view, Some("total_enrollment")).summary.unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.std_dev, None);
        assert!(summary.histogram.is_empty());
    }

    #[test]
    fn unknown_metric_is_absorbed() {
        let dataset = sample();
        let statistical = compute(&FilteredView::all(&dataset), Some("district"));
        assert_eq!(statistical.metric, None);
        assert_eq!(statistical.summary, None);
    }
}
