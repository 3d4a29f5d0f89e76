use serde::Serialize;

use crate::chart::{Chart, ChartKind};
use crate::filter::FilteredView;
use crate::stats::percentage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroupTotal {
    pub age_group: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinorAdultSplit {
    pub minors: u64,
    pub adults: u64,
    /// `None` when there are neither minors nor adults.
    pub minor_percentage: Option<f64>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Demographics {
    /// The dataset has no age bracket columns.
    Unavailable,
    Available {
        age_groups: Vec<AgeGroupTotal>,
        minor_split: Option<MinorAdultSplit>,
        charts: Vec<Chart>,
    },
}

pub fn compute(view: &FilteredView<'_>) -> Demographics {
    let capabilities = view.dataset().capabilities();
    if !capabilities.age_brackets {
        return Demographics::Unavailable;
    }

    let (mut under_5, mut age_5_17, mut adults) = (0u64, 0u64, 0u64);
    for age in view.rows().iter().filter_map(|r| r.age) {
        under_5 += age.age_0_5;
        age_5_17 += age.age_5_17;
        adults += age.age_18_greater;
    }

    let age_groups = vec![
        AgeGroupTotal {
            age_group: "0-5 years",
            count: under_5,
        },
        AgeGroupTotal {
            age_group: "5-17 years",
            count: age_5_17,
        },
        AgeGroupTotal {
            age_group: "18+ years",
            count: adults,
        },
    ];

    let minor_split = capabilities.minor_split.then(|| {
        let minors: u64 = view.rows().iter().filter_map(|r| r.minor_count).sum();
        MinorAdultSplit {
            minors,
            adults,
            minor_percentage: percentage(minors, minors + adults),
            chart: Chart::new(ChartKind::Donut, "Minor vs Adult Distribution").with_points([
                ("Minors (0-17)", minors as f64),
                ("Adults (18+)", adults as f64),
            ]),
        }
    });

    let points = || age_groups.iter().map(|g| (g.age_group, g.count as f64));
    let charts = vec![
        Chart::new(ChartKind::Donut, "Age Group Distribution").with_points(points()),
        Chart::new(ChartKind::Bar, "Enrollment Count by Age Group").with_points(points()),
    ];

    Demographics::Available {
        age_groups,
        minor_split,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::dataset::Dataset;
    use crate::filter::{apply, Choice, Selection};

    #[test]
    fn sums_brackets_and_minor_split() {
        let dataset = sample();
        match compute(&FilteredView::all(&dataset)) {
            Demographics::Available {
                age_groups,
                minor_split,
                ..
            } => {
                let counts: Vec<u64> = age_groups.iter().map(|g| g.count).collect();
                assert_eq!(counts, vec![46, 164, 250]);
                let split = minor_split.unwrap();
                assert_eq!(split.minors, 210);
                assert_eq!(split.adults, 250);
                let pct = split.minor_percentage.unwrap();
                assert!((pct - 210.0 / 460.0 * 100.0).abs() < 1e-9);
                assert!((0.0..=100.0).contains(&pct));
            }
            Demographics::Unavailable => panic!("sample carries age brackets"),
        }
    }

    #[test]
    fn zero_population_has_no_percentage() {
        let dataset = sample();
        let view = apply(
            &dataset,
            &Selection {
                states: Choice::any_of(["Nowhere".to_string()]),
                ..Selection::default()
            },
        );
        let Demographics::Available { minor_split, .. } = compute(&view) else {
            panic!("capabilities do not depend on the view");
        };
        let split = minor_split.unwrap();
        assert_eq!(split.minors + split.adults, 0);
        assert_eq!(split.minor_percentage, None);
    }

    #[test]
    fn missing_columns_disable_the_block() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment
A,X,2023,1,1,0,0,100
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            compute(&FilteredView::all(&dataset)),
            Demographics::Unavailable
        );
    }

    #[test]
    fn split_absent_without_minor_count() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,age_0_5,age_5_17,age_18_greater
A,X,2023,1,1,0,0,100,1,2,3
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let Demographics::Available { minor_split, .. } = compute(&FilteredView::all(&dataset))
        else {
            panic!("age brackets are present");
        };
        assert!(minor_split.is_none());
    }
}
