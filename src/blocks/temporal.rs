use serde::Serialize;

use crate::chart::{Chart, ChartKind};
use crate::filter::FilteredView;
use crate::models::GroupSummary;
use crate::stats::group_enrollment;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// 0 is Monday, 6 is Sunday.
pub fn day_name(day_of_week: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(day_of_week)).copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOfWeekSummary {
    pub day_of_week: u8,
    pub day_name: Option<&'static str>,
    pub total: u64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Temporal {
    pub monthly: Vec<GroupSummary<u8>>,
    pub quarterly: Vec<GroupSummary<u8>>,
    pub day_of_week: Vec<DayOfWeekSummary>,
    pub weekday_mean: Option<f64>,
    pub weekend_mean: Option<f64>,
    pub charts: Vec<Chart>,
}

pub fn compute(view: &FilteredView<'_>) -> Temporal {
    let rows = || view.rows().iter().copied();

    let monthly = group_enrollment(rows(), |r| r.month);
    let quarterly = group_enrollment(rows(), |r| r.quarter);
    let day_of_week: Vec<DayOfWeekSummary> = group_enrollment(rows(), |r| r.day_of_week)
        .into_iter()
        .map(|group| DayOfWeekSummary {
            day_of_week: group.key,
            day_name: day_name(group.key),
            total: group.total,
            mean: group.mean,
        })
        .collect();

    let split = group_enrollment(rows(), |r| r.is_weekend);
    let mean_for = |weekend: bool| {
        split
            .iter()
            .find(|group| group.key == weekend)
            .map(|group| group.mean)
    };
    let weekday_mean = mean_for(false);
    let weekend_mean = mean_for(true);

    let charts = vec![
        Chart::new(ChartKind::Bar, "Monthly Enrollment Analysis")
            .with_points(monthly.iter().map(|g| (g.key, g.total as f64))),
        Chart::new(ChartKind::Line, "Average Enrollment by Month")
            .with_points(monthly.iter().map(|g| (g.key, g.mean))),
        Chart::new(ChartKind::Bar, "Total Enrollment by Quarter")
            .with_points(quarterly.iter().map(|g| (g.key, g.total as f64))),
        Chart::new(ChartKind::Donut, "Enrollment Distribution by Quarter")
            .with_points(quarterly.iter().map(|g| (g.key, g.total as f64))),
        Chart::new(ChartKind::Bar, "Average Enrollment by Day of Week").with_points(
            day_of_week.iter().map(|d| {
                let label = d
                    .day_name
                    .map(str::to_string)
                    .unwrap_or_else(|| d.day_of_week.to_string());
                (label, d.mean)
            }),
        ),
    ];

    Temporal {
        monthly,
        quarterly,
        day_of_week,
        weekday_mean,
        weekend_mean,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::filter::{apply, DayType, Selection};

    #[test]
    fn groups_by_month_quarter_and_day() {
        let dataset = sample();
        let temporal = compute(&FilteredView::all(&dataset));

        let months: Vec<u8> = temporal.monthly.iter().map(|g| g.key).collect();
        assert_eq!(months, vec![1, 2, 4, 7, 11]);
        assert_eq!(temporal.quarterly.len(), 4);
        assert_eq!(temporal.quarterly[0].total, 150);
        assert_eq!(temporal.quarterly[0].mean, 75.0);

        let monday = &temporal.day_of_week[0];
        assert_eq!(monday.day_name, Some("Monday"));
        assert_eq!(monday.total, 100);
        let sunday = temporal.day_of_week.last().unwrap();
        assert_eq!(sunday.day_name, Some("Sunday"));
    }

    #[test]
    fn weekend_and_weekday_means() {
        let dataset = sample();
        let temporal = compute(&FilteredView::all(&dataset));
        assert_eq!(temporal.weekday_mean, Some(110.0));
        assert_eq!(temporal.weekend_mean, Some(65.0));

        let weekdays = apply(
            &dataset,
            &Selection {
                day_type: DayType::WeekdayOnly,
                ..Selection::default()
            },
        );
        let temporal = compute(&weekdays);
        assert_eq!(temporal.weekend_mean, None);
    }

    #[test]
    fn unknown_day_code_has_no_name() {
        assert_eq!(day_name(7), None);
        assert_eq!(day_name(3), Some("Thursday"));
    }
}
