use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::blocks::demographic::Demographics;
use crate::blocks::temporal::day_name;
use crate::dashboard::Dashboard;
use crate::filter::Choice;

const NOT_AVAILABLE: &str = "N/A";
const NO_DATA: &str = "No data for the current filters.";

pub fn build_report(dashboard: &Dashboard, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Aadhaar Enrollment Analytics");
    let _ = writeln!(
        output,
        "Generated {} for states: {}, years: {}, quarters: {}, day type: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        describe(&dashboard.selection.states),
        describe(&dashboard.selection.years),
        describe(&dashboard.selection.quarters),
        dashboard.selection.day_type
    );
    let _ = writeln!(output);
    if dashboard.status.is_filtered() {
        let _ = writeln!(
            output,
            "Showing {} records out of {} total records (filtered).",
            format_count(dashboard.status.shown as u64),
            format_count(dashboard.status.total as u64)
        );
    } else {
        let _ = writeln!(
            output,
            "Showing all {} records.",
            format_count(dashboard.status.total as u64)
        );
    }

    write_kpis(&mut output, dashboard);
    write_temporal(&mut output, dashboard);
    write_geographic(&mut output, dashboard);
    write_demographics(&mut output, dashboard);
    write_comparative(&mut output, dashboard);
    write_explorer(&mut output, dashboard);
    write_statistical(&mut output, dashboard);

    output
}

fn write_kpis(output: &mut String, dashboard: &Dashboard) {
    let kpis = &dashboard.kpis;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Performance Indicators");
    let _ = writeln!(
        output,
        "- Total Enrollments: {}",
        format_count(kpis.total_enrollment)
    );
    let _ = writeln!(
        output,
        "- Average Enrollment: {}",
        format_number(kpis.mean_enrollment, 0)
    );
    let _ = writeln!(output, "- Total States: {}", kpis.state_count);
    let _ = writeln!(output, "- Total Districts: {}", kpis.district_count);
    let _ = writeln!(
        output,
        "- Total Records: {}",
        format_count(kpis.record_count as u64)
    );
}

fn write_temporal(output: &mut String, dashboard: &Dashboard) {
    let temporal = &dashboard.temporal;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Temporal Analysis");

    let _ = writeln!(output, "### Monthly Trends");
    write_table(
        output,
        &["Month", "Total Enrollment", "Avg Enrollment", "Records"],
        temporal
            .monthly
            .iter()
            .map(|g| {
                vec![
                    g.key.to_string(),
                    format_count(g.total),
                    format_number(Some(g.mean), 0),
                    g.records.to_string(),
                ]
            })
            .collect(),
    );

    let _ = writeln!(output, "### Quarterly Analysis");
    write_table(
        output,
        &["Quarter", "Total Enrollment", "Avg Enrollment"],
        temporal
            .quarterly
            .iter()
            .map(|g| {
                vec![
                    g.key.to_string(),
                    format_count(g.total),
                    format_number(Some(g.mean), 0),
                ]
            })
            .collect(),
    );

    let _ = writeln!(output, "### Day of Week");
    write_table(
        output,
        &["Day", "Total Enrollment", "Avg Enrollment"],
        temporal
            .day_of_week
            .iter()
            .map(|d| {
                vec![
                    day_name(d.day_of_week)
                        .map(str::to_string)
                        .unwrap_or_else(|| d.day_of_week.to_string()),
                    format_count(d.total),
                    format_number(Some(d.mean), 0),
                ]
            })
            .collect(),
    );
    let _ = writeln!(
        output,
        "- Weekday Avg Enrollment: {}",
        format_number(temporal.weekday_mean, 0)
    );
    let _ = writeln!(
        output,
        "- Weekend Avg Enrollment: {}",
        format_number(temporal.weekend_mean, 0)
    );
}

fn write_geographic(output: &mut String, dashboard: &Dashboard) {
    let geo = &dashboard.geographic;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Geographic Analysis");

    let _ = writeln!(output, "### State Map");
    match (&geo.map.highest, &geo.map.lowest) {
        (Some(highest), Some(lowest)) => {
            let _ = writeln!(
                output,
                "- Highest Enrollment State: {} ({})",
                highest.state,
                format_count(highest.total)
            );
            let _ = writeln!(
                output,
                "- Lowest Enrollment State: {} ({})",
                lowest.state,
                format_count(lowest.total)
            );
        }
        _ => {
            let _ = writeln!(output, "- Highest Enrollment State: {NOT_AVAILABLE}");
            let _ = writeln!(output, "- Lowest Enrollment State: {NOT_AVAILABLE}");
        }
    }
    let _ = writeln!(
        output,
        "- Average per State: {}",
        format_number(geo.map.average_per_state, 0)
    );

    let drill = &geo.drill_down;
    match &drill.focus_state {
        Some(state) => {
            let _ = writeln!(output, "### Districts in {state}");
            let _ = writeln!(output, "- Total Districts: {}", drill.districts.len());
            let _ = writeln!(
                output,
                "- Total Enrollments: {}",
                format_count(drill.total_enrollment)
            );
            let _ = writeln!(
                output,
                "- Average per District: {}",
                format_number(drill.average_per_district, 0)
            );
            write_table(
                output,
                &["District", "Total Enrollment", "Avg Enrollment", "Records"],
                drill
                    .districts
                    .iter()
                    .map(|g| {
                        vec![
                            g.key.clone(),
                            format_count(g.total),
                            format_number(Some(g.mean), 0),
                            g.records.to_string(),
                        ]
                    })
                    .collect(),
            );
        }
        None => {
            let _ = writeln!(output, "### District Drill-down");
            let _ = writeln!(output, "No states available for drill-down.");
        }
    }

    let ranking = &geo.state_ranking;
    let _ = writeln!(output, "### State-wise Statistics");
    let _ = writeln!(output, "- Total States: {}", ranking.states.len());
    let _ = writeln!(
        output,
        "- Highest Enrollment: {}",
        ranking
            .highest_total
            .map(format_count)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    );
    let _ = writeln!(
        output,
        "- Top State: {}",
        ranking.top_state.as_deref().unwrap_or(NOT_AVAILABLE)
    );
    write_table(
        output,
        &["State", "Total Enrollment", "Avg Enrollment", "Records"],
        ranking
            .states
            .iter()
            .map(|g| {
                vec![
                    g.key.clone(),
                    format_count(g.total),
                    format_number(Some(g.mean), 0),
                    g.records.to_string(),
                ]
            })
            .collect(),
    );

    let districts = &geo.district_ranking;
    let _ = writeln!(output, "### District-wise Analysis");
    let _ = writeln!(output, "- Total Districts: {}", districts.districts.len());
    let _ = writeln!(
        output,
        "- Top District: {}",
        districts.top_district.as_deref().unwrap_or(NOT_AVAILABLE)
    );
    write_table(
        output,
        &["State", "District", "Total Enrollment", "Avg Enrollment", "Records"],
        districts
            .districts
            .iter()
            .map(|d| {
                vec![
                    d.state.clone(),
                    d.district.clone(),
                    format_count(d.total),
                    format_number(Some(d.mean), 0),
                    d.records.to_string(),
                ]
            })
            .collect(),
    );
}

fn write_demographics(output: &mut String, dashboard: &Dashboard) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Demographic Analysis");
    match &dashboard.demographics {
        Demographics::Unavailable => {
            let _ = writeln!(output, "Warning: age group data not available in this dataset.");
        }
        Demographics::Available {
            age_groups,
            minor_split,
            ..
        } => {
            for group in age_groups {
                let _ = writeln!(output, "- {}: {}", group.age_group, format_count(group.count));
            }
            if let Some(split) = minor_split {
                let _ = writeln!(output, "### Minor vs Adult Enrollment");
                let _ = writeln!(output, "- Total Minors: {}", format_count(split.minors));
                let _ = writeln!(output, "- Total Adults: {}", format_count(split.adults));
                let _ = writeln!(
                    output,
                    "- Minor Percentage: {}",
                    split
                        .minor_percentage
                        .map(|pct| format!("{pct:.1}%"))
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
                );
            }
        }
    }
}

fn write_comparative(output: &mut String, dashboard: &Dashboard) {
    let comparison = &dashboard.comparative.states;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Comparative Analysis");
    let _ = writeln!(output, "### State Comparison");
    if comparison.selected.is_empty() {
        let _ = writeln!(output, "No states selected for comparison.");
    } else {
        let _ = writeln!(output, "Comparing: {}", comparison.selected.join(", "));
        write_table(
            output,
            &["State", "Total", "Mean", "Median", "Std Dev"],
            comparison
                .spread
                .iter()
                .map(|s| {
                    vec![
                        s.state.clone(),
                        format_count(s.total),
                        format_number(s.mean, 2),
                        format_number(s.median, 2),
                        format_number(s.std_dev, 2),
                    ]
                })
                .collect(),
        );
    }

    let yoy = &dashboard.comparative.year_over_year;
    let _ = writeln!(output, "### Year-over-Year");
    if yoy.is_comparable() {
        write_table(
            output,
            &["Year", "Total Enrollment", "Avg Enrollment", "Growth %"],
            yoy.years
                .iter()
                .map(|y| {
                    vec![
                        y.year.to_string(),
                        format_count(y.total),
                        format_number(Some(y.mean), 0),
                        format_number(y.growth_pct, 1),
                    ]
                })
                .collect(),
        );
    } else {
        let _ = writeln!(output, "Multiple years needed for year-over-year comparison.");
    }
}

fn write_explorer(output: &mut String, dashboard: &Dashboard) {
    let explorer = &dashboard.explorer;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Data Explorer");
    if explorer.columns.is_empty() {
        let _ = writeln!(output, "No columns selected.");
        return;
    }
    let headers: Vec<&str> = explorer.columns.iter().map(String::as_str).collect();
    write_table(output, &headers, explorer.rows.clone());
    let _ = writeln!(
        output,
        "Showing {} of {} rows. Full export: `{}`",
        explorer.rows.len(),
        explorer.total_rows,
        explorer.export_file_name
    );
}

fn write_statistical(output: &mut String, dashboard: &Dashboard) {
    let statistical = &dashboard.statistical;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Statistical Summary");
    let (Some(metric), Some(summary)) = (&statistical.metric, &statistical.summary) else {
        let _ = writeln!(output, "No numeric metric selected.");
        return;
    };
    let _ = writeln!(output, "### {metric}");
    let _ = writeln!(output, "- Mean: {}", format_number(summary.mean, 2));
    let _ = writeln!(output, "- Median: {}", format_number(summary.median, 2));
    let _ = writeln!(output, "- Std Dev: {}", format_number(summary.std_dev, 2));
    let _ = writeln!(output, "- Min: {}", format_number(summary.min, 2));
    let _ = writeln!(output, "- Max: {}", format_number(summary.max, 2));
    let busiest = summary.histogram.iter().max_by_key(|bin| bin.count);
    if let Some(bin) = busiest {
        let _ = writeln!(
            output,
            "- Most frequent range: {:.2} to {:.2} ({} values)",
            bin.lower, bin.upper, bin.count
        );
    }
}

fn write_table(output: &mut String, headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        let _ = writeln!(output, "{NO_DATA}");
        return;
    }
    let _ = writeln!(output, "| {} |", headers.join(" | "));
    let _ = writeln!(output, "|{}", " --- |".repeat(headers.len()));
    for row in rows {
        let _ = writeln!(output, "| {} |", row.join(" | "));
    }
}

fn describe<T: Ord + ToString>(choice: &Choice<T>) -> String {
    match choice {
        Choice::All => "All".to_string(),
        Choice::Only(values) => values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// `1234567` as `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(number) if number.is_finite() => {
            let text = format!("{:.*}", decimals, number.abs());
            let (whole, fraction) = match text.split_once('.') {
                Some((whole, fraction)) => (whole, Some(fraction)),
                None => (text.as_str(), None),
            };
            let grouped = whole
                .parse::<u64>()
                .map(format_count)
                .unwrap_or_else(|_| whole.to_string());
            let sign = if number < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
                "-"
            } else {
                ""
            };
            match fraction {
                Some(fraction) => format!("{sign}{grouped}.{fraction}"),
                None => format!("{sign}{grouped}"),
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}
