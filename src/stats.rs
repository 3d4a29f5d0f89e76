//! Reductions shared by the presentation blocks.
//!
//! Undefined results are `None` rather than NaN so that callers have to decide
//! what placeholder to show.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{EnrollmentRecord, GroupSummary};

pub const HISTOGRAM_BINS: usize = 50;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator); undefined below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Percent change against the previous element. The first element, and any
/// element following a zero, has no defined growth.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for &value in values {
        changes.push(match previous {
            Some(prev) if prev != 0.0 => Some((value - prev) / prev * 100.0),
            _ => None,
        });
        previous = Some(value);
    }
    changes
}

/// `part / whole * 100`, undefined for an empty whole.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A constant series collapses into a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(lo), Some(hi)) = (min(values), max(values)) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if lo == hi {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &value in values {
        let index = (((value - lo) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Groups rows by `key` (ascending) and reduces `total_enrollment` to
/// sum, mean and row count.
pub fn group_enrollment<'a, K, F>(
    rows: impl IntoIterator<Item = &'a EnrollmentRecord>,
    key: F,
) -> Vec<GroupSummary<K>>
where
    K: Ord,
    F: Fn(&EnrollmentRecord) -> K,
{
    let mut groups: BTreeMap<K, (u64, usize)> = BTreeMap::new();
    for record in rows {
        let entry = groups.entry(key(record)).or_insert((0, 0));
        entry.0 += record.total_enrollment;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (total, records))| GroupSummary {
            key,
            total,
            mean: total as f64 / records as f64,
            records,
        })
        .collect()
}

/// Sorts by total descending. The sort is stable, so ties keep key order.
pub fn rank_by_total<K>(groups: &mut [GroupSummary<K>]) {
    groups.sort_by(|a, b| b.total.cmp(&a.total));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_inputs_are_undefined() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
        assert!(histogram(&[], HISTOGRAM_BINS).is_empty());
    }

    #[test]
    fn median_handles_even_and_odd_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn std_dev_uses_sample_denominator() {
        let value = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(close(value, (32.0f64 / 7.0).sqrt()));
        assert_eq!(std_dev(&[5.0]), None);
    }

    #[test]
    fn pct_change_leaves_first_and_zero_base_undefined() {
        let changes = pct_change(&[100.0, 150.0, 0.0, 10.0]);
        assert_eq!(changes[0], None);
        assert!(close(changes[1].unwrap(), 50.0));
        assert!(close(changes[2].unwrap(), -100.0));
        assert_eq!(changes[3], None);
    }

    #[test]
    fn percentage_guards_zero_whole() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(1, 4), Some(25.0));
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), values.len());
        assert_eq!(bins[9].upper, 100.0);
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn histogram_of_constant_series_is_one_bin() {
        let bins = histogram(&[7.0, 7.0, 7.0], HISTOGRAM_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn grouping_preserves_the_grand_total() {
        let dataset = sample();
        let grand: u64 = dataset.records().iter().map(|r| r.total_enrollment).sum();
        let by_state = group_enrollment(dataset.records(), |r| r.state.clone());
        let by_month = group_enrollment(dataset.records(), |r| r.month);
        let by_year = group_enrollment(dataset.records(), |r| r.year);
        for totals in [
            by_state.iter().map(|g| g.total).sum::<u64>(),
            by_month.iter().map(|g| g.total).sum::<u64>(),
            by_year.iter().map(|g| g.total).sum::<u64>(),
        ] {
            assert_eq!(totals, grand);
        }
        assert_eq!(
            by_state.iter().map(|g| g.records).sum::<usize>(),
            dataset.len()
        );
    }

    #[test]
    fn ranking_is_descending_with_key_order_ties() {
        let dataset = sample();
        let mut by_state = group_enrollment(dataset.records(), |r| r.state.clone());
        rank_by_total(&mut by_state);
        let keys: Vec<&str> = by_state.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Kerala", "Bihar", "Goa"]);
    }
}
