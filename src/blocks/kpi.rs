use std::collections::HashSet;

use serde::Serialize;

use crate::filter::FilteredView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_enrollment: u64,
    pub mean_enrollment: Option<f64>,
    pub state_count: usize,
    pub district_count: usize,
    pub record_count: usize,
}

pub fn compute(view: &FilteredView<'_>) -> Kpis {
    let rows = view.rows();
    let total_enrollment: u64 = rows.iter().map(|r| r.total_enrollment).sum();
    let states: HashSet<&str> = rows.iter().map(|r| r.state.as_str()).collect();
    let districts: HashSet<&str> = rows.iter().map(|r| r.district.as_str()).collect();

    Kpis {
        total_enrollment,
        mean_enrollment: if rows.is_empty() {
            None
        } else {
            Some(total_enrollment as f64 / rows.len() as f64)
        },
        state_count: states.len(),
        district_count: districts.len(),
        record_count: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::filter::{apply, Choice, Selection};

    #[test]
    fn kpis_over_full_view() {
        let dataset = sample();
        let kpis = compute(&FilteredView::all(&dataset));
        assert_eq!(kpis.total_enrollment, 460);
        assert_eq!(kpis.mean_enrollment, Some(92.0));
        assert_eq!(kpis.state_count, 3);
        assert_eq!(kpis.district_count, 4);
        assert_eq!(kpis.record_count, 5);
    }

    #[test]
    fn empty_view_yields_neutral_kpis() {
        let dataset = sample();
        let selection = Selection {
            years: Choice::any_of([1999]),
            ..Selection::default()
        };
        let kpis = compute(&apply(&dataset, &selection));
        assert_eq!(kpis.total_enrollment, 0);
        assert_eq!(kpis.mean_enrollment, None);
        assert_eq!(kpis.state_count, 0);
        assert_eq!(kpis.district_count, 0);
        assert_eq!(kpis.record_count, 0);
    }
}
