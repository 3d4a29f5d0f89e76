use serde::Serialize;

use crate::export::EXPORT_FILE_NAME;
use crate::filter::FilteredView;

pub const PREVIEW_ROWS: usize = 100;
const DEFAULT_COLUMNS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explorer {
    /// Every column of the file, offered by the column picker.
    pub options: Vec<String>,
    pub columns: Vec<String>,
    /// At most [`PREVIEW_ROWS`] rows projected onto `columns`.
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    /// The untruncated view is offered for download under this name.
    pub export_file_name: &'static str,
}

pub fn compute(view: &FilteredView<'_>, columns: Option<&[String]>) -> Explorer {
    let dataset = view.dataset();
    let options = dataset.headers().to_vec();
    let requested: Vec<String> = match columns {
        Some(columns) => columns.to_vec(),
        None => options.iter().take(DEFAULT_COLUMNS).cloned().collect(),
    };

    let mut projection = Vec::with_capacity(requested.len());
    let mut selected = Vec::with_capacity(requested.len());
    for column in requested {
        match dataset.column_index(&column) {
            Some(index) => {
                projection.push(index);
                selected.push(column);
            }
            None => log::warn!("explorer column {column:?} is not in the dataset"),
        }
    }

    let rows = if projection.is_empty() {
        Vec::new()
    } else {
        view.rows()
            .iter()
            .take(PREVIEW_ROWS)
            .map(|record| {
                projection
                    .iter()
                    .map(|&index| record.field(index).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    };

    Explorer {
        options,
        columns: selected,
        rows,
        total_rows: view.len(),
        export_file_name: EXPORT_FILE_NAME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::dataset::Dataset;

    #[test]
    fn defaults_to_first_ten_columns() {
        let dataset = sample();
        let explorer = compute(&FilteredView::all(&dataset), None);
        assert_eq!(explorer.options.len(), 12);
        assert_eq!(explorer.columns.len(), 10);
        assert_eq!(explorer.columns[0], "state");
        assert_eq!(explorer.rows.len(), 5);
        assert_eq!(explorer.rows[0][0], "Bihar");
    }

    #[test]
    fn projects_requested_columns_in_requested_order() {
        let dataset = sample();
        let columns = vec![
            "total_enrollment".to_string(),
            "bogus".to_string(),
            "district".to_string(),
        ];
        let explorer = compute(&FilteredView::all(&dataset), Some(columns.as_slice()));
        assert_eq!(explorer.columns, vec!["total_enrollment", "district"]);
        assert_eq!(explorer.rows[2], vec!["200", "Kochi"]);
    }

    #[test]
    fn preview_is_truncated_but_total_is_not() {
        let mut csv = String::from(
            "state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment\n",
        );
        for i in 0..150 {
            csv.push_str(&format!("S,D{i},2023,1,1,0,0,{i}\n"));
        }
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let explorer = compute(&FilteredView::all(&dataset), None);
        assert_eq!(explorer.rows.len(), PREVIEW_ROWS);
        assert_eq!(explorer.total_rows, 150);
    }

    #[test]
    fn no_columns_means_no_rows() {
        let dataset = sample();
        let explorer = compute(&FilteredView::all(&dataset), Some(&[][..]));
        assert!(explorer.columns.is_empty());
        assert!(explorer.rows.is_empty());
    }
}
