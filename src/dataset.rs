//! Loading the feature-engineered enrollment table.
//!
//! The file is read once per process into an immutable [`Dataset`]. Required
//! columns are parsed into typed fields, optional demographic columns are
//! recorded as [`SchemaCapabilities`], and every row keeps its original cells
//! so the explorer and the CSV export see the file exactly as it was.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::LoadError;
use crate::filter::FilterOptions;
use crate::models::{AgeBrackets, EnrollmentRecord, SchemaCapabilities};

pub const DEFAULT_DATA_FILE: &str = "Aadhaar_enrollment_FeatureEngineering.csv";

const REQUIRED_COLUMNS: [&str; 8] = [
    "state",
    "district",
    "year",
    "quarter",
    "month",
    "day_of_week",
    "is_weekend",
    "total_enrollment",
];
const AGE_COLUMNS: [&str; 3] = ["age_0_5", "age_5_17", "age_18_greater"];
const MINOR_COUNT_COLUMN: &str = "minor_count";

#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<EnrollmentRecord>,
    capabilities: SchemaCapabilities,
    numeric_columns: Vec<usize>,
}

struct ColumnMap {
    required: [usize; 8],
    age: Option<[usize; 3]>,
    minor_count: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|header| header == name);

        let mut required = [0usize; 8];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name).ok_or(LoadError::MissingColumn(name))?;
        }

        let age = match AGE_COLUMNS.map(find) {
            [Some(a), Some(b), Some(c)] => Some([a, b, c]),
            _ => None,
        };

        Ok(Self {
            required,
            age,
            minor_count: find(MINOR_COUNT_COLUMN),
        })
    }
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        log::info!(
            "loaded {} enrollment records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();
        let columns = ColumnMap::resolve(&headers)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let raw = result?;
            records.push(parse_record(&headers, &columns, raw)?);
        }

        let capabilities = SchemaCapabilities {
            age_brackets: columns.age.is_some(),
            minor_split: columns.age.is_some() && columns.minor_count.is_some(),
        };
        if !capabilities.age_brackets {
            log::info!("age bracket columns absent; demographic analysis disabled");
        } else if !capabilities.minor_split {
            log::info!("`{MINOR_COUNT_COLUMN}` absent; minor/adult split disabled");
        }

        let numeric_columns = (0..headers.len())
            .filter(|&index| is_numeric_column(&records, index))
            .collect();

        Ok(Self {
            headers,
            records,
            capabilities,
            numeric_columns,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[EnrollmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capabilities(&self) -> SchemaCapabilities {
        self.capabilities
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Columns whose non-empty cells all parse as numbers, in file order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.numeric_columns
            .iter()
            .map(|&index| self.headers[index].as_str())
            .collect()
    }

    pub fn numeric_column_index(&self, name: &str) -> Option<usize> {
        self.numeric_columns
            .iter()
            .copied()
            .find(|&index| self.headers[index] == name)
    }

    /// Option lists for the state, year and quarter filters.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(self.records.iter())
    }
}

pub(crate) fn numeric_cell(record: &EnrollmentRecord, index: usize) -> Option<f64> {
    let value = record.field(index)?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| !number.is_nan())
}

fn is_numeric_column(records: &[EnrollmentRecord], index: usize) -> bool {
    let mut seen = false;
    for record in records {
        let value = record.field(index).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        if value.parse::<f64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

fn parse_record(
    headers: &[String],
    columns: &ColumnMap,
    raw: StringRecord,
) -> Result<EnrollmentRecord, LoadError> {
    let line = raw.position().map(|position| position.line()).unwrap_or(0);
    let cell = |index: usize| raw.get(index).unwrap_or("").trim();
    let invalid = |index: usize| LoadError::InvalidValue {
        line,
        column: headers[index].clone(),
        value: cell(index).to_string(),
    };

    let [state, district, year, quarter, month, day_of_week, is_weekend, total] =
        columns.required;

    let integer = |index: usize| parse_integer(cell(index)).ok_or_else(|| invalid(index));
    let small = |index: usize| {
        integer(index).and_then(|value| u8::try_from(value).map_err(|_| invalid(index)))
    };
    let count = |index: usize| parse_count(cell(index)).ok_or_else(|| invalid(index));
    let optional_count = |index: usize| {
        if cell(index).is_empty() {
            Ok(0)
        } else {
            count(index)
        }
    };

    let age = match columns.age {
        Some([a, b, c]) => Some(AgeBrackets {
            age_0_5: optional_count(a)?,
            age_5_17: optional_count(b)?,
            age_18_greater: optional_count(c)?,
        }),
        None => None,
    };
    let minor_count = match columns.minor_count {
        Some(index) => Some(optional_count(index)?),
        None => None,
    };

    let year_value =
        integer(year).and_then(|value| i32::try_from(value).map_err(|_| invalid(year)))?;
    let quarter = small(quarter)?;
    let month = small(month)?;
    let day_of_week = small(day_of_week)?;
    let is_weekend = parse_flag(cell(is_weekend)).ok_or_else(|| invalid(is_weekend))?;
    let total_enrollment = count(total)?;
    let state = cell(state).to_string();
    let district = cell(district).to_string();

    Ok(EnrollmentRecord {
        state,
        district,
        year: year_value,
        quarter,
        month,
        day_of_week,
        is_weekend,
        total_enrollment,
        age,
        minor_count,
        raw,
    })
}

/// Accepts `12` as well as `12.0`, which is how dataframe exports write integers
/// that once shared a column with missing values.
fn parse_integer(value: &str) -> Option<i64> {
    if let Ok(number) = value.parse::<i64>() {
        return Some(number);
    }
    let number = value.parse::<f64>().ok()?;
    if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Some(number as i64)
    } else {
        None
    }
}

fn parse_count(value: &str) -> Option<u64> {
    parse_integer(value).and_then(|number| u64::try_from(number).ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,age_0_5,age_5_17,age_18_greater,minor_count
Bihar,Patna,2023,1,1,0,0,100,10,30,60,40
Bihar,Gaya,2023,1,2,5,1,50,5,15,30,20
Kerala,Kochi,2023,2,4,2,0,200,20,80,100,100
Kerala,Kochi,2024,3,7,6,1,80,8,32,40,40
Goa,Panaji,2024,4,11,3,0,30,3,7,20,10
";

    pub(crate) fn sample() -> Dataset {
        Dataset::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn loads_typed_fields_and_capabilities() {
        let dataset = sample();
        assert_eq!(dataset.len(), 5);
        let first = &dataset.records()[0];
        assert_eq!(first.state, "Bihar");
        assert_eq!(first.year, 2023);
        assert!(!first.is_weekend);
        assert_eq!(first.total_enrollment, 100);
        assert_eq!(
            first.age,
            Some(AgeBrackets {
                age_0_5: 10,
                age_5_17: 30,
                age_18_greater: 60
            })
        );
        assert_eq!(first.minor_count, Some(40));
        assert_eq!(
            dataset.capabilities(),
            SchemaCapabilities {
                age_brackets: true,
                minor_split: true
            }
        );
    }

    #[test]
    fn optional_columns_are_capabilities_not_errors() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,age_0_5
A,X,2023,1,1,0,false,100,4
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.capabilities(), SchemaCapabilities::default());
        assert_eq!(dataset.records()[0].age, None);
        assert_eq!(dataset.records()[0].minor_count, None);
    }

    #[test]
    fn minor_split_needs_age_brackets() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,minor_count
A,X,2023,1,1,0,0,100,4
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert!(!dataset.capabilities().minor_split);
        assert_eq!(dataset.records()[0].minor_count, Some(4));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "state,district,year,quarter,month,day_of_week,is_weekend\nA,X,2023,1,1,0,0\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("total_enrollment")));
    }

    #[test]
    fn invalid_value_reports_line_and_column() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment
A,X,2023,1,1,0,0,100
A,X,2023,1,1,0,maybe,100
";
        match Dataset::from_reader(csv.as_bytes()).unwrap_err() {
            LoadError::InvalidValue { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "is_weekend");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_float_encoded_integers_and_empty_optional_cells() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,age_0_5,age_5_17,age_18_greater
A,X,2023.0,1,1,0,True,100.0,,2,3
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.year, 2023);
        assert!(record.is_weekend);
        assert_eq!(record.total_enrollment, 100);
        assert_eq!(record.age.unwrap().age_0_5, 0);
    }

    #[test]
    fn numeric_columns_include_extra_numeric_columns_only() {
        let csv = "\
state,district,year,quarter,month,day_of_week,is_weekend,total_enrollment,ratio,label
A,X,2023,1,1,0,0,100,0.5,north
B,Y,2023,1,1,0,1,100,,south
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            dataset.numeric_columns(),
            vec![
                "year",
                "quarter",
                "month",
                "day_of_week",
                "is_weekend",
                "total_enrollment",
                "ratio"
            ]
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            Dataset::load(&path).unwrap_err(),
            LoadError::NotFound(_)
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollment.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.headers().len(), 12);
    }
}
