use csv::StringRecord;
use serde::Serialize;

/// Age bracket counts for one observation. Empty cells load as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeBrackets {
    pub age_0_5: u64,
    pub age_5_17: u64,
    pub age_18_greater: u64,
}

#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub state: String,
    pub district: String,
    pub year: i32,
    pub quarter: u8,
    pub month: u8,
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub total_enrollment: u64,
    /// Present only when the dataset carries all three bracket columns.
    pub age: Option<AgeBrackets>,
    /// Present only when the dataset carries the `minor_count` column.
    pub minor_count: Option<u64>,
    /// The row exactly as read, in file column order.
    pub(crate) raw: StringRecord,
}

impl EnrollmentRecord {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.raw.get(index)
    }
}

/// Optional column families detected once when the file is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCapabilities {
    pub age_brackets: bool,
    pub minor_split: bool,
}

/// One row of a single-key `sum / mean / count` aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<K> {
    pub key: K,
    pub total: u64,
    pub mean: f64,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub state: String,
    pub district: String,
    pub total: u64,
    pub mean: f64,
    pub records: usize,
}

impl DistrictSummary {
    pub fn label(&self) -> String {
        format!("{} - {}", self.state, self.district)
    }
}
