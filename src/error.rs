use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failures. Anything raised here halts before rendering.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column `{0}` is missing from the header")]
    MissingColumn(&'static str),
    #[error("line {line}: column `{column}` has invalid value {value:?}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}
