use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("failed to open trip file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read CSV from {file}: {source}")]
    Csv { file: String, source: csv::Error },
    #[error("{file} is missing the required column '{column}'")]
    MissingColumn { file: String, column: &'static str },
    #[error("{file}, data row {row}: cannot parse start time '{value}'")]
    BadTimestamp {
        file: String,
        row: usize,
        value: String,
    },
    #[error("{file}, data row {row}: '{value}' in column '{column}' is not a number")]
    BadNumber {
        file: String,
        row: usize,
        column: &'static str,
        value: String,
    },
}
