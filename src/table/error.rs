use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("data frame error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("column {column}: invalid number {value:?}")]
    InvalidNumber { column: String, value: String },
}
