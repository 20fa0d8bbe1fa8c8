use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::plot::PlotError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("plot error: {0}")]
    Plot(#[from] PlotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input files: {}", format_paths(.0))]
    MissingInputs(Vec<PathBuf>),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type PipelineResult<T> = Result<T, PipelineError>;
