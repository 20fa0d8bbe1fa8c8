mod palette;
mod polar;
mod scatter;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub use palette::{biome_color, series_color, sex_color};
pub use polar::{draw_polar_chart, draw_polar_grid};
pub use scatter::{draw_altitude_speed, draw_distance_by_hour, BiomePoint};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(err.to_string())
    }
}

pub type PlotResult<T> = Result<T, PlotError>;

pub(crate) fn ensure_parent(path: &std::path::Path) -> PlotResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
