use polars::prelude::DataFrame;

use crate::config::Config;
use crate::pipeline::report::{Stage, StageReport};
use crate::pipeline::PipelineResult;
use crate::table::{
    has_column, left_join, map_text_column, read_csv, select, unique_rows, write_csv, TableError,
};
use crate::telemetry::{columns, Biome};

pub(crate) fn run(config: &Config) -> PipelineResult<StageReport> {
    let mut report = StageReport::start(Stage::Join);

    let coordinates = read_csv(&config.outputs.coordinates_named)?;
    let distances = read_csv(&config.outputs.distance)?;
    let mut finished = finalize(&coordinates, &distances)?;
    log::info!(
        "{} coordinate rows, {} after join and dedup",
        coordinates.height(),
        finished.height()
    );

    write_csv(&mut finished, &config.outputs.final_table)?;
    report.add_output(&config.outputs.final_table, finished.height());
    Ok(report.finish())
}

/// Joins sex/age onto the coordinates by short individual name, removes the
/// duplicates that the per-hour distance rows introduce, and fixes legacy
/// biome labels.
pub(crate) fn finalize(
    coordinates: &DataFrame,
    distances: &DataFrame,
) -> Result<DataFrame, TableError> {
    let demographics = select(
        distances,
        &[columns::INDIVIDUAL_NAME, columns::SEX, columns::AGE],
    )?;
    let joined = left_join(coordinates, &demographics, &[columns::INDIVIDUAL_NAME])?;
    let mut joined = unique_rows(&joined)?;

    if has_column(&joined, columns::BIOME) {
        map_text_column(&mut joined, columns::BIOME, |label| {
            Ok(label.map(Biome::normalize_label))
        })?;
    }
    Ok(joined)
}
