use polars::prelude::DataFrame;

use crate::config::{BiomeSource, Config};
use crate::hourly::{count_by_hour, derive_hour, hourly_counts, polar_series, RadialScale};
use crate::pipeline::report::{Stage, StageReport};
use crate::pipeline::{add_individual_name, PipelineResult};
use crate::plot::{self, BiomePoint};
use crate::table::{
    concat_diagonal, drop_nulls, ensure_column, has_column, left_join, log_summary, null_count,
    numeric_column, read_csv, select, text_column, value_counts, with_constant, write_csv,
    TableError,
};
use crate::telemetry::{columns, TimestampParser};

pub(crate) fn run(config: &Config, plots: bool) -> PipelineResult<StageReport> {
    let mut report = StageReport::start(Stage::Merge);

    let mut frames = Vec::with_capacity(config.inputs.biomes.len());
    for source in &config.inputs.biomes {
        let frame = load_biome(source)?;
        log_summary(&frame, &format!("{} ({})", source.biome, source.path.display()));
        frames.push(frame);
    }

    let demographics = read_csv(&config.inputs.demographics)?;
    log_summary(&demographics, "demographics");

    let mut merged = merge_biomes(&frames, &demographics)?;
    log_summary(&merged, "merged");
    log_inspection(&merged);

    write_csv(&mut merged, &config.outputs.combined)?;
    report.add_output(&config.outputs.combined, merged.height());

    let keep: Vec<&str> = config.coordinate_columns.iter().map(String::as_str).collect();
    let mut coordinates = coordinate_table(&merged, &keep)?;
    write_csv(&mut coordinates, &config.outputs.coordinates)?;
    report.add_output(&config.outputs.coordinates, coordinates.height());

    let mut timed = merged;
    let parser = TimestampParser::Exact(config.timestamp_format.clone());
    let unparsed = derive_hour(&mut timed, &parser)?;
    if unparsed > 0 {
        log::warn!(
            "{} timestamps did not match {:?}; their rows are left out of hourly counts",
            unparsed,
            config.timestamp_format
        );
    }

    let biome_keys = [columns::BIOME];
    let mut biome_table = count_by_hour(&timed, &biome_keys)?;
    write_csv(&mut biome_table, &config.outputs.biome_hourly_counts)?;
    report.add_output(&config.outputs.biome_hourly_counts, biome_table.height());

    let sex_keys = [columns::SEX];
    let mut sex_table = count_by_hour(&timed, &sex_keys)?;
    write_csv(&mut sex_table, &config.outputs.sex_hourly_counts)?;
    report.add_output(&config.outputs.sex_hourly_counts, sex_table.height());

    let individual_keys = [columns::BIOME, columns::INDIVIDUAL];
    let mut individual_table = count_by_hour(&timed, &individual_keys)?;
    let individual_counts = hourly_counts(&individual_table, &individual_keys)?;
    individual_table.rename(columns::INDIVIDUAL, columns::INDIVIDUAL_KEY.into())
        .map_err(TableError::from)?;
    add_individual_name(&mut individual_table, columns::INDIVIDUAL_KEY)?;
    write_csv(&mut individual_table, &config.outputs.ind_hourly_counts)?;
    report.add_output(&config.outputs.ind_hourly_counts, individual_table.height());

    if plots {
        let path = config.plot_path("biome_hourly_polar.svg");
        let counts = hourly_counts(&biome_table, &biome_keys)?;
        let series = polar_series(&counts, 0, RadialScale::Log10);
        plot::draw_polar_chart(&path, "Counts per Hour in a Circular Plot", &series, |_, l| {
            plot::biome_color(l)
        })?;
        report.add_plot(&path);

        let path = config.plot_path("sex_hourly_polar.svg");
        let counts = hourly_counts(&sex_table, &sex_keys)?;
        let series = polar_series(&counts, 0, RadialScale::Linear);
        plot::draw_polar_chart(&path, "Counts per Hour in a Circular Plot", &series, |_, l| {
            plot::sex_color(l)
        })?;
        report.add_plot(&path);

        let path = config.plot_path("individual_hourly_polar.svg");
        let series = polar_series(&individual_counts, 1, RadialScale::Linear);
        plot::draw_polar_grid(
            &path,
            "Counts per Hour in a Circular Plot",
            &series,
            config.plots.grid_columns,
            |i, _| plot::series_color(i),
        )?;
        report.add_plot(&path);

        let path = config.plot_path("altitude_speed.svg");
        plot::draw_altitude_speed(&path, &altitude_speed_points(&timed)?)?;
        report.add_plot(&path);
    }

    Ok(report.finish())
}

/// Reads one biome export, fills the declared missing columns and tags every
/// row with the biome label.
fn load_biome(source: &BiomeSource) -> Result<DataFrame, TableError> {
    let frame = source
        .fill_missing
        .iter()
        .try_fold(read_csv(&source.path)?, |frame, column| ensure_column(frame, column))?;
    with_constant(frame, columns::BIOME, &source.biome.to_string())
}

/// Stacks the biome frames and attaches sex/age by individual identifier.
pub(crate) fn merge_biomes(
    frames: &[DataFrame],
    demographics: &DataFrame,
) -> Result<DataFrame, TableError> {
    let combined = concat_diagonal(frames)?;
    left_join(&combined, demographics, &[columns::INDIVIDUAL])
}

/// Fixes that carry both altitude and speed, projected to `keep`, with the
/// identifier column renamed for the downstream joins.
pub(crate) fn coordinate_table(merged: &DataFrame, keep: &[&str]) -> Result<DataFrame, TableError> {
    let complete = drop_nulls(merged, &[columns::ALTITUDE, columns::SPEED])?;
    let mut coordinates = select(&complete, keep)?;
    if has_column(&coordinates, columns::INDIVIDUAL) {
        coordinates.rename(columns::INDIVIDUAL, columns::INDIVIDUAL_KEY.into())?;
    }
    Ok(coordinates)
}

fn altitude_speed_points(merged: &DataFrame) -> Result<Vec<BiomePoint>, TableError> {
    let complete = drop_nulls(merged, &[columns::ALTITUDE, columns::SPEED, columns::BIOME])?;
    let altitudes = numeric_column(&complete, columns::ALTITUDE)?;
    let speeds = numeric_column(&complete, columns::SPEED)?;
    let biomes = text_column(&complete, columns::BIOME)?;

    Ok(altitudes
        .into_iter()
        .zip(speeds)
        .zip(biomes)
        .filter_map(|((altitude, speed), biome)| {
            Some(BiomePoint {
                altitude: altitude?,
                speed: speed?,
                biome: biome?,
            })
        })
        .collect())
}

/// Value and null counts worth eyeballing after the merge.
fn log_inspection(merged: &DataFrame) {
    for column in [columns::SEX, columns::AGE] {
        if let Ok(counts) = value_counts(merged, column) {
            log::info!("{} value counts:", column);
            for (value, count) in counts {
                log::info!("  {:<16} {}", value, count);
            }
        }
    }
    for column in [columns::AGE, columns::SPEED, columns::ALTITUDE] {
        if let Ok(nulls) = null_count(merged, column) {
            log::info!("{} null cells: {}", column, nulls);
        }
    }
}
