use std::path::Path;

use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::config::Config;
use crate::distance::{distances_table, fixes_from_table, hourly_distances, HourlyDistance};
use crate::hourly::parse_hour;
use crate::pipeline::report::{Stage, StageReport};
use crate::pipeline::{add_individual_name, PipelineResult};
use crate::plot;
use crate::table::{left_join, read_csv, select, text_column, unique_rows, write_csv, TableError};
use crate::telemetry::{columns, TimestampParser};

pub(crate) fn run(config: &Config, plots: bool) -> PipelineResult<StageReport> {
    let mut report = StageReport::start(Stage::Distance);

    let combined = read_csv(&config.outputs.combined)?;
    let load = fixes_from_table(&combined, &TimestampParser::Inferred)?;
    if load.unparsed_timestamps > 0 {
        log::warn!(
            "{} fixes have an unreadable timestamp and are left out",
            load.unparsed_timestamps
        );
    }
    if load.unidentified > 0 {
        log::warn!("{} fixes have no individual and are left out", load.unidentified);
    }
    log::info!("Loaded {} fixes", load.fixes.len());

    let records = hourly_distances(load.fixes);
    log::info!("Computed {} (individual, hour) distance records", records.len());

    let activity = load_activity_counts(&config.inputs.activity_counts)?;
    let mut joined = join_distances(&records, &combined, &activity)?;
    write_csv(&mut joined, &config.outputs.distance)?;
    report.add_output(&config.outputs.distance, joined.height());

    if plots {
        let path = config.plot_path("distance_per_point_by_hour.svg");
        let points: Vec<(u32, f64)> = records
            .iter()
            .map(|r| (r.hour, r.distance_per_point_km))
            .collect();
        plot::draw_distance_by_hour(&path, &points)?;
        report.add_plot(&path);
    }

    let mut coordinates = read_csv(&config.outputs.coordinates)?;
    add_individual_name(&mut coordinates, columns::INDIVIDUAL_KEY)?;
    write_csv(&mut coordinates, &config.outputs.coordinates_named)?;
    report.add_output(&config.outputs.coordinates_named, coordinates.height());

    Ok(report.finish())
}

/// `individual_local_identifier, hour, count` with hours as integers.
fn load_activity_counts(path: &Path) -> Result<DataFrame, TableError> {
    let mut frame = select(
        &read_csv(path)?,
        &[columns::INDIVIDUAL_KEY, columns::HOUR, columns::COUNT],
    )?;
    let hours = text_column(&frame, columns::HOUR)?
        .iter()
        .map(|hour| parse_hour(hour.as_deref().unwrap_or("")))
        .collect::<Result<Vec<u32>, _>>()?;
    frame.with_column(Series::new(columns::HOUR.into(), hours))?;
    Ok(frame)
}

/// Distance records with the biome/sex/age of each individual and the
/// activity count of the same hour attached.
pub(crate) fn join_distances(
    records: &[HourlyDistance],
    combined: &DataFrame,
    activity: &DataFrame,
) -> Result<DataFrame, TableError> {
    let distances = distances_table(records)?;

    let mut demographics = select(
        combined,
        &[columns::INDIVIDUAL, columns::BIOME, columns::SEX, columns::AGE],
    )?;
    demographics.rename(columns::INDIVIDUAL, columns::INDIVIDUAL_KEY.into())?;
    let demographics = unique_rows(&demographics)?;

    let with_demographics = left_join(&distances, &demographics, &[columns::INDIVIDUAL_KEY])?;
    left_join(
        &with_demographics,
        activity,
        &[columns::INDIVIDUAL_KEY, columns::HOUR],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::LocationFix;
    use crate::table::{column_names, column_of, table_of};
    use crate::telemetry::Position;
    use chrono::NaiveDateTime;
    use polars::prelude::DataType;
    use tempfile::tempdir;

    fn fix(individual: &str, at: &str, lat: f64, lon: f64) -> LocationFix {
        let timestamp = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap();
        LocationFix {
            individual: individual.into(),
            timestamp,
            hour: crate::telemetry::hour_of_day(&timestamp),
            position: Some(Position::new(lat, lon)),
        }
    }

    #[test]
    fn distances_gain_demographics_and_counts() {
        let records = hourly_distances(vec![
            fix("T_X", "2020-01-01 05:00", 0.0, 0.0),
            fix("T_X", "2020-01-01 05:30", 0.0, 1.0),
            fix("T_Y", "2020-01-01 06:00", 0.0, 0.0),
        ]);
        let combined = table_of(
            &["ID", "individual.local.identifier", "Biome", "sex", "age"],
            &[
                &["1", "T_X", "Cerrado", "MALE", "Adult"],
                &["2", "T_X", "Cerrado", "MALE", "Adult"],
                &["3", "T_Y", "Pantanal", "", ""],
            ],
        );
        let dir = tempdir().unwrap();
        let path = dir.path().join("activity.csv");
        std::fs::write(
            &path,
            "individual_local_identifier,hour,count\nT_X,5,2\nT_X,6,8\n",
        )
        .unwrap();
        let activity = load_activity_counts(&path).unwrap();

        let joined = join_distances(&records, &combined, &activity).unwrap();
        assert_eq!(joined.height(), 2);
        assert_eq!(
            column_names(&joined),
            [
                "individual_local_identifier",
                "hour",
                "distance_meters",
                "distance_km",
                "num_points",
                "distance_per_point_meters",
                "distance_per_point_km",
                "individual_name",
                "Biome",
                "sex",
                "age",
                "count",
            ]
        );
        assert_eq!(column_of(&joined, "distance_km"), ["111.32", "0.0"]);
        assert_eq!(column_of(&joined, "distance_per_point_km")[0], "55.66");
        assert_eq!(column_of(&joined, "sex"), ["MALE", ""]);
        assert_eq!(column_of(&joined, "count"), ["2", ""]);
        assert_eq!(column_of(&joined, "individual_name"), ["X", "Y"]);
    }

    #[test]
    fn activity_hours_are_normalized_to_integers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("activity.csv");
        std::fs::write(
            &path,
            "hour,Biome,individual_local_identifier,count,radian\n5.0,Cerrado,T_X,3,1.3\n",
        )
        .unwrap();
        let t = load_activity_counts(&path).unwrap();
        assert_eq!(
            column_names(&t),
            ["individual_local_identifier", "hour", "count"]
        );
        assert_eq!(t.column("hour").unwrap().dtype(), &DataType::UInt32);
        assert_eq!(column_of(&t, "hour"), ["5"]);
    }

    #[test]
    fn missing_activity_hour_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("activity.csv");
        std::fs::write(&path, "individual_local_identifier,hour,count\nT_X,,3\n").unwrap();
        assert!(matches!(
            load_activity_counts(&path),
            Err(TableError::InvalidNumber { .. })
        ));
    }
}
