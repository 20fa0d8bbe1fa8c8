use chrono::NaiveDateTime;
use polars::prelude::DataFrame;

use crate::table::{numeric_column, text_column, TableError};
use crate::telemetry::{columns, hour_of_day, Position, TimestampParser};

/// One GPS observation of a tracked individual.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub individual: String,
    pub timestamp: NaiveDateTime,
    pub hour: u32,
    /// `None` when either coordinate is missing.
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default)]
pub struct FixLoad {
    pub fixes: Vec<LocationFix>,
    /// Rows whose timestamp did not parse.
    pub unparsed_timestamps: usize,
    /// Rows without an individual identifier.
    pub unidentified: usize,
}

/// Reads fixes from the merged table, in table order.
///
/// Rows with a null timestamp are dropped. Rows whose timestamp or individual
/// cannot be resolved take no part in grouping and are only counted.
/// Non-numeric coordinates are malformed input.
pub fn fixes_from_table(
    frame: &DataFrame,
    parser: &TimestampParser,
) -> Result<FixLoad, TableError> {
    let individuals = text_column(frame, columns::INDIVIDUAL)?;
    let timestamps = text_column(frame, columns::TIMESTAMP)?;
    let latitudes = numeric_column(frame, columns::LATITUDE)?;
    let longitudes = numeric_column(frame, columns::LONGITUDE)?;

    let mut load = FixLoad::default();
    for (i, (raw, individual)) in timestamps.into_iter().zip(individuals).enumerate() {
        let Some(raw) = raw else {
            continue;
        };
        let Some(timestamp) = parser.parse(&raw) else {
            load.unparsed_timestamps += 1;
            continue;
        };
        let Some(individual) = individual else {
            load.unidentified += 1;
            continue;
        };
        load.fixes.push(LocationFix {
            individual,
            timestamp,
            hour: hour_of_day(&timestamp),
            position: Position::from_parts(latitudes[i], longitudes[i]),
        });
    }

    Ok(load)
}
