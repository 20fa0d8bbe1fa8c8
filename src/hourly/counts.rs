use std::f64::consts::PI;

use polars::prelude::*;

use crate::table::{text_column, TableError};
use crate::telemetry::{columns, hour_of_day, TimestampParser};

const HOURS_PER_DAY: f64 = 24.0;

pub fn hour_to_radian(hour: u32) -> f64 {
    hour as f64 * (2.0 * PI / HOURS_PER_DAY)
}

/// Observation count for one hour of day and one combination of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyCount {
    pub hour: u32,
    pub keys: Vec<String>,
    pub count: usize,
}

impl HourlyCount {
    pub fn radian(&self) -> f64 {
        hour_to_radian(self.hour)
    }
}

/// Adds an integer `hour` column parsed from `timestamp`.
///
/// Returns how many non-null timestamps could not be parsed; those rows get a
/// null hour.
pub fn derive_hour(frame: &mut DataFrame, parser: &TimestampParser) -> Result<usize, TableError> {
    let stamps = text_column(frame, columns::TIMESTAMP)?;
    let mut unparsed = 0;
    let hours: Vec<Option<u32>> = stamps
        .iter()
        .map(|raw| {
            let raw = raw.as_deref()?;
            let hour = parser.parse(raw).map(|t| hour_of_day(&t));
            if hour.is_none() {
                unparsed += 1;
            }
            hour
        })
        .collect();
    frame.with_column(Series::new(columns::HOUR.into(), hours))?;
    Ok(unparsed)
}

/// `hour, <keys…>, count, radian`: rows per (hour, keys…), ordered by hour
/// then keys.
///
/// Rows with a null hour or a null key are left out.
pub fn count_by_hour(frame: &DataFrame, keys: &[&str]) -> Result<DataFrame, TableError> {
    let group: Vec<Expr> = std::iter::once(columns::HOUR)
        .chain(keys.iter().copied())
        .map(col)
        .collect();
    let present = group
        .iter()
        .cloned()
        .fold(lit(true), |acc, column| acc.and(column.is_not_null()));

    Ok(frame
        .clone()
        .lazy()
        .filter(present)
        .group_by(group.clone())
        .agg([len().alias(columns::COUNT)])
        .sort_by_exprs(group, SortMultipleOptions::default().with_maintain_order(true))
        .with_column(
            (col(columns::HOUR).cast(DataType::Float64) * lit(2.0 * PI / HOURS_PER_DAY))
                .alias(columns::RADIAN),
        )
        .collect()?)
}

/// Reads a `count_by_hour` frame back into plain records.
pub fn hourly_counts(counts: &DataFrame, keys: &[&str]) -> Result<Vec<HourlyCount>, TableError> {
    let hours = counts.column(columns::HOUR)?.cast(&DataType::UInt32)?;
    let totals = counts.column(columns::COUNT)?.cast(&DataType::UInt64)?;
    let key_values = keys
        .iter()
        .map(|key| text_column(counts, key))
        .collect::<Result<Vec<_>, _>>()?;

    let records = hours
        .u32()?
        .into_iter()
        .zip(totals.u64()?.into_iter())
        .enumerate()
        .filter_map(|(row, (hour, count))| {
            let keys: Option<Vec<String>> =
                key_values.iter().map(|values| values[row].clone()).collect();
            Some(HourlyCount {
                hour: hour?,
                keys: keys?,
                count: count? as usize,
            })
        })
        .collect();
    Ok(records)
}

/// Reads an hour that may have been written as a float (`"5.0"`).
pub(crate) fn parse_hour(raw: &str) -> Result<u32, TableError> {
    let invalid = || TableError::InvalidNumber {
        column: columns::HOUR.to_string(),
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.fract() != 0.0 || !(0.0..HOURS_PER_DAY).contains(&value) {
        return Err(invalid());
    }
    Ok(value as u32)
}
