use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crate::distance::{geodesic_distance_m, LocationFix};
use crate::table::TableError;
use crate::telemetry::{columns, individual_name};

/// Distance traveled by one individual within one hour of day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyDistance {
    pub individual: String,
    pub hour: u32,
    pub distance_meters: f64,
    pub distance_km: f64,
    pub num_points: usize,
    pub distance_per_point_meters: f64,
    pub distance_per_point_km: f64,
}

impl HourlyDistance {
    /// `fixes` must already be in time order.
    pub fn from_group(individual: String, hour: u32, fixes: &[LocationFix]) -> Self {
        let num_points = fixes.len();
        if num_points <= 1 {
            return Self {
                individual,
                hour,
                distance_meters: 0.0,
                distance_km: 0.0,
                num_points,
                distance_per_point_meters: 0.0,
                distance_per_point_km: 0.0,
            };
        }

        let total_m = track_length_m(fixes);
        let n = num_points as f64;
        Self {
            individual,
            hour,
            distance_meters: round2(total_m),
            distance_km: round2(total_m / 1000.0),
            num_points,
            distance_per_point_meters: round2(total_m / n),
            distance_per_point_km: round2(total_m / 1000.0 / n),
        }
    }
}

/// Sum of geodesic distances between consecutive fixes.
///
/// A pair where either fix lacks a position is left out of the sum.
pub fn track_length_m(fixes: &[LocationFix]) -> f64 {
    fixes
        .windows(2)
        .filter_map(|w| Some((w[0].position?, w[1].position?)))
        .map(|(a, b)| geodesic_distance_m(a, b))
        .sum()
}

/// Buckets fixes by (individual, hour of day), each bucket in time order.
///
/// Days are not separated: every fix at 05:xx lands in hour 5. Ties on time
/// keep their input order.
pub fn group_fixes(mut fixes: Vec<LocationFix>) -> BTreeMap<(String, u32), Vec<LocationFix>> {
    fixes.sort_by(|a, b| {
        a.individual
            .cmp(&b.individual)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let mut groups: BTreeMap<(String, u32), Vec<LocationFix>> = BTreeMap::new();
    for fix in fixes {
        groups
            .entry((fix.individual.clone(), fix.hour))
            .or_default()
            .push(fix);
    }
    groups
}

/// One record per (individual, hour), ordered by individual then hour.
pub fn hourly_distances(fixes: Vec<LocationFix>) -> Vec<HourlyDistance> {
    group_fixes(fixes)
        .into_iter()
        .map(|((individual, hour), group)| HourlyDistance::from_group(individual, hour, &group))
        .collect()
}

/// One row per record. Distances are floats, so whole values are written
/// with a trailing `.0`.
pub fn distances_table(records: &[HourlyDistance]) -> Result<DataFrame, TableError> {
    let floats = |name: &str, f: fn(&HourlyDistance) -> f64| {
        Column::from(Series::new(name.into(), records.iter().map(f).collect::<Vec<f64>>()))
    };
    let frame_columns = vec![
        Column::from(Series::new(
            columns::INDIVIDUAL_KEY.into(),
            records.iter().map(|r| r.individual.as_str()).collect::<Vec<_>>(),
        )),
        Column::from(Series::new(
            columns::HOUR.into(),
            records.iter().map(|r| r.hour).collect::<Vec<u32>>(),
        )),
        floats(columns::DISTANCE_METERS, |r| r.distance_meters),
        floats(columns::DISTANCE_KM, |r| r.distance_km),
        Column::from(Series::new(
            columns::NUM_POINTS.into(),
            records.iter().map(|r| r.num_points as u64).collect::<Vec<u64>>(),
        )),
        floats(columns::DISTANCE_PER_POINT_METERS, |r| r.distance_per_point_meters),
        floats(columns::DISTANCE_PER_POINT_KM, |r| r.distance_per_point_km),
        Column::from(Series::new(
            columns::INDIVIDUAL_NAME.into(),
            records
                .iter()
                .map(|r| individual_name(&r.individual))
                .collect::<Vec<_>>(),
        )),
    ];
    Ok(DataFrame::new(frame_columns)?)
}

/// Two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{column_of, write_csv};
    use crate::telemetry::Position;
    use chrono::NaiveDateTime;
    use polars::prelude::DataType;

    fn fix(individual: &str, at: &str, position: Option<(f64, f64)>) -> LocationFix {
        let timestamp = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap();
        LocationFix {
            individual: individual.to_string(),
            timestamp,
            hour: crate::telemetry::hour_of_day(&timestamp),
            position: position.map(|(lat, lon)| Position::new(lat, lon)),
        }
    }

    #[test]
    fn single_point_groups_have_zero_distance() {
        let d = HourlyDistance::from_group(
            "X".into(),
            5,
            &[fix("X", "2020-01-01 05:00", Some((0.0, 0.0)))],
        );
        assert_eq!(d.num_points, 1);
        assert_eq!(d.distance_meters, 0.0);
        assert_eq!(d.distance_per_point_meters, 0.0);
        assert_eq!(d.distance_per_point_km, 0.0);

        let empty = HourlyDistance::from_group("X".into(), 5, &[]);
        assert_eq!(empty.num_points, 0);
        assert_eq!(empty.distance_km, 0.0);
    }

    #[test]
    fn stationary_individual_travels_nowhere() {
        let fixes = vec![
            fix("X", "2020-01-01 05:00", Some((-19.5, -56.2))),
            fix("X", "2020-01-01 05:15", Some((-19.5, -56.2))),
            fix("X", "2020-01-01 05:30", Some((-19.5, -56.2))),
        ];
        let d = HourlyDistance::from_group("X".into(), 5, &fixes);
        assert_eq!(d.distance_meters, 0.0);
        assert_eq!(d.num_points, 3);
    }

    #[test]
    fn one_degree_step_at_the_equator() {
        let fixes = vec![
            fix("X", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("X", "2020-01-01 05:30", Some((0.0, 1.0))),
        ];
        let records = hourly_distances(fixes);
        assert_eq!(records.len(), 1);
        let d = &records[0];
        assert_eq!(d.hour, 5);
        assert_eq!(d.num_points, 2);
        assert_eq!(d.distance_meters, 111_319.49);
        assert_eq!(d.distance_km, 111.32);
        assert_eq!(d.distance_per_point_km, 55.66);
        assert_eq!(d.distance_per_point_meters, round2(111_319.490_793 / 2.0));
    }

    #[test]
    fn kilometer_ratio_is_rounded_independently() {
        let fixes = vec![
            fix("X", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("X", "2020-01-01 05:10", Some((0.0, 0.01))),
            fix("X", "2020-01-01 05:20", Some((0.0, 0.02))),
        ];
        let d = HourlyDistance::from_group("X".into(), 5, &fixes);
        let total = track_length_m(&fixes);
        assert_eq!(d.distance_per_point_meters, round2(total / 3.0));
        assert_eq!(d.distance_per_point_km, round2(total / 1000.0 / 3.0));
    }

    #[test]
    fn pairs_with_missing_coordinates_are_omitted() {
        let fixes = vec![
            fix("X", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("X", "2020-01-01 05:10", Some((0.0, 1.0))),
            fix("X", "2020-01-01 05:20", None),
            fix("X", "2020-01-01 05:30", Some((0.0, 2.0))),
        ];
        let expected = geodesic_distance_m(Position::new(0.0, 0.0), Position::new(0.0, 1.0));
        assert!((track_length_m(&fixes) - expected).abs() < 1e-9);

        let d = HourlyDistance::from_group("X".into(), 5, &fixes);
        assert_eq!(d.num_points, 4);
    }

    #[test]
    fn groups_merge_days_and_sort_by_time() {
        let fixes = vec![
            fix("B", "2020-01-02 05:30", Some((0.0, 2.0))),
            fix("A", "2020-01-01 07:00", Some((0.0, 0.0))),
            fix("B", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("B", "2020-01-01 05:10", Some((0.0, 1.0))),
        ];
        let groups = group_fixes(fixes);
        let keys: Vec<(String, u32)> = groups.keys().cloned().collect();
        assert_eq!(keys, vec![("A".to_string(), 7), ("B".to_string(), 5)]);

        let b = &groups[&("B".to_string(), 5)];
        assert_eq!(b.len(), 3);
        assert!(b.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(b[2].position, Some(Position::new(0.0, 2.0)));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let fixes = vec![
            fix("A", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("A", "2020-01-01 05:00", Some((0.0, 1.0))),
        ];
        let groups = group_fixes(fixes);
        let a = &groups[&("A".to_string(), 5)];
        assert_eq!(a[0].position, Some(Position::new(0.0, 0.0)));
        assert_eq!(a[1].position, Some(Position::new(0.0, 1.0)));
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.125), 1.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn table_carries_individual_name() {
        let records = vec![HourlyDistance::from_group("Tapir_MS_Rita".into(), 3, &[])];
        let t = distances_table(&records).unwrap();
        assert_eq!(t.width(), 8);
        assert_eq!(column_of(&t, "individual_name"), ["Rita"]);
        assert_eq!(column_of(&t, "hour"), ["3"]);
        assert_eq!(t.column("distance_meters").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn whole_distances_are_written_as_floats() {
        let fixes = vec![
            fix("X", "2020-01-01 05:00", Some((0.0, 0.0))),
            fix("X", "2020-01-01 05:30", Some((0.0, 1.0))),
        ];
        let mut records = hourly_distances(fixes);
        records.push(HourlyDistance::from_group("Y".into(), 6, &[]));
        let mut t = distances_table(&records).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distance.csv");
        write_csv(&mut t, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "X,5,111319.49,111.32,2,55659.75,55.66,X");
        assert_eq!(lines[2], "Y,6,0.0,0.0,0,0.0,0.0,Y");
    }
}
