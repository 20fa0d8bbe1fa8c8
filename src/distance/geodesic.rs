use geo::{Distance, Geodesic, Point};

use crate::telemetry::Position;

/// Shortest distance on the WGS-84 ellipsoid, in meters.
pub fn geodesic_distance_m(from: Position, to: Position) -> f64 {
    let a = Point::new(from.longitude_deg, from.latitude_deg);
    let b = Point::new(to.longitude_deg, to.latitude_deg);
    Geodesic::distance(a, b)
}
