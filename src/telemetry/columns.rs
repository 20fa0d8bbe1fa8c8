//! Column names shared by the input and output tables.

pub const ID: &str = "ID";
pub const TIMESTAMP: &str = "timestamp";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const ALTITUDE: &str = "Altitude";
pub const SPEED: &str = "Speed";
pub const BIOME: &str = "Biome";
pub const SEX: &str = "sex";
pub const AGE: &str = "age";

/// Identifier column as it appears in the raw telemetry exports.
pub const INDIVIDUAL: &str = "individual.local.identifier";
/// Identifier column in every derived table.
pub const INDIVIDUAL_KEY: &str = "individual_local_identifier";
pub const INDIVIDUAL_NAME: &str = "individual_name";

pub const HOUR: &str = "hour";
pub const COUNT: &str = "count";
pub const RADIAN: &str = "radian";

pub const DISTANCE_METERS: &str = "distance_meters";
pub const DISTANCE_KM: &str = "distance_km";
pub const NUM_POINTS: &str = "num_points";
pub const DISTANCE_PER_POINT_METERS: &str = "distance_per_point_meters";
pub const DISTANCE_PER_POINT_KM: &str = "distance_per_point_km";
