mod fix;
mod geodesic;
mod hourly;

pub use fix::{fixes_from_table, LocationFix};
pub use geodesic::geodesic_distance_m;
pub use hourly::{distances_table, hourly_distances, HourlyDistance};
