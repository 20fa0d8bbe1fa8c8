mod counts;
mod polar;

pub(crate) use counts::parse_hour;
pub use counts::{count_by_hour, derive_hour, hour_to_radian, hourly_counts, HourlyCount};
pub use polar::{polar_series, PolarPoint, PolarSeries, RadialScale};
