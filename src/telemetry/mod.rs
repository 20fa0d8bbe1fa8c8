pub mod columns;
mod identifier;
mod timestamp;
mod types;

pub use identifier::individual_name;
pub use timestamp::{hour_of_day, TimestampParser};
pub use types::{Biome, Position};
