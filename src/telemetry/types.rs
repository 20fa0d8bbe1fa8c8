use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deserialize, Serialize)]
pub enum Biome {
    #[strum(to_string = "Atlantic Forest")]
    #[serde(rename = "Atlantic Forest", alias = "Atlantic")]
    AtlanticForest,
    Cerrado,
    Pantanal,
}

impl Biome {
    /// Parses a biome label, accepting the legacy `Atlantic` spelling.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Atlantic Forest" | "Atlantic" => Some(Biome::AtlanticForest),
            "Cerrado" => Some(Biome::Cerrado),
            "Pantanal" => Some(Biome::Pantanal),
            _ => None,
        }
    }

    /// Canonical spelling of a label; unknown labels pass through unchanged.
    pub fn normalize_label(label: &str) -> String {
        Self::from_label(label)
            .map(|b| b.to_string())
            .unwrap_or_else(|| label.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Position {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Both coordinates are needed for a position to exist.
    pub fn from_parts(latitude_deg: Option<f64>, longitude_deg: Option<f64>) -> Option<Self> {
        Some(Self::new(latitude_deg?, longitude_deg?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_full_label() {
        assert_eq!(Biome::AtlanticForest.to_string(), "Atlantic Forest");
        assert_eq!(Biome::Cerrado.to_string(), "Cerrado");
    }

    #[test]
    fn legacy_atlantic_label_is_normalized() {
        assert_eq!(Biome::normalize_label("Atlantic"), "Atlantic Forest");
        assert_eq!(Biome::normalize_label("Pantanal"), "Pantanal");
        assert_eq!(Biome::normalize_label("Caatinga"), "Caatinga");
    }

    #[test]
    fn position_requires_both_coordinates() {
        assert!(Position::from_parts(Some(1.0), None).is_none());
        assert!(Position::from_parts(None, Some(1.0)).is_none());
        assert_eq!(
            Position::from_parts(Some(-19.5), Some(-56.1)),
            Some(Position::new(-19.5, -56.1))
        );
    }
}
