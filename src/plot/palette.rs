use plotters::style::{Color, Palette, Palette99, RGBColor, BLUE, RED};

use crate::telemetry::Biome;

const PURPLE: RGBColor = RGBColor(128, 0, 128);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Colors of the circular biome chart.
pub fn biome_color(label: &str) -> RGBColor {
    match Biome::from_label(label) {
        Some(Biome::AtlanticForest) => BLUE,
        Some(Biome::Cerrado) => PURPLE,
        Some(Biome::Pantanal) => ORANGE,
        None => GRAY,
    }
}

pub fn sex_color(label: &str) -> RGBColor {
    match label {
        "FEMALE" => PURPLE,
        "MALE" => ORANGE,
        _ => GRAY,
    }
}

/// Colors of the altitude/speed scatter.
pub fn scatter_biome_color(label: &str) -> RGBColor {
    match Biome::from_label(label) {
        Some(Biome::Pantanal) => BLUE,
        Some(Biome::Cerrado) => RED,
        _ => GRAY,
    }
}

/// Cycles through a fixed palette for series without a named color.
pub fn series_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::pick(index).rgb();
    RGBColor(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_biome_label_shares_the_color() {
        assert_eq!(biome_color("Atlantic"), biome_color("Atlantic Forest"));
        assert_eq!(biome_color("Tundra"), GRAY);
    }

    #[test]
    fn series_colors_differ_between_neighbors() {
        assert_ne!(series_color(0), series_color(1));
    }
}
