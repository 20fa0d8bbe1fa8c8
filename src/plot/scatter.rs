use std::path::Path;

use plotters::prelude::IntoLogRange;
use plotters::prelude::*;

use crate::plot::palette::scatter_biome_color;
use crate::plot::{ensure_parent, PlotResult};

const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const FIT_SAMPLES: usize = 64;

/// One altitude/speed observation with its biome label.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomePoint {
    pub altitude: f64,
    pub speed: f64,
    pub biome: String,
}

/// Ordinary least squares `y = slope * x + intercept`.
///
/// `None` with fewer than two points or when every x is equal.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Hour of day against per-point distance in kilometers.
pub fn draw_distance_by_hour(path: &Path, points: &[(u32, f64)]) -> PlotResult<()> {
    ensure_parent(path)?;
    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = points
        .iter()
        .map(|p| p.1)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption("Distance Traveled by Individuals Over Time", ("sans-serif", 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(-0.5..23.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Hour of the Day")
        .y_desc("Distance (km)")
        .x_labels(24)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(points.iter().map(|&(hour, km)| {
        Circle::new((hour as f64, km), 4, POINT_COLOR.mix(0.7).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Altitude (log axis) against speed, colored by biome, with a linear fit.
///
/// Non-positive altitudes cannot sit on a log axis and are left out.
pub fn draw_altitude_speed(path: &Path, points: &[BiomePoint]) -> PlotResult<()> {
    ensure_parent(path)?;
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let plotted: Vec<&BiomePoint> = points
        .iter()
        .filter(|p| p.altitude > 0.0 && p.altitude.is_finite() && p.speed.is_finite())
        .collect();

    let (x_min, x_max) = plotted.iter().fold((f64::INFINITY, 0.0_f64), |acc, p| {
        (acc.0.min(p.altitude), acc.1.max(p.altitude))
    });
    let (x_min, x_max) = if plotted.is_empty() {
        (1.0, 10.0)
    } else {
        (x_min * 0.9, x_max * 1.1)
    };
    let (y_min, y_max) = plotted
        .iter()
        .fold((0.0_f64, 0.0_f64), |acc, p| (acc.0.min(p.speed), acc.1.max(p.speed)));
    let y_max = if y_max > y_min { y_max * 1.1 } else { y_min + 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption("Altitude vs Speed", ("sans-serif", 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((x_min..x_max).log_scale(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Altitude")
        .y_desc("Speed")
        .draw()?;

    let raw: Vec<(f64, f64)> = plotted.iter().map(|p| (p.altitude, p.speed)).collect();
    if let Some((slope, intercept)) = linear_fit(&raw) {
        let ratio = (x_max / x_min).powf(1.0 / FIT_SAMPLES as f64);
        let line = (0..=FIT_SAMPLES).map(|i| {
            let x = x_min * ratio.powi(i as i32);
            (x, slope * x + intercept)
        });
        chart.draw_series(LineSeries::new(line, &BLACK))?;
    }

    let mut biomes: Vec<&str> = plotted.iter().map(|p| p.biome.as_str()).collect();
    biomes.sort_unstable();
    biomes.dedup();
    for biome in biomes {
        let color = scatter_biome_color(biome);
        chart
            .draw_series(
                plotted
                    .iter()
                    .filter(|p| p.biome == biome)
                    .map(|p| Circle::new((p.altitude, p.speed), 6, color.mix(0.5).filled())),
            )?
            .label(biome.to_string())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    if !plotted.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fit_recovers_a_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 3.0 * i as f64 + 1.0)).collect();
        let (slope, intercept) = linear_fit(&points).unwrap();
        assert!((slope - 3.0).abs() < 1e-9);
        assert!((intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_needs_spread_in_x() {
        assert!(linear_fit(&[(1.0, 2.0)]).is_none());
        assert!(linear_fit(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
    }

    #[test]
    fn distance_scatter_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distance.svg");
        draw_distance_by_hour(&path, &[(0, 0.0), (5, 55.66), (23, 1.2)]).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn altitude_scatter_skips_non_positive_altitudes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("altitude.svg");
        let points = vec![
            BiomePoint { altitude: 120.0, speed: 0.4, biome: "Pantanal".into() },
            BiomePoint { altitude: 800.0, speed: 1.1, biome: "Cerrado".into() },
            BiomePoint { altitude: 0.0, speed: 9.0, biome: "Cerrado".into() },
        ];
        draw_altitude_speed(&path, &points).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Pantanal"));
    }
}
