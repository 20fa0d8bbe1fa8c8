use std::f64::consts::PI;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::hourly::{hour_to_radian, PolarPoint, PolarSeries};
use crate::plot::{ensure_parent, PlotResult};

const RING_COLOR: RGBColor = RGBColor(210, 210, 210);
const SPOKE_COLOR: RGBColor = RGBColor(235, 235, 235);
const RING_STEPS: usize = 4;
const CIRCLE_SEGMENTS: usize = 96;

/// Single circular chart, hour 0 at the top, running clockwise.
pub fn draw_polar_chart<F>(
    path: &Path,
    title: &str,
    series: &[PolarSeries],
    color_of: F,
) -> PlotResult<()>
where
    F: Fn(usize, &str) -> RGBColor,
{
    ensure_parent(path)?;
    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_polar(&root, title, series, &color_of, true)?;
    root.present()?;
    Ok(())
}

/// One small circular chart per series, `ncols` per row.
pub fn draw_polar_grid<F>(
    path: &Path,
    title: &str,
    series: &[PolarSeries],
    ncols: usize,
    color_of: F,
) -> PlotResult<()>
where
    F: Fn(usize, &str) -> RGBColor,
{
    ensure_parent(path)?;
    let ncols = ncols.max(1);
    let nrows = series.len().div_ceil(ncols).max(1);
    let size = ((ncols * 300) as u32, (nrows * 300 + 40) as u32);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 22))?;

    // Cells past the last series stay blank.
    let cells = root.split_evenly((nrows, ncols));
    for (i, (cell, s)) in cells.iter().zip(series).enumerate() {
        let offset_color = |_: usize, label: &str| color_of(i, label);
        draw_polar(cell, &s.label, std::slice::from_ref(s), &offset_color, false)?;
    }
    root.present()?;
    Ok(())
}

fn draw_polar<DB, F>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &[PolarSeries],
    color_of: &F,
    legend: bool,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    F: Fn(usize, &str) -> RGBColor,
{
    let mut r_max = series
        .iter()
        .map(PolarSeries::max_radius)
        .fold(0.0_f64, f64::max);
    if !r_max.is_finite() || r_max <= 0.0 {
        r_max = 1.0;
    }
    let extent = r_max * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", if legend { 24 } else { 12 }))
        .margin(10)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    for step in 1..=RING_STEPS {
        let r = r_max * step as f64 / RING_STEPS as f64;
        chart.draw_series(LineSeries::new(circle(r), &RING_COLOR))?;
    }

    let label_size = if legend { 14 } else { 8 };
    for hour in 0..24u32 {
        let theta = hour_to_radian(hour);
        let rim = PolarPoint {
            theta,
            radius: r_max,
        }
        .to_cartesian();
        chart.draw_series(LineSeries::new(vec![(0.0, 0.0), rim], &SPOKE_COLOR))?;
        let tag = PolarPoint {
            theta,
            radius: r_max * 1.07,
        }
        .to_cartesian();
        chart.draw_series(std::iter::once(Text::new(
            hour.to_string(),
            tag,
            ("sans-serif", label_size).into_font().color(&BLACK),
        )))?;
    }

    for (i, s) in series.iter().enumerate() {
        let color = color_of(i, &s.label);
        let outline: Vec<(f64, f64)> = s.points.iter().map(|p| p.to_cartesian()).collect();
        chart.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            color.mix(0.3).filled(),
        )))?;
        chart
            .draw_series(LineSeries::new(outline, &color))?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if legend && !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn circle(radius: f64) -> Vec<(f64, f64)> {
    (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            PolarPoint {
                theta: 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64,
                radius,
            }
            .to_cartesian()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hourly::{polar_series, HourlyCount, RadialScale};
    use crate::plot::{biome_color, series_color};
    use tempfile::tempdir;

    fn counts() -> Vec<HourlyCount> {
        (0..24)
            .flat_map(|h| {
                [
                    HourlyCount {
                        hour: h,
                        keys: vec!["Cerrado".into()],
                        count: 10 + h as usize,
                    },
                    HourlyCount {
                        hour: h,
                        keys: vec!["Pantanal".into()],
                        count: 100,
                    },
                ]
            })
            .collect()
    }

    #[test]
    fn circle_is_closed() {
        let c = circle(2.0);
        let first = c[0];
        let last = c[c.len() - 1];
        assert!((first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9);
    }

    #[test]
    fn chart_is_written_as_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plots").join("biome_polar.svg");
        let series = polar_series(&counts(), 0, RadialScale::Log10);
        draw_polar_chart(&path, "Counts per Hour", &series, |_, l| biome_color(l)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("Cerrado"));
    }

    #[test]
    fn grid_leaves_spare_cells_blank() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.svg");
        let series = polar_series(&counts(), 0, RadialScale::Linear);
        draw_polar_grid(&path, "Per individual", &series, 5, |i, _| series_color(i)).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Pantanal"));
    }

    #[test]
    fn empty_chart_still_renders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        draw_polar_chart(&path, "Nothing", &[], |_, l| biome_color(l)).unwrap();
        assert!(path.exists());
    }
}
