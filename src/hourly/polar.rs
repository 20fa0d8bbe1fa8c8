use std::collections::BTreeMap;

use crate::hourly::HourlyCount;

/// How counts map to a radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialScale {
    Linear,
    /// `log10`, with zero counted as one.
    Log10,
}

impl RadialScale {
    pub fn apply(self, count: usize) -> f64 {
        match self {
            RadialScale::Linear => count as f64,
            RadialScale::Log10 => (count.max(1) as f64).log10(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub theta: f64,
    pub radius: f64,
}

impl PolarPoint {
    /// Zero angle points north and angles grow clockwise.
    pub fn to_cartesian(self) -> (f64, f64) {
        (
            self.radius * self.theta.sin(),
            self.radius * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolarSeries {
    pub label: String,
    pub points: Vec<PolarPoint>,
}

impl PolarSeries {
    pub fn max_radius(&self) -> f64 {
        self.points.iter().map(|p| p.radius).fold(0.0, f64::max)
    }
}

/// One closed series per distinct value of `keys[key]`, ordered by label.
///
/// Points run in hour order and the first point is repeated at the end.
pub fn polar_series(counts: &[HourlyCount], key: usize, scale: RadialScale) -> Vec<PolarSeries> {
    let mut groups: BTreeMap<&str, Vec<&HourlyCount>> = BTreeMap::new();
    for c in counts {
        if let Some(label) = c.keys.get(key) {
            groups.entry(label.as_str()).or_default().push(c);
        }
    }

    groups
        .into_iter()
        .map(|(label, mut group)| {
            group.sort_by_key(|c| c.hour);
            let mut points: Vec<PolarPoint> = group
                .iter()
                .map(|c| PolarPoint {
                    theta: c.radian(),
                    radius: scale.apply(c.count),
                })
                .collect();
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
            PolarSeries {
                label: label.to_string(),
                points,
            }
        })
        .collect()
}
