//! Spatial summaries of point sets: bounding box and sampling spacing

use geo::{LineString, Polygon};
use pointgrid_core::{Error, Result, SamplePoint};
use serde::Serialize;

use crate::interpolation::KdTree;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Envelope of the points, `None` for an empty slice
    pub fn from_points(points: &[SamplePoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first.x, first.y, first.x, first.y);
        Some(points.iter().fold(init, |bb, p| Self {
            min_x: bb.min_x.min(p.x),
            min_y: bb.min_y.min(p.y),
            max_x: bb.max_x.max(p.x),
            max_y: bb.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_x, self.min_y),
                (self.max_x, self.min_y),
                (self.max_x, self.max_y),
                (self.min_x, self.max_y),
                (self.min_x, self.min_y),
            ]),
            vec![],
        )
    }
}

/// Distance from every point to the closest other point.
///
/// Duplicated locations give 0. Uses a k-d tree, so the cost is
/// O(n log n) rather than the pairwise O(n²).
///
/// # Errors
/// `DegenerateInput` with fewer than two points.
pub fn nearest_neighbor_distances(points: &[SamplePoint]) -> Result<Vec<f64>> {
    if points.len() < 2 {
        return Err(Error::DegenerateInput(format!(
            "nearest-neighbor distances need at least 2 points, got {}",
            points.len()
        )));
    }

    let tree = KdTree::build(points);
    let distances = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            tree.k_nearest(p.x, p.y, 2)
                .into_iter()
                .find(|hit| hit.index != i)
                .map_or(0.0, |hit| hit.distance_sq.sqrt())
        })
        .collect();
    Ok(distances)
}

/// Min / mean / max of the nearest-neighbor distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub count: usize,
}

/// Summarize the sampling spacing of a point set
pub fn spacing_summary(points: &[SamplePoint]) -> Result<SpacingSummary> {
    let distances = nearest_neighbor_distances(points)?;
    let count = distances.len();
    let (min, max, sum) = distances.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), &d| (min.min(d), max.max(d), sum + d),
    );
    Ok(SpacingSummary {
        min,
        mean: sum / count as f64,
        max,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounding_box_from_points() {
        let points = vec![
            SamplePoint::new(3.0, -1.0, 0.0),
            SamplePoint::new(-2.0, 4.0, 0.0),
            SamplePoint::new(1.0, 1.0, 0.0),
        ];
        let bb = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bb, BoundingBox::new(-2.0, -1.0, 3.0, 4.0));
        assert_relative_eq!(bb.width(), 5.0);
        assert_relative_eq!(bb.height(), 5.0);
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_nearest_neighbor_distances() {
        let points = vec![
            SamplePoint::new(0.0, 0.0, 1.0),
            SamplePoint::new(3.0, 4.0, 1.0),
            SamplePoint::new(3.0, 5.0, 1.0),
            SamplePoint::new(10.0, 0.0, 1.0),
        ];
        let d = nearest_neighbor_distances(&points).unwrap();
        assert_relative_eq!(d[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(d[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(d[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(d[3], 65f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_duplicates_are_zero() {
        let points = vec![
            SamplePoint::new(1.0, 1.0, 1.0),
            SamplePoint::new(1.0, 1.0, 2.0),
            SamplePoint::new(1.0, 1.0, 3.0),
            SamplePoint::new(4.0, 5.0, 4.0),
        ];
        let d = nearest_neighbor_distances(&points).unwrap();
        assert_eq!(&d[..3], &[0.0, 0.0, 0.0]);
        assert_relative_eq!(d[3], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spacing_summary() {
        let points: Vec<SamplePoint> = (0..5)
            .map(|i| SamplePoint::new(i as f64 * 2.0, 0.0, 0.0))
            .collect();
        let summary = spacing_summary(&points).unwrap();
        assert_eq!(summary.count, 5);
        assert_relative_eq!(summary.min, 2.0);
        assert_relative_eq!(summary.mean, 2.0);
        assert_relative_eq!(summary.max, 2.0);
    }

    #[test]
    fn test_needs_two_points() {
        let one = [SamplePoint::new(0.0, 0.0, 0.0)];
        assert!(matches!(
            nearest_neighbor_distances(&one),
            Err(Error::DegenerateInput(_))
        ));
    }
}
