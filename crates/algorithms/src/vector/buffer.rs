//! Buffered envelope of a point set
//!
//! The bounding rectangle of the points grown outward by a distance. Corners
//! are quarter circles approximated as polygon arcs, which is what buffering
//! a rectangle produces.

use geo::{LineString, Polygon};
use pointgrid_core::{Error, Result, SamplePoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::spatial::BoundingBox;

/// Parameters for buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParams {
    /// Buffer distance, zero or positive
    pub distance: f64,
    /// Number of segments per quarter circle (default: 16)
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            segments: 16,
        }
    }
}

/// Bounding rectangle of `points` expanded by `params.distance`.
///
/// The ring is counter-clockwise, starts on the bottom edge and has
/// `4 * (segments + 1)` distinct vertices. With a zero distance the plain
/// bounding rectangle is returned.
///
/// # Errors
/// `DegenerateInput` for an empty slice, `InvalidParameter` for a negative
/// or non-finite distance.
pub fn minimum_rectangle(points: &[SamplePoint], params: &BufferParams) -> Result<Polygon<f64>> {
    let bbox = BoundingBox::from_points(points)
        .ok_or_else(|| Error::DegenerateInput("No sample points provided".into()))?;

    let r = params.distance;
    if !(r.is_finite() && r >= 0.0) {
        return Err(Error::invalid_parameter(
            "distance",
            r,
            "must be finite and not negative",
        ));
    }
    if r == 0.0 {
        return Ok(bbox.to_polygon());
    }

    let n = params.segments.max(1);
    // Arc centers in ring order, each with the angle its arc starts at
    let corners = [
        (bbox.max_x, bbox.min_y, -FRAC_PI_2),
        (bbox.max_x, bbox.max_y, 0.0),
        (bbox.min_x, bbox.max_y, FRAC_PI_2),
        (bbox.min_x, bbox.min_y, 2.0 * FRAC_PI_2),
    ];

    let mut coords = Vec::with_capacity(4 * (n + 1) + 1);
    for &(cx, cy, start) in &corners {
        for i in 0..=n {
            let angle = start + FRAC_PI_2 * i as f64 / n as f64;
            coords.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    // Close the ring
    coords.push(coords[0]);

    Ok(Polygon::new(LineString::from(coords), vec![]))
}
