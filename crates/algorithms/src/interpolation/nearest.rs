//! Nearest Neighbor interpolation
//!
//! Assigns each lattice node the value of the closest sample point.
//! Fast and simple, produces a Voronoi-like tessellation.

use ndarray::Array2;
use pointgrid_core::raster::{Lattice, RasterImage};
use pointgrid_core::vector::PointSet;
use pointgrid_core::{Algorithm, Error, Result};
use pointgrid_parallel::{ProcessingMode, TiledProcessor};
use serde::{Deserialize, Serialize};

use super::kdtree::KdTree;
use super::{run_pipeline, GridParams, SamplePoint, DEFAULT_NODATA};

/// Parameters for Nearest Neighbor interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestParams {
    /// Lattice cell size and extent buffer
    pub grid: GridParams,
    /// Maximum search radius. Nodes farther than this from every sample
    /// point have no value and become nodata. `None` for unlimited.
    pub max_radius: Option<f64>,
    /// Sentinel for nodes without a value (default: -2.0)
    pub nodata: f64,
    /// Lattice rows evaluated per tile
    pub tile_rows: usize,
    /// Sequential or parallel tile evaluation
    pub mode: ProcessingMode,
}

impl Default for NearestParams {
    fn default() -> Self {
        Self {
            grid: GridParams::default(),
            max_radius: None,
            nodata: DEFAULT_NODATA,
            tile_rows: 64,
            mode: ProcessingMode::Sequential,
        }
    }
}

impl NearestParams {
    fn validate(&self) -> Result<()> {
        if self.tile_rows == 0 {
            return Err(Error::invalid_parameter("tile_rows", 0, "must be at least 1"));
        }
        if let Some(r) = self.max_radius {
            if !(r >= 0.0) {
                return Err(Error::invalid_parameter("max_radius", r, "must be non-negative"));
            }
        }
        Ok(())
    }
}

/// Nearest Neighbor interpolation algorithm
#[derive(Debug, Clone, Default)]
pub struct NearestInterpolator;

impl Algorithm for NearestInterpolator {
    type Input = PointSet;
    type Output = RasterImage;
    type Params = NearestParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Nearest Neighbor"
    }

    fn description(&self) -> &'static str {
        "Grid scattered points by assigning each cell the value of its closest point"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        interpolate_nearest(&input, &params)
    }
}

/// Grid a point set with nearest-neighbor assignment.
///
/// Builds the lattice from `params.grid`, assigns every node its nearest
/// point's value, flips the grid north-up, writes `params.nodata` into nodes
/// outside `max_radius`, clamps negatives to 0 and packages the result with
/// the point set's CRS and field name.
pub fn interpolate_nearest(points: &PointSet, params: &NearestParams) -> Result<RasterImage> {
    params.validate()?;
    run_pipeline("nearest", points, &params.grid, params.nodata, |lattice| {
        nearest_neighbor(points.points(), lattice, params)
    })
}

/// Assign each lattice node the value of the closest sample point.
///
/// Distance is Euclidean on x and y. When several points are equally close,
/// the one that comes first in `points` wins. Nodes beyond `max_radius` are
/// NaN.
///
/// # Returns
/// A raw grid in lattice orientation (row 0 = minimum y).
pub fn nearest_neighbor(
    points: &[SamplePoint],
    lattice: &Lattice,
    params: &NearestParams,
) -> Result<Array2<f64>> {
    if points.is_empty() {
        return Err(Error::DegenerateInput("No sample points provided".into()));
    }
    params.validate()?;

    let tree = KdTree::build(points);
    let max_radius_sq = params.max_radius.map(|r| r * r);

    let (rows, cols) = lattice.shape();
    let processor = TiledProcessor::row_bands(params.tile_rows, params.mode);

    Ok(processor.fill(rows, cols, |row, col| {
        let (x, y) = lattice.node(row, col);
        match tree.nearest(x, y) {
            Some(hit) if max_radius_sq.map_or(true, |max_sq| hit.distance_sq <= max_sq) => {
                hit.point.value
            }
            _ => f64::NAN,
        }
    }))
}
