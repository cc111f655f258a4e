//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates values at lattice nodes as a weighted average of the sample
//! points, where weights are inversely proportional to distance raised to a
//! power parameter.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use ndarray::Array2;
use pointgrid_core::raster::{Lattice, RasterImage};
use pointgrid_core::vector::PointSet;
use pointgrid_core::{Algorithm, Error, Result};
use pointgrid_parallel::{ProcessingMode, TiledProcessor};
use serde::{Deserialize, Serialize};

use super::kdtree::KdTree;
use super::{run_pipeline, GridParams, SamplePoint, DEFAULT_NODATA};

/// Offset added to every distance and to every weight sum.
///
/// Keeps the weight of a sample that coincides with a node finite (and very
/// large, so that sample dominates) and keeps an all-zero weight sum from
/// dividing by zero.
pub const IDW_EPSILON: f64 = 1e-10;

/// Parameters for IDW interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdwParams {
    /// Lattice cell size and extent buffer
    pub grid: GridParams,
    /// Power parameter (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub power: f64,
    /// Blend only the k nearest points. `None` blends every point (global IDW).
    pub max_points: Option<usize>,
    /// Sentinel for nodes without a value (default: -2.0)
    pub nodata: f64,
    /// Lattice rows evaluated per tile (default: 64)
    pub tile_rows: usize,
    /// Sequential or parallel tile evaluation
    pub mode: ProcessingMode,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            grid: GridParams::default(),
            power: 2.0,
            max_points: None,
            nodata: DEFAULT_NODATA,
            tile_rows: 64,
            mode: ProcessingMode::Sequential,
        }
    }
}

impl IdwParams {
    fn validate(&self) -> Result<()> {
        if !(self.power.is_finite() && self.power > 0.0) {
            return Err(Error::invalid_parameter(
                "power",
                self.power,
                "must be finite and greater than zero",
            ));
        }
        if self.max_points == Some(0) {
            return Err(Error::invalid_parameter("max_points", 0, "must be at least 1"));
        }
        if self.tile_rows == 0 {
            return Err(Error::invalid_parameter("tile_rows", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// IDW interpolation algorithm
#[derive(Debug, Clone, Default)]
pub struct IdwInterpolator;

impl Algorithm for IdwInterpolator {
    type Input = PointSet;
    type Output = RasterImage;
    type Params = IdwParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "IDW"
    }

    fn description(&self) -> &'static str {
        "Grid scattered points with inverse distance weighting"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        interpolate_idw(&input, &params)
    }
}

/// Grid a point set with inverse distance weighting.
///
/// Same pipeline as nearest-neighbor gridding: the lattice honours
/// `params.grid.buffer`, the grid is flipped north-up, NaN nodes become
/// `params.nodata` and negatives are clamped to 0.
pub fn interpolate_idw(points: &PointSet, params: &IdwParams) -> Result<RasterImage> {
    params.validate()?;
    run_pipeline("idw", points, &params.grid, params.nodata, |lattice| {
        idw(points.points(), lattice, params)
    })
}

#[inline]
fn weight(distance: f64, power: f64) -> f64 {
    1.0 / (distance + IDW_EPSILON).powf(power)
}

/// Normalized IDW weights of every point for the location (x, y).
///
/// ```text
/// w_i = 1 / (d_i + ε)^p
/// W_i = w_i / (Σ w + ε)
/// ```
///
/// The weights sum to `Σw / (Σw + ε)`, i.e. 1 up to a relative error of
/// `ε / Σw`.
pub fn idw_weights(points: &[SamplePoint], x: f64, y: f64, power: f64) -> Vec<f64> {
    let raw: Vec<f64> = points.iter().map(|p| weight(p.dist(x, y), power)).collect();
    let total: f64 = raw.iter().sum::<f64>() + IDW_EPSILON;
    raw.into_iter().map(|w| w / total).collect()
}

/// Perform IDW interpolation from scattered points onto a lattice.
///
/// # Algorithm
///
/// For each lattice node at position (x, y):
///
/// ```text
/// z(x,y) = Σ(W_i * z_i)    with W_i from [`idw_weights`]
/// ```
///
/// Each node accumulates `Σw` and `Σw·z` in a single pass over the points,
/// so no point-by-node distance array is ever materialized. Bands of
/// `tile_rows` rows are written straight into the output grid. With `max_points` the
/// sums run over the k nearest points found through a k-d tree.
///
/// Weights that overflow (very high powers at a coincident node) give NaN,
/// which the pipeline turns into nodata.
///
/// # Returns
/// A raw grid in lattice orientation (row 0 = minimum y).
pub fn idw(points: &[SamplePoint], lattice: &Lattice, params: &IdwParams) -> Result<Array2<f64>> {
    if points.is_empty() {
        return Err(Error::DegenerateInput("No sample points provided".into()));
    }
    params.validate()?;

    let power = params.power;
    let tree = params.max_points.map(|_| KdTree::build(points));

    let (rows, cols) = lattice.shape();
    let processor = TiledProcessor::row_bands(params.tile_rows, params.mode);

    Ok(processor.fill(rows, cols, |row, col| {
        let (x, y) = lattice.node(row, col);

        let mut sum_w = 0.0;
        let mut sum_wz = 0.0;
        match (&tree, params.max_points) {
            (Some(tree), Some(k)) => {
                for hit in tree.k_nearest(x, y, k) {
                    let w = weight(hit.distance_sq.sqrt(), power);
                    sum_w += w;
                    sum_wz += w * hit.point.value;
                }
            }
            _ => {
                for p in points {
                    let w = weight(p.dist(x, y), power);
                    sum_w += w;
                    sum_wz += w * p.value;
                }
            }
        }

        sum_wz / (sum_w + IDW_EPSILON)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pointgrid_core::CRS;

    fn sample_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 0.0, 10.0),
            SamplePoint::new(10.0, 0.0, 20.0),
            SamplePoint::new(0.0, 10.0, 30.0),
            SamplePoint::new(10.0, 10.0, 40.0),
        ]
    }

    fn lattice() -> Lattice {
        Lattice::new(0.0, 0.0, 11, 11, 1.0).unwrap()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let points = sample_points();
        for &(x, y) in &[(5.0, 5.0), (0.0, 0.0), (3.3, 7.1), (-4.0, 12.0), (10.0, 2.5)] {
            for &power in &[0.5, 1.0, 2.0, 3.0] {
                let weights = idw_weights(&points, x, y, power);
                let sum: f64 = weights.iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-7);
                assert!(weights.iter().all(|&w| w > 0.0));
            }
        }
    }

    #[test]
    fn test_weights_favor_nearer_points() {
        let weights = idw_weights(&sample_points(), 1.0, 2.0, 2.0);
        assert!(weights[0] > weights[1]);
        assert!(weights[0] > weights[2]);
        assert!(weights[2] > weights[3]);
    }

    #[test]
    fn test_idw_matches_weights() {
        let points = sample_points();
        let lattice = lattice();
        let raw = idw(&points, &lattice, &IdwParams::default()).unwrap();

        for &(row, col) in &[(3, 4), (7, 1), (10, 9)] {
            let (x, y) = lattice.node(row, col);
            let expected: f64 = idw_weights(&points, x, y, 2.0)
                .iter()
                .zip(&points)
                .map(|(w, p)| w * p.value)
                .sum();
            assert_relative_eq!(raw[(row, col)], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_idw_center_is_average() {
        let raw = idw(&sample_points(), &lattice(), &IdwParams::default()).unwrap();
        assert_relative_eq!(raw[(5, 5)], 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_idw_at_sample_points() {
        let raw = idw(&sample_points(), &lattice(), &IdwParams::default()).unwrap();
        assert_relative_eq!(raw[(0, 0)], 10.0, epsilon = 1e-9);
        assert_relative_eq!(raw[(0, 10)], 20.0, epsilon = 1e-9);
        assert_relative_eq!(raw[(10, 0)], 30.0, epsilon = 1e-9);
        assert_relative_eq!(raw[(10, 10)], 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_idw_converges_to_sample() {
        let points = sample_points();
        let mut previous = f64::INFINITY;
        for k in 1..8 {
            let offset = 10f64.powi(-k);
            let lattice = Lattice::new(offset, offset, 1, 1, 1.0).unwrap();
            let raw = idw(&points, &lattice, &IdwParams::default()).unwrap();
            let error = (raw[(0, 0)] - 10.0).abs();
            assert!(error < previous, "error {} did not shrink at offset {}", error, offset);
            previous = error;
        }
        assert!(previous < 1e-9);
    }

    #[test]
    fn test_idw_power_effect() {
        let points = sample_points();
        let low = idw(&points, &lattice(), &IdwParams { power: 1.0, ..Default::default() }).unwrap();
        let high = idw(&points, &lattice(), &IdwParams { power: 4.0, ..Default::default() }).unwrap();

        // Node (1, 1) is next to the sample valued 10
        assert!((high[(1, 1)] - 10.0).abs() < (low[(1, 1)] - 10.0).abs());
    }

    #[test]
    fn test_idw_single_point() {
        let points = vec![SamplePoint::new(5.0, 5.0, 42.0)];
        let raw = idw(&points, &lattice(), &IdwParams::default()).unwrap();
        for &v in raw.iter() {
            assert_relative_eq!(v, 42.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_idw_max_points() {
        let points = sample_points();
        let all = idw(&points, &lattice(), &IdwParams::default()).unwrap();
        let four = idw(&points, &lattice(), &IdwParams { max_points: Some(4), ..Default::default() }).unwrap();
        for (a, b) in all.iter().zip(four.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }

        // With one neighbor IDW degenerates to nearest neighbor away from ties
        let one = idw(&points, &lattice(), &IdwParams { max_points: Some(1), ..Default::default() }).unwrap();
        assert_relative_eq!(one[(2, 1)], 10.0, epsilon = 1e-7);
        assert_relative_eq!(one[(9, 8)], 40.0, epsilon = 1e-7);
    }

    #[test]
    fn test_idw_tiling_and_parallel_agree() {
        let points = sample_points();
        let base = idw(&points, &lattice(), &IdwParams::default()).unwrap();
        for (tile_rows, mode) in [(1, ProcessingMode::Sequential), (4, ProcessingMode::Parallel)] {
            let other = idw(&points, &lattice(), &IdwParams { tile_rows, mode, ..Default::default() }).unwrap();
            assert_eq!(base, other);
        }
    }

    #[test]
    fn test_idw_invalid_params() {
        let points = sample_points();
        for params in [
            IdwParams { power: 0.0, ..Default::default() },
            IdwParams { power: f64::NAN, ..Default::default() },
            IdwParams { max_points: Some(0), ..Default::default() },
            IdwParams { tile_rows: 0, ..Default::default() },
        ] {
            assert!(matches!(
                idw(&points, &lattice(), &params),
                Err(Error::InvalidParameter { .. })
            ));
        }
        assert!(idw(&[], &lattice(), &IdwParams::default()).is_err());
    }

    #[test]
    fn test_idw_interpolator_applies_buffer() {
        let set = PointSet::new(sample_points(), "zn", Some(CRS::wgs84())).unwrap();
        let params = IdwParams {
            grid: GridParams::new(5.0, 5.0),
            ..Default::default()
        };
        let raster = IdwInterpolator.execute(set, params).unwrap();

        // -5..15 at step 5
        assert_eq!(raster.shape(), (5, 5));
        assert_eq!(raster.transform().to_gdal(), [-5.0, 5.0, 0.0, 15.0, 0.0, -5.0]);
        assert!(raster.view().iter().all(|&v| v >= 0.0));
    }
}
