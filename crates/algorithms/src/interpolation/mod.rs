//! Point-to-raster interpolation
//!
//! Fill a regular lattice over a point set with interpolated values:
//! - Lattice: node coordinates over the (buffered) point extent
//! - Nearest Neighbor: value from the closest point
//! - IDW: Inverse Distance Weighting over all points
//! - Post-processing and packaging into a georeferenced [`RasterImage`]
//!
//! Both interpolators share the same pipeline: lattice → raw grid →
//! [`finalize_grid`] → [`package_raster`].

mod idw;
pub mod kdtree;
mod lattice;
mod nearest;
mod package;
mod postprocess;

pub use idw::{idw, idw_weights, interpolate_idw, IdwInterpolator, IdwParams, IDW_EPSILON};
pub use kdtree::{KdTree, NearestResult};
pub use lattice::{build_lattice, GridParams, MAX_LATTICE_CELLS};
pub use nearest::{interpolate_nearest, nearest_neighbor, NearestInterpolator, NearestParams};
pub use package::package_raster;
pub use postprocess::{finalize_grid, validate_nodata, DEFAULT_NODATA};

pub use pointgrid_core::SamplePoint;

use ndarray::Array2;
use pointgrid_core::raster::{Lattice, RasterImage};
use pointgrid_core::vector::PointSet;
use pointgrid_core::{Error, Result};
use tracing::{debug, info, warn};

/// Run the shared gridding pipeline with `interpolate` as the fill strategy.
///
/// The CRS and all parameters are checked before the lattice is built, so
/// invalid input fails without doing any interpolation work.
pub(crate) fn run_pipeline<F>(
    method: &'static str,
    points: &PointSet,
    grid: &GridParams,
    nodata: f64,
    interpolate: F,
) -> Result<RasterImage>
where
    F: FnOnce(&Lattice) -> Result<Array2<f64>>,
{
    let crs = points
        .crs()
        .ok_or_else(|| Error::DegenerateInput("point set has no CRS".into()))?;
    crs.to_wkt()?;
    grid.validate()?;
    validate_nodata(nodata)?;

    let lattice = build_lattice(points, grid)?;
    debug!(
        method,
        points = points.len(),
        rows = lattice.rows(),
        cols = lattice.cols(),
        "interpolating"
    );

    let raw = interpolate(&lattice)?;
    let (image, nodata_cells) = finalize_grid(raw, nodata);
    if nodata_cells > 0 {
        warn!(method, nodata_cells, "cells without a defined value set to nodata");
    }

    let raster = package_raster(
        image,
        &lattice,
        grid.cell_size,
        Some(crs),
        nodata,
        vec![points.field().to_string()],
    )?;
    info!(
        method,
        rows = raster.rows(),
        cols = raster.cols(),
        crs = %crs,
        "raster ready"
    );
    Ok(raster)
}
