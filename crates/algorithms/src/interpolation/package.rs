//! Packaging of finished grids into georeferenced raster images

use ndarray::Array2;
use pointgrid_core::raster::{GeoTransform, Lattice, RasterImage};
use pointgrid_core::{Error, Result, CRS};
use tracing::warn;

/// Wrap an oriented, normalized grid into a [`RasterImage`].
///
/// The geotransform is anchored at the lattice's `(min_x, max_y)` node with
/// pixel width `cell_size` and pixel height `-cell_size`; the projection is
/// the CRS as well-known text.
///
/// # Errors
/// - [`Error::DegenerateInput`] when `crs` is `None` or has no WKT form
/// - [`Error::ShapeMismatch`] when `grid` and `lattice` disagree in shape
/// - [`Error::InvalidParameter`] when `cell_size` is not positive or `nodata` is NaN
pub fn package_raster(
    grid: Array2<f64>,
    lattice: &Lattice,
    cell_size: f64,
    crs: Option<&CRS>,
    nodata: f64,
    band_names: Vec<String>,
) -> Result<RasterImage> {
    let crs = crs.ok_or_else(|| Error::DegenerateInput("no CRS to derive a projection from".into()))?;
    let projection = crs.to_wkt()?;

    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::invalid_parameter(
            "cell_size",
            cell_size,
            "must be finite and greater than zero",
        ));
    }

    let (er, ec) = lattice.shape();
    let (ar, ac) = grid.dim();
    if (er, ec) != (ar, ac) {
        return Err(Error::ShapeMismatch { er, ec, ar, ac });
    }

    let mut transform = lattice.geotransform();
    if (cell_size - lattice.cell_size()).abs() > 1e-12 * cell_size {
        warn!(
            cell_size,
            lattice_cell_size = lattice.cell_size(),
            "packaging with a cell size different from the lattice spacing"
        );
        transform = GeoTransform {
            pixel_width: cell_size,
            pixel_height: -cell_size,
            ..transform
        };
    }

    RasterImage::new(grid, transform, projection, Some(nodata), band_names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> Lattice {
        Lattice::new(100.0, 200.0, 2, 3, 5.0).unwrap()
    }

    #[test]
    fn test_package_geotransform() {
        let raster = package_raster(
            Array2::zeros((2, 3)),
            &lattice(),
            5.0,
            Some(&CRS::utm(33, true)),
            -2.0,
            vec!["pb".into()],
        )
        .unwrap();

        assert_eq!(raster.transform().to_gdal(), [100.0, 5.0, 0.0, 205.0, 0.0, -5.0]);
        assert!(raster.projection().contains("UTM zone 33N"));
        assert_eq!(raster.nodata(), Some(-2.0));
        assert_eq!(raster.band_names(), &["pb".to_string()]);
    }

    #[test]
    fn test_bounds_match_lattice_footprint() {
        let lattice = lattice();
        let raster = package_raster(
            Array2::zeros(lattice.shape()),
            &lattice,
            lattice.cell_size(),
            Some(&CRS::web_mercator()),
            -2.0,
            vec![],
        )
        .unwrap();
        assert_eq!(raster.bounds(), lattice.cell_bounds());
    }

    #[test]
    fn test_explicit_cell_size_wins() {
        let raster = package_raster(
            Array2::zeros((2, 3)),
            &lattice(),
            2.5,
            Some(&CRS::wgs84()),
            -2.0,
            vec![],
        )
        .unwrap();
        assert_eq!(raster.transform().to_gdal(), [100.0, 2.5, 0.0, 205.0, 0.0, -2.5]);
    }

    #[test]
    fn test_missing_crs() {
        let err = package_raster(Array2::zeros((2, 3)), &lattice(), 5.0, None, -2.0, vec![]).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = package_raster(
            Array2::zeros((3, 2)),
            &lattice(),
            5.0,
            Some(&CRS::wgs84()),
            -2.0,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { er: 2, ec: 3, ar: 3, ac: 2 }));
    }
}
