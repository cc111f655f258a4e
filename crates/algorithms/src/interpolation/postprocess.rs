//! Normalization of raw interpolation output

use ndarray::{s, Array2};
use pointgrid_core::{Error, Result};

/// Nodata sentinel written into cells without a defined value.
pub const DEFAULT_NODATA: f64 = -2.0;

/// Check that a nodata sentinel cannot be confused with a valid value.
///
/// Valid values are clamped to be non-negative, so any finite negative
/// sentinel is unambiguous.
pub fn validate_nodata(nodata: f64) -> Result<()> {
    if !(nodata.is_finite() && nodata < 0.0) {
        return Err(Error::invalid_parameter(
            "nodata",
            nodata,
            "sentinel must be finite and negative",
        ));
    }
    Ok(())
}

/// Turn a raw interpolated grid into an image grid.
///
/// `raw` is in lattice orientation (row 0 = minimum y). The result has row 0
/// as the maximum-y row, every NaN replaced by `nodata`, and every other
/// negative value clamped to 0. Returns the grid and the number of nodata
/// cells.
pub fn finalize_grid(raw: Array2<f64>, nodata: f64) -> (Array2<f64>, usize) {
    let mut grid = raw
        .slice(s![..;-1, ..])
        .as_standard_layout()
        .into_owned();

    let mut nodata_cells = 0;
    grid.mapv_inplace(|v| {
        if v.is_nan() {
            nodata_cells += 1;
            nodata
        } else if v < 0.0 {
            0.0
        } else {
            v
        }
    });

    (grid, nodata_cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rows_are_flipped() {
        let raw = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let (grid, nodata) = finalize_grid(raw, DEFAULT_NODATA);
        assert_eq!(grid, array![[5.0, 6.0], [3.0, 4.0], [1.0, 2.0]]);
        assert_eq!(nodata, 0);
    }

    #[test]
    fn test_nan_becomes_sentinel_and_negatives_clamp() {
        let raw = array![[f64::NAN, -0.5], [-2.0, 7.0]];
        let (grid, nodata) = finalize_grid(raw, DEFAULT_NODATA);
        // Row order flipped: [-2, 7] first
        assert_eq!(grid, array![[0.0, 7.0], [DEFAULT_NODATA, 0.0]]);
        assert_eq!(nodata, 1);
    }

    #[test]
    fn test_no_negative_non_sentinel_values() {
        let raw = Array2::from_shape_fn((8, 9), |(r, c)| {
            if (r + c) % 5 == 0 {
                f64::NAN
            } else {
                (r as f64 - 4.0) * (c as f64 - 3.0)
            }
        });
        let nan_count = raw.iter().filter(|v| v.is_nan()).count();
        let (grid, nodata) = finalize_grid(raw, -9999.0);

        assert_eq!(nodata, nan_count);
        assert!(grid.iter().all(|&v| v == -9999.0 || v >= 0.0));
        assert_eq!(grid.iter().filter(|&&v| v == -9999.0).count(), nan_count);
    }

    #[test]
    fn test_validate_nodata() {
        assert!(validate_nodata(DEFAULT_NODATA).is_ok());
        assert!(validate_nodata(0.0).is_err());
        assert!(validate_nodata(5.0).is_err());
        assert!(validate_nodata(f64::NAN).is_err());
        assert!(validate_nodata(f64::NEG_INFINITY).is_err());
    }
}
