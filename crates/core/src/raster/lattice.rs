//! Regular coordinate lattice

use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use ndarray::{Array2, ArrayView2};

/// A regular grid of node coordinates at a fixed spacing.
///
/// Holds two arrays of identical shape `(rows, cols)`: the x coordinate and
/// the y coordinate of every node. Row 0 is the southernmost row (minimum y)
/// and column 0 the westernmost, so `y` grows with the row index. Node
/// coordinates are computed as `min + index * cell_size` rather than by
/// accumulation, which keeps the spacing exact along both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    x: Array2<f64>,
    y: Array2<f64>,
    min_x: f64,
    min_y: f64,
    cell_size: f64,
}

impl Lattice {
    /// Create a lattice of `rows x cols` nodes whose lower-left node sits at
    /// `(min_x, min_y)`.
    pub fn new(min_x: f64, min_y: f64, rows: usize, cols: usize, cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::invalid_parameter(
                "cell_size",
                cell_size,
                "must be finite and greater than zero",
            ));
        }
        if rows == 0 || cols == 0 {
            return Err(Error::invalid_parameter(
                "shape",
                format!("{}x{}", rows, cols),
                "lattice needs at least one node per axis",
            ));
        }
        if !(min_x.is_finite() && min_y.is_finite()) {
            return Err(Error::DegenerateInput(format!(
                "lattice origin ({}, {}) is not finite",
                min_x, min_y
            )));
        }

        let x = Array2::from_shape_fn((rows, cols), |(_, col)| min_x + col as f64 * cell_size);
        let y = Array2::from_shape_fn((rows, cols), |(row, _)| min_y + row as f64 * cell_size);

        Ok(Self {
            x,
            y,
            min_x,
            min_y,
            cell_size,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.x.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false: a lattice has at least one node
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Spacing between adjacent nodes
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// X coordinates of every node
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    /// Y coordinates of every node
    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    /// Coordinates of the node at (row, col)
    #[inline]
    pub fn node(&self, row: usize, col: usize) -> (f64, f64) {
        (self.x[(row, col)], self.y[(row, col)])
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + (self.cols() - 1) as f64 * self.cell_size
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + (self.rows() - 1) as f64 * self.cell_size
    }

    /// Extent of the node coordinates `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x(), self.max_y())
    }

    /// North-up geotransform whose upper-left corner is the node
    /// `(min_x, max_y)`.
    pub fn geotransform(&self) -> GeoTransform {
        GeoTransform::north_up(self.min_x, self.max_y(), self.cell_size)
    }

    /// Footprint `(min_x, min_y, max_x, max_y)` of the image cells when every
    /// node is taken as the upper-left corner of its cell.
    pub fn cell_bounds(&self) -> (f64, f64, f64, f64) {
        let max_y = self.max_y();
        (
            self.min_x,
            max_y - self.rows() as f64 * self.cell_size,
            self.min_x + self.cols() as f64 * self.cell_size,
            max_y,
        )
    }
}
