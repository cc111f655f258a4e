//! Lattice construction over a point set's extent

use pointgrid_core::raster::Lattice;
use pointgrid_core::vector::PointSet;
use pointgrid_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on the number of lattice nodes a single call may allocate.
pub const MAX_LATTICE_CELLS: usize = 1 << 31;

/// Relative slack when deciding whether a span is an exact multiple of the cell size
const SPAN_TOLERANCE: f64 = 1e-9;

/// Parameters shared by every gridding entry point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Spacing between lattice nodes, in CRS units (default: 1.0)
    pub cell_size: f64,
    /// Distance added to each side of the point extent (default: 0.0)
    pub buffer: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            buffer: 0.0,
        }
    }
}

impl GridParams {
    pub fn new(cell_size: f64, buffer: f64) -> Self {
        Self { cell_size, buffer }
    }

    /// Check cell size and buffer before anything is computed
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(Error::invalid_parameter(
                "cell_size",
                self.cell_size,
                "must be finite and greater than zero",
            ));
        }
        if !(self.buffer.is_finite() && self.buffer >= 0.0) {
            return Err(Error::invalid_parameter(
                "buffer",
                self.buffer,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Build a lattice covering the point extent expanded by `params.buffer`.
///
/// The lattice starts at the lower-left corner of the buffered extent and
/// steps by `params.cell_size` on both axes. Each axis gets
/// `ceil(span / cell_size) + 1` nodes, so the last node reaches or passes the
/// buffered maximum; when the span is a multiple of the cell size the node
/// extent equals the buffered extent exactly.
pub fn build_lattice(points: &PointSet, params: &GridParams) -> Result<Lattice> {
    params.validate()?;
    if points.is_empty() {
        return Err(Error::DegenerateInput("cannot grid an empty point set".into()));
    }

    let (min_x, min_y, max_x, max_y) = points.bounds();
    let b = params.buffer;
    let (min_x, min_y, max_x, max_y) = (min_x - b, min_y - b, max_x + b, max_y + b);

    let cols = node_count(max_x - min_x, params.cell_size);
    let rows = node_count(max_y - min_y, params.cell_size);

    if !(rows * cols <= MAX_LATTICE_CELLS as f64) {
        return Err(Error::invalid_parameter(
            "cell_size",
            params.cell_size,
            format!(
                "lattice of {} x {} nodes exceeds {} cells",
                rows, cols, MAX_LATTICE_CELLS
            ),
        ));
    }

    debug!(
        rows,
        cols,
        cell_size = params.cell_size,
        buffer = params.buffer,
        "built lattice over point extent"
    );

    Lattice::new(min_x, min_y, rows as usize, cols as usize, params.cell_size)
}

/// Nodes needed along one axis, as f64 so oversized lattices can be rejected
/// before casting.
fn node_count(span: f64, cell_size: f64) -> f64 {
    let steps = span / cell_size;
    let nearest = steps.round();
    let steps = if (steps - nearest).abs() <= SPAN_TOLERANCE * nearest.max(1.0) {
        nearest
    } else {
        steps.ceil()
    };
    steps + 1.0
}
