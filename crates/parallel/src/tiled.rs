//! Band-wise evaluation of lattice-shaped grids

use crate::strategy::{ParallelStrategy, ProcessingMode};
use ndarray::Array2;

/// A rectangular block of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Row offset in the full grid
    pub row_offset: usize,
    /// Column offset in the full grid
    pub col_offset: usize,
    /// Number of rows in this tile
    pub rows: usize,
    /// Number of columns in this tile
    pub cols: usize,
}

impl Tile {
    /// Create a new tile
    pub fn new(row_offset: usize, col_offset: usize, rows: usize, cols: usize) -> Self {
        Self {
            row_offset,
            col_offset,
            rows,
            cols,
        }
    }

    /// Number of cells in the tile
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Convert tile-local coordinates to full-grid coordinates
    pub fn to_source_coords(&self, local_row: usize, local_col: usize) -> (usize, usize) {
        (self.row_offset + local_row, self.col_offset + local_col)
    }
}

/// Fills a grid band by band.
///
/// Each band of full-width rows is evaluated straight into its slice of the
/// output, so nothing beyond the output grid itself is allocated.
#[derive(Debug, Clone, Copy)]
pub struct TiledProcessor {
    tile_rows: usize,
    mode: ProcessingMode,
}

impl TiledProcessor {
    /// Processor working on bands of `tile_rows` full-width rows.
    /// A band height of zero is treated as one.
    pub fn row_bands(tile_rows: usize, mode: ProcessingMode) -> Self {
        Self {
            tile_rows: tile_rows.max(1),
            mode,
        }
    }

    /// Build a `rows x cols` grid where each cell is `f(row, col)`.
    pub fn fill<T, F>(&self, rows: usize, cols: usize, f: F) -> Array2<T>
    where
        T: Copy + Default + Send,
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let mut output = Array2::from_elem((rows, cols), T::default());
        if rows == 0 || cols == 0 {
            return output;
        }

        let tile_rows = self.tile_rows;
        // A freshly allocated array is in standard (row-major) layout
        if let Some(data) = output.as_slice_mut() {
            self.mode.for_each_chunk_mut(data, tile_rows * cols, |band, chunk| {
                let tile = Tile::new(band * tile_rows, 0, chunk.len() / cols, cols);
                debug_assert_eq!(tile.cells(), chunk.len());
                for (k, cell) in chunk.iter_mut().enumerate() {
                    let (row, col) = tile.to_source_coords(k / cols, k % cols);
                    *cell = f(row, col);
                }
            });
        }
        output
    }
}
