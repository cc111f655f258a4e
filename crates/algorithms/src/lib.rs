//! # PointGrid Algorithms
//!
//! Turn scattered, attributed points into georeferenced rasters.
//!
//! ## Modules
//!
//! - **interpolation**: lattice construction, nearest neighbor, IDW,
//!   post-processing and raster packaging
//! - **vector**: buffered envelope and sampling spacing of a point set

pub mod interpolation;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        build_lattice, idw, interpolate_idw, interpolate_nearest, nearest_neighbor,
        GridParams, IdwInterpolator, IdwParams, NearestInterpolator, NearestParams,
    };
    pub use crate::vector::{minimum_rectangle, nearest_neighbor_distances, BufferParams};
    pub use pointgrid_core::prelude::*;
}
