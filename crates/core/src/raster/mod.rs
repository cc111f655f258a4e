//! Raster data structures: lattices, geotransforms and packaged images

mod geotransform;
mod image;
mod lattice;

pub use geotransform::GeoTransform;
pub use image::{RasterImage, RasterStatistics};
pub use lattice::Lattice;
