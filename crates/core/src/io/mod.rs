//! Writing raster images to geospatial file formats

mod native;

pub use native::{write_geotiff, write_geotiff_to_buffer, GeoTiffOptions};
