//! Vector helpers for point sets
//!
//! - Minimum rectangle: buffered, rounded-corner envelope of the points
//! - Bounding box: axis-aligned envelope
//! - Nearest-neighbor distances: sampling density of a survey

mod buffer;
mod spatial;

pub use buffer::{minimum_rectangle, BufferParams};
pub use spatial::{nearest_neighbor_distances, spacing_summary, BoundingBox, SpacingSummary};
