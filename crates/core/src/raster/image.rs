//! Georeferenced raster image handed to encoders

use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use ndarray::{Array2, ArrayView2};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A single-grid raster with everything an encoder needs to write it.
///
/// The image is stored row-major with row 0 as the northernmost row, matching
/// the north-up `transform`. Construction validates the invariants an encoder
/// relies on, so a `RasterImage` never has to be probed for missing fields.
///
/// Serializes with the field set `Image`, `nodata`, `band_name`, `GeoT_im`
/// and `ProjR_im`, where `GeoT_im` is the GDAL-ordered 6-tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    image: Array2<f64>,
    nodata: Option<f64>,
    band_names: Vec<String>,
    transform: GeoTransform,
    projection: String,
}

impl RasterImage {
    /// Assemble a raster image.
    ///
    /// Fails when the transform is not north-up with positive pixel width,
    /// when the projection is empty, when the image is empty, or when a
    /// nodata sentinel is given while NaN cells remain (or the sentinel itself
    /// is NaN).
    pub fn new(
        image: Array2<f64>,
        transform: GeoTransform,
        projection: impl Into<String>,
        nodata: Option<f64>,
        band_names: Vec<String>,
    ) -> Result<Self> {
        let projection = projection.into();

        if image.is_empty() {
            return Err(Error::DegenerateInput("raster image has no cells".into()));
        }
        if !(transform.pixel_width > 0.0 && transform.is_north_up()) {
            return Err(Error::invalid_parameter(
                "transform",
                format!("{:?}", transform.to_gdal()),
                "expected north-up transform with positive width and negative height",
            ));
        }
        if projection.trim().is_empty() {
            return Err(Error::DegenerateInput("raster projection is empty".into()));
        }
        if let Some(nd) = nodata {
            if !nd.is_finite() {
                return Err(Error::invalid_parameter("nodata", nd, "sentinel must be finite"));
            }
            if image.iter().any(|v| v.is_nan()) {
                return Err(Error::DegenerateInput(
                    "raster holds NaN cells; replace them with the nodata sentinel".into(),
                ));
            }
        }

        Ok(Self {
            image,
            nodata,
            band_names,
            transform,
            projection,
        })
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.image.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.image.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.image.dim()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.image.get((row, col)).copied()
    }

    /// Get a view of the pixel values
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.image.view()
    }

    /// Get a reference to the underlying array
    pub fn image(&self) -> &Array2<f64> {
        &self.image
    }

    /// Consume the raster and return the underlying array
    pub fn into_image(self) -> Array2<f64> {
        self.image
    }

    // Metadata

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn band_names(&self) -> &[String] {
        &self.band_names
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Projection as well-known text
    pub fn projection(&self) -> &str {
        &self.projection
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Plotting extent `[xmin, xmax, ymin, ymax]`
    pub fn extent(&self) -> [f64; 4] {
        self.transform.extent(self.shape())
    }

    /// Check if a value is the nodata sentinel
    pub fn is_nodata(&self, value: f64) -> bool {
        match self.nodata {
            Some(nd) => value == nd,
            None => value.is_nan(),
        }
    }

    /// Basic statistics over the cells that are not nodata
    pub fn statistics(&self) -> RasterStatistics {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.image.iter() {
            if self.is_nodata(value) {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }

        let (min, max, mean) = if count > 0 {
            (Some(min), Some(max), Some(sum / count as f64))
        } else {
            (None, None, None)
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.image.len() - count,
        }
    }
}

impl Serialize for RasterImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = self.image.rows().into_iter().map(|r| r.to_vec()).collect();

        let mut state = serializer.serialize_struct("RasterImage", 5)?;
        state.serialize_field("Image", &rows)?;
        state.serialize_field("nodata", &self.nodata)?;
        state.serialize_field("band_name", &self.band_names)?;
        state.serialize_field("GeoT_im", &self.transform.to_gdal())?;
        state.serialize_field("ProjR_im", &self.projection)?;
        state.end()
    }
}

/// Basic statistics for a raster image
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn image() -> RasterImage {
        RasterImage::new(
            array![[1.0, -2.0], [3.0, 4.0]],
            GeoTransform::north_up(10.0, 20.0, 2.0),
            "LOCAL_CS[\"test\"]",
            Some(-2.0),
            vec!["lead".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let img = image();
        assert_eq!(img.shape(), (2, 2));
        assert_eq!(img.get(1, 0), Some(3.0));
        assert_eq!(img.get(2, 0), None);
        assert_eq!(img.band_names(), &["lead".to_string()]);
        assert_eq!(img.bounds(), (10.0, 16.0, 14.0, 20.0));
        assert_eq!(img.extent(), [10.0, 14.0, 16.0, 20.0]);
    }

    #[test]
    fn test_statistics_skip_nodata() {
        let stats = image().statistics();
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 1);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.mean, Some(8.0 / 3.0));
    }

    #[test]
    fn test_rejects_nan_with_sentinel() {
        let result = RasterImage::new(
            array![[f64::NAN]],
            GeoTransform::north_up(0.0, 0.0, 1.0),
            "LOCAL_CS[\"test\"]",
            Some(-2.0),
            vec![],
        );
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_rejects_south_up_and_empty_projection() {
        let south_up = RasterImage::new(
            array![[1.0]],
            GeoTransform::new(0.0, 0.0, 1.0, 1.0),
            "LOCAL_CS[\"test\"]",
            None,
            vec![],
        );
        assert!(matches!(south_up, Err(Error::InvalidParameter { .. })));

        let no_proj = RasterImage::new(
            array![[1.0]],
            GeoTransform::north_up(0.0, 0.0, 1.0),
            "",
            None,
            vec![],
        );
        assert!(matches!(no_proj, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(image()).unwrap();
        assert_eq!(json["Image"], serde_json::json!([[1.0, -2.0], [3.0, 4.0]]));
        assert_eq!(json["nodata"], serde_json::json!(-2.0));
        assert_eq!(json["band_name"], serde_json::json!(["lead"]));
        assert_eq!(json["GeoT_im"], serde_json::json!([10.0, 2.0, 0.0, 20.0, 0.0, -2.0]));
        assert_eq!(json["ProjR_im"], serde_json::json!("LOCAL_CS[\"test\"]"));
    }
}
