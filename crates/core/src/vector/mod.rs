//! Point sets and the feature model they are loaded from

use crate::crs::CRS;
use crate::error::{Error, Result};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sample point with x, y coordinates and a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to another point
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn dist(&self, other_x: f64, other_y: f64) -> f64 {
        self.dist_sq(other_x, other_y).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.value.is_finite()
    }
}

/// Measurements of one named attribute at scattered locations, sharing a CRS.
///
/// A `PointSet` is never empty and holds only finite coordinates and values.
/// Point order is preserved; interpolators that break ties do so in favour of
/// the earlier point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<SamplePoint>,
    field: String,
    crs: Option<CRS>,
}

impl PointSet {
    /// Create a point set, validating that it is non-empty and finite.
    pub fn new(points: Vec<SamplePoint>, field: impl Into<String>, crs: Option<CRS>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::DegenerateInput("point set is empty".into()));
        }
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(Error::DegenerateInput(format!(
                "point {} has a non-finite coordinate or value: ({}, {}) -> {}",
                i, p.x, p.y, p.value
            )));
        }

        Ok(Self {
            points,
            field: field.into(),
            crs,
        })
    }

    /// Build a point set from point features, reading `field` as the value.
    ///
    /// Every feature must carry a point geometry and a numeric `field`
    /// attribute. A field missing from all features is reported as
    /// [`Error::UnknownField`].
    pub fn from_features(
        features: &FeatureCollection,
        field: &str,
        crs: Option<CRS>,
    ) -> Result<Self> {
        if !features.is_empty() && features.iter().all(|f| f.get_property(field).is_none()) {
            return Err(Error::UnknownField(field.to_string()));
        }

        let mut points = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let point = match &feature.geometry {
                Some(Geometry::Point(p)) => *p,
                Some(_) => {
                    return Err(Error::DegenerateInput(format!(
                        "feature {} is not a point geometry",
                        i
                    )))
                }
                None => {
                    return Err(Error::DegenerateInput(format!("feature {} has no geometry", i)))
                }
            };

            let value = feature
                .get_property(field)
                .and_then(AttributeValue::as_f64)
                .ok_or_else(|| {
                    Error::DegenerateInput(format!(
                        "feature {} has no numeric value for '{}'",
                        i, field
                    ))
                })?;

            points.push(SamplePoint::new(point.x(), point.y(), value));
        }

        Self::new(points, field, crs)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed point set
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter()
    }

    /// Name of the attribute carried as `value`
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    /// Bounding box of all coordinates `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    }
}

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value; strings are parsed, booleans and nulls are not numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::String(s) => s.trim().parse().ok(),
            AttributeValue::Null | AttributeValue::Bool(_) => None,
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// Collection of features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}
