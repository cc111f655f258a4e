//! GeoJSON point input

use anyhow::{bail, Context, Result};
use geojson::GeoJson;
use pointgrid_core::vector::{AttributeValue, Feature, FeatureCollection};
use pointgrid_core::SamplePoint;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Read a GeoJSON file into a feature collection.
///
/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
pub fn read_features(path: &Path) -> Result<FeatureCollection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let geojson: GeoJson = text
        .parse()
        .with_context(|| format!("{} is not valid GeoJSON", path.display()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![geojson::Feature {
            geometry: Some(g),
            ..Default::default()
        }],
    };

    let mut collection = FeatureCollection::new();
    for (i, f) in features.into_iter().enumerate() {
        let geometry = match f.geometry {
            Some(g) => geo_types::Geometry::<f64>::try_from(g.value)
                .with_context(|| format!("feature {} has an unsupported geometry", i))?,
            None => bail!("feature {} has no geometry", i),
        };

        let mut feature = Feature::new(geometry);
        for (key, value) in f.properties.unwrap_or_default() {
            feature.set_property(key, attribute(value));
        }
        collection.push(feature);
    }
    Ok(collection)
}

/// Point locations only, for commands that ignore attribute values
pub fn read_locations(path: &Path) -> Result<Vec<SamplePoint>> {
    let features = read_features(path)?;
    features
        .iter()
        .enumerate()
        .map(|(i, f)| match &f.geometry {
            Some(geo_types::Geometry::Point(p)) => Ok(SamplePoint::new(p.x(), p.y(), 0.0)),
            _ => bail!("feature {} is not a point", i),
        })
        .collect()
}

fn attribute(value: JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(b) => AttributeValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => n.as_f64().map_or(AttributeValue::Null, AttributeValue::Float),
        },
        JsonValue::String(s) => AttributeValue::String(s),
        other => AttributeValue::String(other.to_string()),
    }
}
