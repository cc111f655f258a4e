//! Coordinate Reference System handling
//!
//! pointgrid never reprojects; a CRS only has to be carried through to the
//! output raster as well-known text.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const WGS84_GEOGCS: &str = concat!(
    "GEOGCS[\"WGS 84\",",
    "DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],",
    "AUTHORITY[\"EPSG\",\"6326\"]],",
    "PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],",
    "UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]]",
);

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// WKT representation (primary)
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// WGS84 / UTM zone (EPSG:326xx north, 327xx south)
    pub fn utm(zone: u8, north: bool) -> Self {
        let base = if north { 32600 } else { 32700 };
        Self::from_epsg(base + zone as u32)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get the WKT this CRS was created from, if any
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Whether coordinates are angular (lon/lat) rather than projected
    pub fn is_geographic(&self) -> bool {
        match (self.epsg, &self.wkt) {
            (Some(4326), _) => true,
            (Some(_), _) => false,
            (None, Some(wkt)) => {
                let head = wkt.trim_start();
                head.starts_with("GEOGCS") || head.starts_with("GEOGCRS")
            }
            (None, None) => false,
        }
    }

    /// Express this CRS as well-known text.
    ///
    /// A stored WKT string is returned as is. EPSG-only definitions are
    /// rendered for the codes pointgrid knows about: 4326, 3857 and the
    /// WGS84 UTM zones. Anything else fails with [`Error::DegenerateInput`].
    pub fn to_wkt(&self) -> Result<String> {
        if let Some(wkt) = &self.wkt {
            if wkt.trim().is_empty() {
                return Err(Error::DegenerateInput("CRS has an empty WKT definition".into()));
            }
            return Ok(wkt.clone());
        }

        match self.epsg {
            Some(4326) => Ok(format!(
                "{},AXIS[\"Latitude\",NORTH],AXIS[\"Longitude\",EAST],AUTHORITY[\"EPSG\",\"4326\"]]",
                WGS84_GEOGCS
            )),
            Some(3857) => Ok(format!(
                concat!(
                    "PROJCS[\"WGS 84 / Pseudo-Mercator\",{}],",
                    "PROJECTION[\"Mercator_1SP\"],",
                    "PARAMETER[\"central_meridian\",0],PARAMETER[\"scale_factor\",1],",
                    "PARAMETER[\"false_easting\",0],PARAMETER[\"false_northing\",0],",
                    "UNIT[\"metre\",1,AUTHORITY[\"EPSG\",\"9001\"]],",
                    "AXIS[\"Easting\",EAST],AXIS[\"Northing\",NORTH],",
                    "AUTHORITY[\"EPSG\",\"3857\"]]"
                ),
                WGS84_GEOGCS
            )),
            Some(code @ 32601..=32660) => Ok(utm_wkt(code, (code - 32600) as u8, true)),
            Some(code @ 32701..=32760) => Ok(utm_wkt(code, (code - 32700) as u8, false)),
            Some(code) => Err(Error::DegenerateInput(format!(
                "no built-in WKT for EPSG:{}; only 4326, 3857 and WGS84 UTM zones are known, \
                 other systems must be given as WKT",
                code
            ))),
            None => Err(Error::DegenerateInput("CRS has neither WKT nor EPSG code".into())),
        }
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            // First 50 chars of WKT
            let head: String = wkt.chars().take(50).collect();
            return format!("WKT:{}", head);
        }
        "Unknown".to_string()
    }
}

fn utm_wkt(code: u32, zone: u8, north: bool) -> String {
    let central_meridian = zone as i32 * 6 - 183;
    let false_northing = if north { 0 } else { 10_000_000 };
    let hemisphere = if north { 'N' } else { 'S' };
    format!(
        concat!(
            "PROJCS[\"WGS 84 / UTM zone {zone}{hemi}\",{geog}],",
            "PROJECTION[\"Transverse_Mercator\"],",
            "PARAMETER[\"latitude_of_origin\",0],PARAMETER[\"central_meridian\",{cm}],",
            "PARAMETER[\"scale_factor\",0.9996],PARAMETER[\"false_easting\",500000],",
            "PARAMETER[\"false_northing\",{fnorth}],",
            "UNIT[\"metre\",1,AUTHORITY[\"EPSG\",\"9001\"]],",
            "AXIS[\"Easting\",EAST],AXIS[\"Northing\",NORTH],",
            "AUTHORITY[\"EPSG\",\"{code}\"]]"
        ),
        zone = zone,
        hemi = hemisphere,
        geog = WGS84_GEOGCS,
        cm = central_meridian,
        fnorth = false_northing,
        code = code,
    )
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
