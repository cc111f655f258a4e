//! Native GeoTIFF writing (without GDAL dependency)
//!
//! Uses the `tiff` crate. The raster is written as a single Float64 band with
//! the GeoTIFF georeferencing tags plus the GDAL private tags for the nodata
//! value and the band description.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::RasterImage;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tiff::encoder::colortype::Gray64Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tracing::debug;

/// GeoAsciiParams, referenced by location from the GeoKeyDirectory
const GEO_ASCII_PARAMS: u16 = 34737;
/// Private GDAL tag holding per-band metadata XML
const GDAL_METADATA: u16 = 42112;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Write the GDAL_NODATA tag when the raster has a sentinel
    pub write_nodata: bool,
    /// Write the first band name as the GDAL band description
    pub write_band_description: bool,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            write_nodata: true,
            write_band_description: true,
        }
    }
}

/// Write a RasterImage to a GeoTIFF file
///
/// Only `.tif` / `.tiff` paths (any case) are accepted.
pub fn write_geotiff<P>(raster: &RasterImage, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let is_tiff = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false);
    if !is_tiff {
        return Err(Error::invalid_parameter(
            "path",
            path.display(),
            "GeoTIFF output needs a .tif or .tiff extension",
        ));
    }

    let file = BufWriter::new(File::create(path)?);
    encode_geotiff(raster, file, &options.unwrap_or_default())?;
    debug!("wrote {}x{} GeoTIFF to {}", raster.cols(), raster.rows(), path.display());
    Ok(())
}

/// Write a RasterImage to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer(raster: &RasterImage, options: Option<GeoTiffOptions>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

/// Internal: encode a RasterImage as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<W>(raster: &RasterImage, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();

    let width = u32::try_from(cols).map_err(|_| Error::invalid_parameter("cols", cols, "too wide for TIFF"))?;
    let height = u32::try_from(rows).map_err(|_| Error::invalid_parameter("rows", rows, "too tall for TIFF"))?;

    // Row-major, row 0 = north, which is TIFF's native order
    let data: Vec<f64> = raster.image().iter().copied().collect();

    let mut image = encoder.new_image::<Gray64Float>(width, height)?;

    let gt = raster.transform();

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;

    let (geokeys, citation) = geokey_directory(raster.projection())?;
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, geokeys.as_slice())?;
    image
        .encoder()
        .write_tag(Tag::GeoAsciiParamsTag, citation.as_str())?;

    if options.write_nodata {
        if let Some(nodata) = raster.nodata() {
            let text = nodata.to_string();
            image
                .encoder()
                .write_tag(Tag::GdalNodata, text.as_str())?;
        }
    }

    if options.write_band_description {
        if let Some(name) = raster.band_names().first() {
            let xml = format!(
                "<GDALMetadata><Item name=\"DESCRIPTION\" sample=\"0\" role=\"description\">{}</Item></GDALMetadata>",
                escape_xml(name)
            );
            image
                .encoder()
                .write_tag(Tag::Unknown(GDAL_METADATA), xml.as_str())?;
        }
    }

    image.write_data(&data)?;

    Ok(())
}

/// Build the GeoKeyDirectory entries and the GeoAsciiParams text for a WKT.
///
/// Declares the model type (geographic or projected), PixelIsArea and a
/// citation. A WKT whose outermost object carries an EPSG code gets that code
/// as a GeoKey and its name as citation. Any other WKT is stored whole as an
/// `ESRI PE String` citation, which GDAL reads back as the projection.
fn geokey_directory(wkt: &str) -> Result<(Vec<u16>, String)> {
    let geographic = CRS::from_wkt(wkt).is_geographic();
    let epsg = wkt_epsg(wkt);
    let citation = match epsg {
        Some(_) => format!("{}|", wkt_name(wkt).unwrap_or("unnamed")),
        None => format!("ESRI PE String = {}|", wkt.trim()),
    };
    let citation_len = u16::try_from(citation.len())
        .map_err(|_| Error::Encode(format!("WKT of {} bytes does not fit a GeoTIFF citation", wkt.len())))?;

    let mut keys: Vec<u16> = vec![
        1024, 0, 1, if geographic { 2 } else { 1 }, // GTModelTypeGeoKey
        1025, 0, 1, 1,                               // GTRasterTypeGeoKey = PixelIsArea
        1026, GEO_ASCII_PARAMS, citation_len, 0,     // GTCitationGeoKey
    ];
    if let Some(code) = epsg {
        // GeographicTypeGeoKey or ProjectedCSTypeGeoKey
        keys.extend_from_slice(&[if geographic { 2048 } else { 3072 }, 0, 1, code]);
    }

    let count = (keys.len() / 4) as u16;
    let mut directory = vec![1, 1, 0, count];
    directory.extend(keys);
    Ok((directory, citation))
}

/// Name of the outermost WKT object, e.g. `WGS 84 / UTM zone 33N`
fn wkt_name(wkt: &str) -> Option<&str> {
    let start = wkt.find('"')? + 1;
    let len = wkt[start..].find('"')?;
    Some(&wkt[start..start + len])
}

/// EPSG code of the outermost WKT object.
///
/// Only a WKT1 `AUTHORITY` or WKT2 `ID` that is a direct child of the
/// outermost object counts; authorities of nested objects (UNIT, DATUM,
/// GEOGCS inside a PROJCS) are skipped.
fn wkt_epsg(wkt: &str) -> Option<u16> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut token_start = 0;
    let mut authority_start = None;
    let mut code = None;

    for (i, b) in wkt.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            b'[' | b'(' => {
                depth += 1;
                if depth == 2 {
                    let keyword = wkt[token_start..i].trim();
                    if keyword == "AUTHORITY" || keyword == "ID" {
                        authority_start = Some(i + 1);
                    }
                }
                token_start = i + 1;
            }
            b']' | b')' => {
                if depth == 2 {
                    if let Some(start) = authority_start.take() {
                        code = epsg_authority(&wkt[start..i]).or(code);
                    }
                }
                depth = depth.saturating_sub(1);
                token_start = i + 1;
            }
            b',' => token_start = i + 1,
            _ => {}
        }
    }
    code
}

/// Code of an `"EPSG","4326"` / `"EPSG",4326` authority body
fn epsg_authority(body: &str) -> Option<u16> {
    let mut parts = body.split(',').map(|p| p.trim().trim_matches('"'));
    if !parts.next()?.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    parts.next()?.parse().ok()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
