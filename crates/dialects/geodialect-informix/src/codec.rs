//! Geometry codec for the Informix spatial DataBlade.
//!
//! Geometries are read as well-known binary, which the `SELECT` list requests
//! through `ST_AsBinary`. They are written either as a named `*FromText`
//! constructor over well-known text, for inline literals, or as a named
//! `*FromWKB` constructor over a bound parameter.
//!
//! # Example
//!
//! ```
//! use geo_types::{Geometry, Point};
//! use geodialect_informix::codec;
//!
//! let point = Geometry::Point(Point::new(10.0, 20.0));
//! assert_eq!(
//!     codec::encode(Some(&point), Some(4326)),
//!     "ST_PointFromText('POINT (10 20)', 4326)"
//! );
//! assert_eq!(codec::encode(None, Some(4326)), "NULL");
//! ```

use geo::{BoundingRect, CoordsIter};
use geo_types::Geometry;
use geodialect_core_common::{DialectError, DialectResult, Envelope, GeometryType};
use geozero::wkb::Wkb;
use geozero::wkt::Wkt;
use geozero::{CoordDimensions, ToGeo, ToWkb};

use crate::wkt::to_wkt;

/// SQL null literal.
pub const NULL_LITERAL: &str = "NULL";

/// SRID written when the column's reference system is unknown.
pub const DEFAULT_SRID: i32 = 0;

/// Decodes well-known binary. `None` (SQL NULL) decodes to `None`.
///
/// An empty point (both ordinates NaN) has no `geo-types` representation and
/// is reported as a decode error.
///
/// # Errors
///
/// Returns [`DialectError::Decode`] if the bytes are not valid WKB.
pub fn decode(bytes: Option<&[u8]>) -> DialectResult<Option<Geometry<f64>>> {
    let Some(bytes) = bytes else {
        return Ok(None);
    };
    Wkb(bytes.to_vec())
        .to_geo()
        .map(Some)
        .map_err(|err| DialectError::decode("error decoding wkb", err))
}

/// Decodes well-known binary and returns the geometry's bounding rectangle.
///
/// `ST_Envelope` returns a point or a line for degenerate inputs, so any kind
/// of geometry is accepted. Empty geometries yield a null envelope.
///
/// # Errors
///
/// Returns [`DialectError::Decode`] if the bytes are not valid WKB.
pub fn decode_envelope(bytes: &[u8]) -> DialectResult<Envelope> {
    if is_empty_point(bytes) {
        return Ok(Envelope::null());
    }
    let geometry = Wkb(bytes.to_vec())
        .to_geo()
        .map_err(|err| DialectError::decode("error decoding wkb for envelope", err))?;
    Ok(geometry
        .bounding_rect()
        .map_or_else(Envelope::null, Envelope::from))
}

/// WKB point whose ordinates are both NaN, the encoding of `POINT EMPTY`.
fn is_empty_point(bytes: &[u8]) -> bool {
    let [order, rest @ ..] = bytes else {
        return false;
    };
    let Ok(rest) = <&[u8; 20]>::try_from(rest) else {
        return false;
    };
    let little = match order {
        0 => false,
        1 => true,
        _ => return false,
    };
    let word = |i: usize| {
        let mut b = [0u8; 8];
        b.copy_from_slice(&rest[i..i + 8]);
        if little { f64::from_le_bytes(b) } else { f64::from_be_bytes(b) }
    };
    let kind = [rest[0], rest[1], rest[2], rest[3]];
    let kind = if little { u32::from_le_bytes(kind) } else { u32::from_be_bytes(kind) };
    kind == 1 && word(4).is_nan() && word(12).is_nan()
}

/// Fails if any coordinate is NaN or infinite, since SQL text has no literal
/// for such values.
///
/// # Errors
///
/// Returns [`DialectError::UnsupportedValue`] naming the first offending
/// coordinate.
pub fn ensure_finite(geometry: &Geometry<f64>) -> DialectResult<()> {
    match geometry
        .coords_iter()
        .find(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        Some(c) => Err(DialectError::UnsupportedValue {
            value: format!("coordinate ({} {})", c.x, c.y),
        }),
        None => Ok(()),
    }
}

/// Renders a geometry as an inline SQL constructor call, or `NULL`.
///
/// Coordinates are written as-is; check them with [`ensure_finite`] first
/// when they may be NaN or infinite.
#[must_use]
pub fn encode(geometry: Option<&Geometry<f64>>, srid: Option<i32>) -> String {
    match geometry {
        Some(geometry) => format!(
            "{}('{}', {})",
            text_constructor(GeometryType::of(geometry)),
            to_wkt(geometry),
            srid.unwrap_or(DEFAULT_SRID)
        ),
        None => NULL_LITERAL.to_string(),
    }
}

/// Serializes a geometry as two dimensional well-known binary.
///
/// # Errors
///
/// Returns [`DialectError::Encode`] if the geometry cannot be written.
pub fn encode_wkb(geometry: &Geometry<f64>) -> DialectResult<Vec<u8>> {
    geometry
        .to_wkb(CoordDimensions::xy())
        .map_err(|err| DialectError::encode("error encoding wkb", err))
}

/// Wraps a column reference so the engine returns it as WKB.
#[must_use]
pub fn encode_as_binary_expression(column_ref: &str) -> String {
    format!("ST_AsBinary({column_ref})")
}

/// Wraps a column reference so the engine returns its envelope as WKB.
#[must_use]
pub fn encode_envelope_expression(column_ref: &str) -> String {
    encode_as_binary_expression(&format!("ST_Envelope({column_ref})"))
}

/// Parses well-known text.
///
/// # Errors
///
/// Returns [`DialectError::Decode`] if the text is not valid WKT.
pub fn parse_wkt(text: &str) -> DialectResult<Geometry<f64>> {
    Wkt(text.to_string())
        .to_geo()
        .map_err(|err| DialectError::decode("error decoding wkt", err))
}

/// Well-known text serialization used inside `*FromText` literals.
#[must_use]
pub fn wkt(geometry: &Geometry<f64>) -> String {
    to_wkt(geometry)
}

/// Constructor taking well-known text for a geometry kind.
#[must_use]
pub fn text_constructor(kind: GeometryType) -> &'static str {
    match kind {
        GeometryType::Point => "ST_PointFromText",
        GeometryType::LineString => "ST_LineFromText",
        GeometryType::Polygon => "ST_PolyFromText",
        GeometryType::MultiPoint => "ST_MPointFromText",
        GeometryType::MultiLineString => "ST_MLineFromText",
        GeometryType::MultiPolygon => "ST_MPolyFromText",
        GeometryType::GenericGeometry | GeometryType::GeometryCollection => "ST_GeomFromText",
    }
}

/// Constructor taking well-known binary for a geometry kind.
///
/// `None` (an unknown or NULL value) maps to the generic constructor.
#[must_use]
pub fn wkb_constructor(kind: Option<GeometryType>) -> &'static str {
    match kind {
        Some(GeometryType::Point) => "ST_PointFromWKB",
        Some(GeometryType::LineString) => "ST_LineFromWKB",
        Some(GeometryType::Polygon) => "ST_PolyFromWKB",
        Some(GeometryType::MultiPoint) => "ST_MPointFromWKB",
        Some(GeometryType::MultiLineString) => "ST_MLineFromWKB",
        Some(GeometryType::MultiPolygon) => "ST_MPolyFromWKB",
        Some(GeometryType::GenericGeometry | GeometryType::GeometryCollection) | None => {
            "ST_GeomFromWKB"
        },
    }
}

/// Constructor call over a single bound WKB parameter, e.g.
/// `ST_PointFromWKB(?, 4326)`.
#[must_use]
pub fn encode_wkb_placeholder(kind: Option<GeometryType>, srid: Option<i32>) -> String {
    format!(
        "{}(?, {})",
        wkb_constructor(kind),
        srid.unwrap_or(DEFAULT_SRID)
    )
}
