//! Informix spatial type names and the lookup tables built from them.
//!
//! The tables are built once on first use and never change afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use geodialect_core_common::GeometryType;

/// Type used for SQL type codes that have no spatial type name.
pub const GENERIC_SQL_TYPE: &str = "LVARCHAR";

/// Informix DataBlade type name for a geometry kind.
#[must_use]
pub const fn type_name(kind: GeometryType) -> &'static str {
    match kind {
        GeometryType::Point => "ST_POINT",
        GeometryType::LineString => "ST_LINESTRING",
        GeometryType::Polygon => "ST_POLYGON",
        GeometryType::MultiPoint => "ST_MULTIPOINT",
        GeometryType::MultiLineString => "ST_MULTILINESTRING",
        GeometryType::MultiPolygon => "ST_MULTIPOLYGON",
        GeometryType::GenericGeometry => "ST_GEOMETRY",
        GeometryType::GeometryCollection => "ST_GEOMETRYCOLLECTION",
    }
}

/// Type name for a SQL type code, falling back to [`GENERIC_SQL_TYPE`].
#[must_use]
pub fn type_name_for_code(code: i32) -> &'static str {
    GeometryType::from_code(code).map_or(GENERIC_SQL_TYPE, type_name)
}

/// Geometry kind for an Informix type name, ignoring case.
#[must_use]
pub fn from_type_name(name: &str) -> Option<GeometryType> {
    TYPE_NAME_TO_CLASS.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Lower-case type name to geometry kind.
pub static TYPE_NAME_TO_CLASS: LazyLock<HashMap<&'static str, GeometryType>> =
    LazyLock::new(|| {
        HashMap::from([
            ("st_point", GeometryType::Point),
            ("st_linestring", GeometryType::LineString),
            ("st_polygon", GeometryType::Polygon),
            ("st_multipoint", GeometryType::MultiPoint),
            ("st_multilinestring", GeometryType::MultiLineString),
            ("st_multipolygon", GeometryType::MultiPolygon),
            ("st_geometry", GeometryType::GenericGeometry),
            ("st_geometrycollection", GeometryType::GeometryCollection),
        ])
    });

/// Geometry kind to SQL type code.
pub static CLASS_TO_SQL_TYPE: LazyLock<HashMap<GeometryType, i32>> =
    LazyLock::new(|| GeometryType::ALL.into_iter().map(|t| (t, t.code())).collect());

/// SQL type code to geometry kind.
pub static SQL_TYPE_TO_CLASS: LazyLock<HashMap<i32, GeometryType>> =
    LazyLock::new(|| GeometryType::ALL.into_iter().map(|t| (t.code(), t)).collect());
