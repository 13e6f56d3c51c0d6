//! Geometry classification and bounding boxes.
//!
//! Geometries themselves are [`geo_types::Geometry`] values. This module adds the
//! small amount of vocabulary dialects need on top of them: a closed set of
//! geometry kinds with stable SQL type codes, and an envelope type that can
//! represent the bounds of an empty geometry.

use std::fmt;

use geo_types::{Geometry, Polygon, Rect, coord};

/// Kind of geometry stored in a spatial column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryType {
    /// A single position
    Point,
    /// A connected sequence of positions
    LineString,
    /// An area bounded by an exterior ring, optionally with holes
    Polygon,
    /// A set of points
    MultiPoint,
    /// A set of line strings
    MultiLineString,
    /// A set of polygons
    MultiPolygon,
    /// Any geometry; used for columns that accept mixed kinds
    GenericGeometry,
    /// A heterogeneous collection of geometries
    GeometryCollection,
}

impl GeometryType {
    /// Every geometry kind, in SQL type code order.
    pub const ALL: [GeometryType; 8] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GenericGeometry,
        GeometryType::GeometryCollection,
    ];

    /// Stable integer code used by class to SQL type registries.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            GeometryType::Point => 2001,
            GeometryType::LineString => 2002,
            GeometryType::Polygon => 2003,
            GeometryType::MultiPoint => 2004,
            GeometryType::MultiLineString => 2005,
            GeometryType::MultiPolygon => 2006,
            GeometryType::GenericGeometry => 2007,
            GeometryType::GeometryCollection => 2008,
        }
    }

    /// Inverse of [`GeometryType::code`].
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Classifies a geometry value by its runtime variant.
    ///
    /// `Line`, `Rect` and `Triangle` have no SQL counterpart of their own and are
    /// classified as the simple feature they serialize to.
    #[must_use]
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::Line(_) | Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                GeometryType::Polygon
            },
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Human readable name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GenericGeometry => "Geometry",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis aligned bounding rectangle.
///
/// An envelope may be *null*, which is the bounds of an empty geometry. A null
/// envelope has `min > max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Minimum x
    pub min_x: f64,
    /// Minimum y
    pub min_y: f64,
    /// Maximum x
    pub max_x: f64,
    /// Maximum y
    pub max_y: f64,
}

impl Envelope {
    /// Creates an envelope from two corners, normalising their order.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// The envelope of an empty geometry.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: -1.0,
            max_y: -1.0,
        }
    }

    /// Returns `true` for the envelope of an empty geometry.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    /// Width of the envelope, zero when null.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Height of the envelope, zero when null.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Smallest envelope covering both `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: &Envelope) -> Envelope {
        if self.is_null() {
            return *other;
        }
        if other.is_null() {
            return *self;
        }
        Envelope {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Converts the envelope into a closed rectangular polygon.
    ///
    /// Returns `None` for a null envelope.
    #[must_use]
    pub fn to_polygon(&self) -> Option<Polygon<f64>> {
        if self.is_null() {
            return None;
        }
        let rect = Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        );
        Some(rect.to_polygon())
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(rect: Rect<f64>) -> Self {
        let min = rect.min();
        let max = rect.max();
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Env[null]")
        } else {
            write!(
                f,
                "Env[{} : {}, {} : {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )
        }
    }
}
