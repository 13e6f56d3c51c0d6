//! Well-known text in the layout the Informix `*FromText` constructors expect.
//!
//! Tags are separated from their coordinate lists by a space
//! (`POINT (10 20)`), coordinates within a list by `", "`, and multipoints are
//! written as a flat coordinate list (`MULTIPOINT (1 2, 3 4)`). Empty
//! geometries are written as `<TAG> EMPTY`.

use geo_types::{Coord, Geometry, LineString, Polygon};

/// Serializes a geometry as well-known text.
pub(crate) fn to_wkt(geometry: &Geometry<f64>) -> String {
    let mut out = String::new();
    write_geometry(geometry, &mut out);
    out
}

fn write_geometry(geometry: &Geometry<f64>, out: &mut String) {
    match geometry {
        Geometry::Point(p) => {
            out.push_str("POINT (");
            write_coord(p.0, out);
            out.push(')');
        },
        Geometry::Line(line) => {
            out.push_str("LINESTRING (");
            write_coord(line.start, out);
            out.push_str(", ");
            write_coord(line.end, out);
            out.push(')');
        },
        Geometry::LineString(ls) => {
            out.push_str("LINESTRING ");
            write_coords(&ls.0, out);
        },
        Geometry::Polygon(polygon) => {
            out.push_str("POLYGON ");
            write_polygon(polygon, out);
        },
        Geometry::Rect(rect) => {
            out.push_str("POLYGON ");
            write_polygon(&rect.to_polygon(), out);
        },
        Geometry::Triangle(triangle) => {
            out.push_str("POLYGON ");
            write_polygon(&triangle.to_polygon(), out);
        },
        Geometry::MultiPoint(mp) => {
            out.push_str("MULTIPOINT ");
            let coords: Vec<Coord<f64>> = mp.0.iter().map(|p| p.0).collect();
            write_coords(&coords, out);
        },
        Geometry::MultiLineString(mls) => {
            out.push_str("MULTILINESTRING ");
            write_list(&mls.0, out, write_line_string);
        },
        Geometry::MultiPolygon(mp) => {
            out.push_str("MULTIPOLYGON ");
            write_list(&mp.0, out, write_polygon);
        },
        Geometry::GeometryCollection(gc) => {
            out.push_str("GEOMETRYCOLLECTION ");
            write_list(&gc.0, out, write_geometry);
        },
    }
}

/// Writes `(a, b, ...)` with each item rendered by `write_item`, or `EMPTY`.
fn write_list<T>(items: &[T], out: &mut String, write_item: fn(&T, &mut String)) {
    if items.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_item(item, out);
    }
    out.push(')');
}

fn write_line_string(ls: &LineString<f64>, out: &mut String) {
    write_coords(&ls.0, out);
}

fn write_polygon(polygon: &Polygon<f64>, out: &mut String) {
    if polygon.exterior().0.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    write_coords(&polygon.exterior().0, out);
    for interior in polygon.interiors() {
        out.push_str(", ");
        write_coords(&interior.0, out);
    }
    out.push(')');
}

/// Writes `(x y, x y, ...)`, or `EMPTY`.
fn write_coords(coords: &[Coord<f64>], out: &mut String) {
    if coords.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coord(*c, out);
    }
    out.push(')');
}

fn write_coord(c: Coord<f64>, out: &mut String) {
    out.push_str(&c.x.to_string());
    out.push(' ');
    out.push_str(&c.y.to_string());
}
