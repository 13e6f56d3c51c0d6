//! Data types describing generated tables and decoded geometry values.

/// Information about a feature table as a dialect would create it.
#[derive(Debug, Clone)]
pub struct TableInfo {
    /// Table name
    pub table: String,
    /// Schema the table is qualified with, if any
    pub schema: Option<String>,
    /// Generated primary key column
    pub primary_key: Option<String>,
    /// Columns with their dialect specific types
    pub columns: Vec<ColumnInfo>,
}

/// Information about a column of a generated table.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// SQL type as written in CREATE TABLE
    pub sql_type: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether the column stores geometries
    pub geometry: bool,
    /// Coordinate reference system of a geometry column
    pub srid: Option<i32>,
}

/// Information about a decoded geometry value.
#[derive(Debug, Clone)]
pub struct GeometryInfo {
    /// Geometry kind (e.g., "Polygon")
    pub geometry_type: String,
    /// Well-known text of the value
    pub wkt: String,
    /// Bounding box, `None` for empty geometries
    pub envelope: Option<String>,
}
