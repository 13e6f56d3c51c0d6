//! Statement assembly on top of the dialect hooks.
//!
//! A dialect only knows how to write fragments: a primary key declaration, a
//! column constraint, a geometry read expression. The functions here stitch
//! those fragments into complete statements the way a feature store engine
//! does, and run them against a borrowed [`Connection`].

use geodialect_core_common::{
    ColumnDescriptor, ColumnKind, Connection, Envelope, FeatureType, MetadataProvider, SqlDialect,
};
use log::{debug, info};

use crate::error::Result;
use crate::types::{ColumnInfo, TableInfo};

const NOT_NULL: &str = " NOT NULL";

fn encode_qualified_table<D: SqlDialect + ?Sized>(
    dialect: &D,
    schema: Option<&str>,
    table: &str,
    sql: &mut String,
) {
    if let Some(schema) = schema {
        dialect.encode_schema_name(schema, sql);
        sql.push('.');
    }
    dialect.encode_table_name(table, sql);
}

/// SQL type name the dialect uses for a column.
///
/// Geometry columns go through the dialect's type code tables; columns the
/// dialect has no name for fall back to the geometry kind itself.
#[must_use]
pub fn column_type_name<D: SqlDialect + ?Sized>(
    dialect: &D,
    column: &ColumnDescriptor,
) -> String {
    match &column.kind {
        ColumnKind::Geometry { geometry_type, .. } => dialect
            .class_to_sql_type(*geometry_type)
            .and_then(|code| {
                dialect
                    .sql_type_name_override(code)
                    .or_else(|| dialect.geometry_type_name(code))
            })
            .map_or_else(|| geometry_type.as_str().to_uppercase(), str::to_string),
        ColumnKind::Attribute { sql_type, length } => match length {
            Some(length) => format!("{sql_type}({length})"),
            None => sql_type.clone(),
        },
    }
}

/// Describes the table a dialect would create for a feature type.
#[must_use]
pub fn describe_table<D: SqlDialect + ?Sized>(
    dialect: &D,
    schema: Option<&str>,
    feature_type: &FeatureType,
) -> TableInfo {
    let columns = feature_type
        .columns
        .iter()
        .map(|column| ColumnInfo {
            name: column.name.clone(),
            sql_type: column_type_name(dialect, column),
            nullable: column.nullable,
            geometry: column.is_geometry(),
            srid: match column.kind {
                ColumnKind::Geometry { srid, .. } => srid,
                ColumnKind::Attribute { .. } => None,
            },
        })
        .collect();
    TableInfo {
        table: feature_type.name.clone(),
        schema: schema.map(str::to_string),
        primary_key: feature_type.primary_key.clone(),
        columns,
    }
}

/// Builds the CREATE TABLE statement for a feature type.
///
/// Non-nullable columns get `NOT NULL` before the dialect's post-column hook
/// runs, so hooks that also enforce it must not repeat the constraint.
#[must_use]
pub fn create_table_statement<D: SqlDialect + ?Sized>(
    dialect: &D,
    schema: Option<&str>,
    feature_type: &FeatureType,
) -> String {
    let mut sql = String::from("CREATE TABLE ");
    encode_qualified_table(dialect, schema, &feature_type.name, &mut sql);
    sql.push_str(" (");

    let mut first = true;
    if let Some(pk) = &feature_type.primary_key {
        dialect.encode_primary_key(pk, &mut sql);
        first = false;
    }
    for column in &feature_type.columns {
        if !first {
            sql.push_str(", ");
        }
        first = false;

        dialect.encode_column_name(None, &column.name, &mut sql);
        sql.push(' ');
        dialect.encode_column_type(&column_type_name(dialect, column), &mut sql);
        if !column.nullable {
            sql.push_str(NOT_NULL);
        }
        dialect.encode_post_column_create_table(column, &mut sql);
    }
    sql.push(')');
    dialect.encode_post_create_table(&feature_type.name, &mut sql);
    sql
}

/// Creates the table of a feature type, then runs the dialect's follow-up
/// statements (spatial indexes and the like).
///
/// # Errors
///
/// Propagates SQL errors from the connection.
pub fn create_schema<D: SqlDialect + ?Sized>(
    dialect: &D,
    schema: Option<&str>,
    feature_type: &FeatureType,
    cx: &dyn Connection,
) -> Result<()> {
    info!("Creating table '{}'", feature_type.name);
    let sql = create_table_statement(dialect, schema, feature_type);
    debug!("{sql}");
    {
        let mut st = cx.create_statement()?;
        st.execute(&sql)?;
    }
    dialect.post_create_table(schema, feature_type, cx)?;
    info!(
        "Created table '{}' with {} geometry column(s)",
        feature_type.name,
        feature_type.geometry_columns().count()
    );
    Ok(())
}

/// Builds a SELECT over every column of a feature type.
///
/// Geometry columns are wrapped by the dialect's read expression. Paging is
/// applied only when requested and natively supported; otherwise the caller
/// is expected to page on the client.
///
/// # Errors
///
/// Returns the dialect's error if the paging rewrite is refused.
pub fn select_statement<D: SqlDialect + ?Sized>(
    dialect: &D,
    feature_type: &FeatureType,
    limit: Option<u64>,
    offset: u64,
) -> Result<String> {
    let mut sql = String::from("SELECT ");
    let mut first = true;
    if let Some(pk) = &feature_type.primary_key {
        dialect.encode_column_name(None, pk, &mut sql);
        first = false;
    }
    for column in &feature_type.columns {
        if !first {
            sql.push_str(", ");
        }
        first = false;
        match &column.kind {
            ColumnKind::Geometry { srid, .. } => {
                dialect.encode_geometry_column(column, None, *srid, &mut sql);
            },
            ColumnKind::Attribute { .. } => dialect.encode_column_name(None, &column.name, &mut sql),
        }
    }
    if first {
        sql.push('*');
    }
    sql.push_str(" FROM ");
    dialect.encode_table_name(&feature_type.name, &mut sql);

    let paged = limit.is_some() || offset > 0;
    if paged && dialect.is_limit_offset_supported() {
        dialect.apply_limit_offset(&mut sql, limit, offset)?;
    } else if paged {
        debug!("Dialect cannot page natively, returning unpaged SELECT");
    }
    Ok(sql)
}

/// Builds the query reading the envelope of every value of a geometry column.
#[must_use]
pub fn bounds_statement<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &str,
    column: &str,
) -> String {
    let mut sql = String::from("SELECT ");
    dialect.encode_geometry_envelope(table, column, &mut sql);
    sql.push_str(" FROM ");
    dialect.encode_table_name(table, &mut sql);
    sql
}

/// Computes the bounds of a geometry column by merging the envelope of each
/// row. Returns `None` when the table is empty or every value is NULL.
///
/// # Errors
///
/// Propagates SQL errors and envelope decoding failures.
pub fn query_bounds<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &str,
    column: &str,
    cx: &dyn Connection,
) -> Result<Option<Envelope>> {
    let sql = bounds_statement(dialect, table, column);
    debug!("{sql}");
    let mut st = cx.create_statement()?;
    let mut rs = st.execute_query(&sql)?;

    let mut bounds: Option<Envelope> = None;
    while rs.next()? {
        let Some(envelope) = dialect.decode_geometry_envelope(&*rs, 1)? else {
            continue;
        };
        bounds = Some(match bounds {
            Some(current) => current.merge(&envelope),
            None => envelope,
        });
    }
    Ok(bounds)
}

/// Lists the tables of a schema that the dialect treats as feature tables.
///
/// # Errors
///
/// Propagates SQL errors from the catalog or the dialect's table check.
pub fn list_feature_tables<D: SqlDialect + ?Sized>(
    dialect: &D,
    metadata: &dyn MetadataProvider,
    schema: Option<&str>,
    cx: &dyn Connection,
) -> Result<Vec<String>> {
    let mut tables = Vec::new();
    for table in metadata.table_names(schema)? {
        if dialect.include_table(schema, &table, cx)? {
            tables.push(table);
        } else {
            debug!("Skipping table '{table}'");
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Geometry, Point, Rect, coord};
    use geodialect_core_common::test_support::{MockConnection, MockMetadata, MockResponse};
    use geodialect_core_common::{BindValue, GeometryType};
    use geodialect_informix::codec;
    use geodialect_informix::{InformixDialectBasic, InformixDialectPrepared};

    fn parcels() -> FeatureType {
        FeatureType::new("parcels")
            .with_primary_key("fid")
            .with_column(ColumnDescriptor::attribute("owner", "VARCHAR", true).with_length(64))
            .with_column(ColumnDescriptor::attribute("area", "FLOAT", false))
            .with_column(ColumnDescriptor::geometry(
                "shape",
                GeometryType::MultiPolygon,
                Some(4326),
                false,
            ))
            .with_column(ColumnDescriptor::geometry(
                "centroid",
                GeometryType::Point,
                None,
                true,
            ))
    }

    #[test]
    fn create_table_uses_dialect_fragments() {
        let sql = create_table_statement(&InformixDialectBasic::new(), None, &parcels());
        assert_eq!(
            sql,
            "CREATE TABLE parcels (fid SERIAL PRIMARY KEY, owner VARCHAR(64), \
             area FLOAT NOT NULL, shape ST_MULTIPOLYGON NOT NULL, centroid ST_POINT)"
        );
    }

    #[test]
    fn describe_table_reports_dialect_types() {
        let info = describe_table(&InformixDialectBasic::new(), Some("gis"), &parcels());
        assert_eq!(info.schema.as_deref(), Some("gis"));
        assert_eq!(info.primary_key.as_deref(), Some("fid"));
        let types: Vec<_> = info.columns.iter().map(|c| c.sql_type.as_str()).collect();
        assert_eq!(types, ["VARCHAR(64)", "FLOAT", "ST_MULTIPOLYGON", "ST_POINT"]);
        assert_eq!(info.columns[2].srid, Some(4326));
        assert!(info.columns[3].geometry && info.columns[3].nullable);
    }

    #[test]
    fn create_table_qualifies_schema() {
        let ft = FeatureType::new("pois").with_column(ColumnDescriptor::geometry(
            "geom",
            GeometryType::GenericGeometry,
            None,
            true,
        ));
        let sql = create_table_statement(&InformixDialectPrepared::new(), Some("gis"), &ft);
        assert_eq!(sql, "CREATE TABLE gis.pois (geom ST_GEOMETRY)");
    }

    #[test]
    fn create_schema_runs_table_then_index() -> Result<()> {
        let conn = MockConnection::new();
        create_schema(&InformixDialectBasic::new(), None, &parcels(), &conn)?;

        let executed = conn.executed_sql();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].starts_with("CREATE TABLE parcels"));
        assert_eq!(executed[1], "ALTER TABLE parcels ADD SPATIAL INDEX (shape)");
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn create_schema_stops_on_failure() {
        let conn = MockConnection::new()
            .with_response("CREATE TABLE", MockResponse::error("table exists"));
        let err = create_schema(&InformixDialectBasic::new(), None, &parcels(), &conn).unwrap_err();
        assert!(err.user_message().contains("table exists"));
        assert_eq!(conn.executed_sql().len(), 1);
        assert_eq!(conn.open_handles(), 0);
    }

    #[test]
    fn select_wraps_geometries_and_pages() -> Result<()> {
        let sql = select_statement(&InformixDialectBasic::new(), &parcels(), Some(50), 100)?;
        assert_eq!(
            sql,
            "SELECT SKIP 100 FIRST 50 fid, owner, area, ST_AsBinary(shape), \
             ST_AsBinary(centroid) FROM parcels"
        );
        Ok(())
    }

    #[test]
    fn select_without_paging_is_untouched() -> Result<()> {
        let ft = FeatureType::new("empty");
        let sql = select_statement(&InformixDialectBasic::new(), &ft, None, 0)?;
        assert_eq!(sql, "SELECT * FROM empty");
        Ok(())
    }

    #[test]
    fn bounds_statement_reads_envelopes() {
        let sql = bounds_statement(&InformixDialectBasic::new(), "parcels", "shape");
        assert_eq!(sql, "SELECT ST_AsBinary(ST_Envelope(shape)) FROM parcels");
    }

    #[test]
    fn query_bounds_merges_rows_and_skips_nulls() -> Result<()> {
        let rect = |x1: f64, y1: f64, x2: f64, y2: f64| {
            let polygon = Rect::new(coord! { x: x1, y: y1 }, coord! { x: x2, y: y2 }).to_polygon();
            BindValue::Bytes(codec::encode_wkb(&Geometry::Polygon(polygon)).unwrap())
        };
        let conn = MockConnection::new().with_response(
            "ST_Envelope",
            MockResponse::Rows {
                columns: vec!["envelope".to_string()],
                rows: vec![
                    vec![rect(0.0, 0.0, 2.0, 2.0)],
                    vec![BindValue::Null],
                    vec![rect(-1.0, 1.0, 1.0, 5.0)],
                ],
            },
        );

        let bounds = query_bounds(&InformixDialectBasic::new(), "parcels", "shape", &conn)?;
        assert_eq!(bounds, Some(Envelope::new(-1.0, 0.0, 2.0, 5.0)));
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn query_bounds_tolerates_empty_points() -> Result<()> {
        let mut empty_point = vec![1, 1, 0, 0, 0];
        empty_point.extend_from_slice(&f64::NAN.to_le_bytes());
        empty_point.extend_from_slice(&f64::NAN.to_le_bytes());
        let point = codec::encode_wkb(&Geometry::Point(Point::new(3.0, 4.0)))?;
        let conn = MockConnection::new().with_response(
            "ST_Envelope",
            MockResponse::Rows {
                columns: vec!["envelope".to_string()],
                rows: vec![vec![BindValue::Bytes(empty_point)], vec![BindValue::Bytes(point)]],
            },
        );

        let bounds = query_bounds(&InformixDialectBasic::new(), "pois", "loc", &conn)?;
        assert_eq!(bounds, Some(Envelope::new(3.0, 4.0, 3.0, 4.0)));
        Ok(())
    }

    #[test]
    fn query_bounds_of_empty_table_is_none() -> Result<()> {
        let conn = MockConnection::new();
        assert_eq!(query_bounds(&InformixDialectBasic::new(), "t", "g", &conn)?, None);
        Ok(())
    }

    #[test]
    fn query_bounds_reports_decode_errors() {
        let conn = MockConnection::new()
            .with_response("ST_Envelope", MockResponse::single("e", BindValue::Bytes(vec![9, 9])));
        let err = query_bounds(&InformixDialectBasic::new(), "t", "g", &conn).unwrap_err();
        assert!(err.user_message().starts_with("Could not read geometry"));
        assert_eq!(conn.open_handles(), 0);
    }

    #[test]
    fn feature_tables_exclude_spatial_catalogs() -> Result<()> {
        let metadata = MockMetadata::new(&["roads", "GEOMETRY_COLUMNS", "Spatial_References", "pois"]);
        let conn = MockConnection::new();
        let tables = list_feature_tables(&InformixDialectBasic::new(), &metadata, None, &conn)?;
        assert_eq!(tables, ["roads", "pois"]);
        Ok(())
    }

    #[test]
    fn unknown_geometry_code_uses_kind_name() {
        struct Plain;
        impl SqlDialect for Plain {
            fn encode_geometry_envelope(&self, _: &str, _: &str, _: &mut String) {}
            fn decode_geometry_envelope(
                &self,
                _: &dyn geodialect_core_common::ResultSet,
                _: usize,
            ) -> geodialect_core_common::DialectResult<Option<Envelope>> {
                Ok(None)
            }
            fn decode_geometry_value(
                &self,
                _: &ColumnDescriptor,
                _: &dyn geodialect_core_common::ResultSet,
                _: &str,
            ) -> geodialect_core_common::DialectResult<Option<Geometry<f64>>> {
                Ok(Some(Geometry::Point(Point::new(0.0, 0.0))))
            }
            fn encode_primary_key(&self, column: &str, sql: &mut String) {
                sql.push_str(column);
            }
        }

        let column = ColumnDescriptor::geometry("g", GeometryType::LineString, None, true);
        assert_eq!(column_type_name(&Plain, &column), "LINESTRING");
    }
}
