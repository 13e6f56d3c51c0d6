//! SQL rules for Informix with the spatial DataBlade installed.
//!
//! [`InformixDialect`] carries no state. The statement-style facades in
//! [`crate::basic`] and [`crate::prepared`] each own one and forward every
//! common hook to it.

use geo_types::Geometry;
use geodialect_core_common::{
    ColumnDescriptor, Connection, DialectError, DialectResult, Envelope, FeatureType,
    GeometryType, ResultSet, SqlDialect, SqlResult,
};
use log::debug;

use crate::codec;
use crate::types::{
    CLASS_TO_SQL_TYPE, SQL_TYPE_TO_CLASS, from_type_name, type_name_for_code,
};

/// Catalog tables of the spatial DataBlade that are never feature tables.
pub const EXCLUDED_SYSTEM_TABLES: [&str; 2] = ["geometry_columns", "spatial_references"];

/// Returns the serial value assigned by the last insert of the session.
pub const LAST_GENERATED_KEY_QUERY: &str =
    "SELECT DBINFO('sqlca.sqlerrd1') FROM systables WHERE tabid = 1";

const NOT_NULL: &str = " NOT NULL";

/// Informix SQL rules shared by the raw and prepared statement facades.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixDialect;

impl InformixDialect {
    /// Creates the rule set.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Declaration of a serial primary key column.
    #[must_use]
    pub fn primary_key_clause(&self, column: &str) -> String {
        let mut sql = String::new();
        self.encode_column_name(None, column, &mut sql);
        sql.push_str(" SERIAL PRIMARY KEY");
        sql
    }

    /// Appends ` NOT NULL` to the declaration of a mandatory geometry column,
    /// unless the declaration already ends with it. Spatial indexes can only
    /// be built over non-null columns.
    pub fn post_column_clause(&self, column: &ColumnDescriptor, sql: &mut String) {
        if column.is_geometry() && !column.nullable && !sql.trim().ends_with(NOT_NULL) {
            sql.push_str(NOT_NULL);
        }
    }

    /// Statement adding a spatial index over one column.
    #[must_use]
    pub fn spatial_index_statement(&self, table: &str, column: &str) -> String {
        let mut sql = String::from("ALTER TABLE ");
        self.encode_table_name(table, &mut sql);
        sql.push_str(" ADD SPATIAL INDEX (");
        self.encode_column_name(None, column, &mut sql);
        sql.push(')');
        sql
    }

    /// Looks the column up in the `geometry_columns` catalog.
    #[must_use]
    pub fn srid_catalog_query(&self, schema: Option<&str>, table: &str, column: &str) -> String {
        let mut sql = String::from("SELECT ");
        self.encode_column_name(None, "srid", &mut sql);
        sql.push_str(" FROM ");
        self.encode_table_name("geometry_columns", &mut sql);
        sql.push_str(" WHERE ");
        self.encode_column_name(None, "f_table_schema", &mut sql);
        match schema {
            Some(schema) => {
                sql.push_str(" = ");
                sql.push_str(&quote_literal(schema));
            },
            None => sql.push_str(" IS NULL"),
        }
        sql.push_str(" AND ");
        self.encode_column_name(None, "f_table_name", &mut sql);
        sql.push_str(" = ");
        sql.push_str(&quote_literal(table));
        sql.push_str(" AND ");
        self.encode_column_name(None, "f_geometry_column", &mut sql);
        sql.push_str(" = ");
        sql.push_str(&quote_literal(column));
        sql
    }

    /// Reads the SRID of the first non-null value stored in the column.
    #[must_use]
    pub fn srid_sample_query(&self, schema: Option<&str>, table: &str, column: &str) -> String {
        let mut sql = String::from("SELECT FIRST 1 ST_Srid(");
        self.encode_column_name(None, column, &mut sql);
        sql.push_str(") FROM ");
        if let Some(schema) = schema {
            self.encode_schema_name(schema, &mut sql);
            sql.push('.');
        }
        self.encode_table_name(table, &mut sql);
        sql.push_str(" WHERE ");
        self.encode_column_name(None, column, &mut sql);
        sql.push_str(" IS NOT NULL");
        sql
    }

    /// Pagination clause inserted after `SELECT`, if any.
    ///
    /// Informix requires `SKIP` to precede `FIRST`, both directly after
    /// `SELECT`. Limits at or above `i32::MAX` mean "no limit".
    #[must_use]
    pub fn limit_offset_clause(limit: Option<u64>, offset: u64) -> Option<String> {
        let limit = limit.filter(|&n| n < i32::MAX as u64);
        match (limit, offset) {
            (Some(limit), 0) => Some(format!(" FIRST {limit}")),
            (Some(limit), offset) => Some(format!(" SKIP {offset} FIRST {limit}")),
            (None, 0) => None,
            (None, offset) => Some(format!(" SKIP {offset}")),
        }
    }
}

impl SqlDialect for InformixDialect {
    fn include_table(
        &self,
        _schema: Option<&str>,
        table: &str,
        _cx: &dyn Connection,
    ) -> SqlResult<bool> {
        Ok(!is_system_table(table))
    }

    fn name_escape(&self) -> &str {
        ""
    }

    fn geometry_type_name(&self, code: i32) -> Option<&'static str> {
        Some(type_name_for_code(code))
    }

    fn geometry_srid(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &dyn Connection,
    ) -> DialectResult<Option<i32>> {
        let sql = self.srid_catalog_query(schema, table, column);
        debug!("{sql}");
        match query_first(cx, &sql, |rs| rs.get_i32(1)) {
            Ok(Some(srid)) => return Ok(Some(srid)),
            Ok(None) => {},
            // Older DataBlade installs have no geometry_columns catalog.
            Err(err) => debug!("geometry_columns lookup failed: {err}"),
        }

        let sql = self.srid_sample_query(schema, table, column);
        debug!("{sql}");
        Ok(query_first(cx, &sql, |rs| rs.get_i32(1))?)
    }

    fn encode_geometry_column(
        &self,
        column: &ColumnDescriptor,
        prefix: Option<&str>,
        _srid: Option<i32>,
        sql: &mut String,
    ) {
        let mut column_ref = String::new();
        self.encode_column_name(prefix, &column.name, &mut column_ref);
        sql.push_str(&codec::encode_as_binary_expression(&column_ref));
    }

    fn encode_geometry_envelope(&self, _table: &str, column: &str, sql: &mut String) {
        let mut column_ref = String::new();
        self.encode_column_name(None, column, &mut column_ref);
        sql.push_str(&codec::encode_envelope_expression(&column_ref));
    }

    fn decode_geometry_envelope(
        &self,
        rs: &dyn ResultSet,
        column: usize,
    ) -> DialectResult<Option<Envelope>> {
        rs.get_bytes(column)?
            .map(|bytes| codec::decode_envelope(&bytes))
            .transpose()
    }

    fn decode_geometry_value(
        &self,
        _descriptor: &ColumnDescriptor,
        rs: &dyn ResultSet,
        column: &str,
    ) -> DialectResult<Option<Geometry<f64>>> {
        let index = rs.find_column(column)?;
        let bytes = rs.get_bytes(index)?;
        codec::decode(bytes.as_deref())
    }

    fn class_to_sql_type(&self, class: GeometryType) -> Option<i32> {
        CLASS_TO_SQL_TYPE.get(&class).copied()
    }

    fn sql_type_to_class(&self, code: i32) -> Option<GeometryType> {
        SQL_TYPE_TO_CLASS.get(&code).copied()
    }

    fn sql_type_name_to_class(&self, name: &str) -> Option<GeometryType> {
        from_type_name(name)
    }

    fn encode_primary_key(&self, column: &str, sql: &mut String) {
        sql.push_str(&self.primary_key_clause(column));
    }

    fn encode_post_column_create_table(&self, column: &ColumnDescriptor, sql: &mut String) {
        self.post_column_clause(column, sql);
    }

    fn post_create_table(
        &self,
        _schema: Option<&str>,
        feature_type: &FeatureType,
        cx: &dyn Connection,
    ) -> DialectResult<()> {
        for column in feature_type.geometry_columns().filter(|c| !c.nullable) {
            let sql = self.spatial_index_statement(&feature_type.name, &column.name);
            debug!("{sql}");
            let mut st = cx.create_statement()?;
            st.execute(&sql)?;
        }
        Ok(())
    }

    fn lookup_generated_values_post_insert(&self) -> bool {
        true
    }

    fn last_auto_generated_value(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _column: &str,
        cx: &dyn Connection,
    ) -> DialectResult<Option<i64>> {
        debug!("{LAST_GENERATED_KEY_QUERY}");
        Ok(query_first(cx, LAST_GENERATED_KEY_QUERY, |rs| rs.get_i64(1))?)
    }

    fn is_limit_offset_supported(&self) -> bool {
        true
    }

    fn apply_limit_offset(
        &self,
        sql: &mut String,
        limit: Option<u64>,
        offset: u64,
    ) -> DialectResult<()> {
        if !sql.starts_with("SELECT") {
            return Err(DialectError::InvalidQuery {
                message: "Cannot apply limit to a query that does not begin with SELECT"
                    .to_string(),
            });
        }
        if let Some(clause) = Self::limit_offset_clause(limit, offset) {
            sql.insert_str("SELECT".len(), &clause);
        }
        Ok(())
    }
}

/// Returns `true` for spatial catalog tables, ignoring case.
#[must_use]
pub fn is_system_table(table: &str) -> bool {
    EXCLUDED_SYSTEM_TABLES
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(table))
}

/// Quotes a character literal, doubling embedded single quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Runs `sql` and reads the first row with `read`. The statement and result
/// set are released when this returns, on success and on error alike.
fn query_first<T>(
    cx: &dyn Connection,
    sql: &str,
    read: impl FnOnce(&dyn ResultSet) -> SqlResult<Option<T>>,
) -> SqlResult<Option<T>> {
    let mut st = cx.create_statement()?;
    let mut rs = st.execute_query(sql)?;
    if rs.next()? { read(&*rs) } else { Ok(None) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;
    use geodialect_core_common::BindValue;
    use geodialect_core_common::test_support::{MockConnection, MockResponse};

    const DIALECT: InformixDialect = InformixDialect::new();

    fn paginate(sql: &str, limit: Option<u64>, offset: u64) -> DialectResult<String> {
        let mut sql = sql.to_string();
        DIALECT.apply_limit_offset(&mut sql, limit, offset)?;
        Ok(sql)
    }

    #[test]
    fn pagination_policy() -> DialectResult<()> {
        assert_eq!(paginate("SELECT a FROM t", Some(10), 0)?, "SELECT FIRST 10 a FROM t");
        assert_eq!(
            paginate("SELECT a FROM t", Some(10), 20)?,
            "SELECT SKIP 20 FIRST 10 a FROM t"
        );
        assert_eq!(paginate("SELECT a FROM t", None, 5)?, "SELECT SKIP 5 a FROM t");
        assert_eq!(paginate("SELECT a FROM t", None, 0)?, "SELECT a FROM t");
        assert_eq!(paginate("SELECT a FROM t", Some(0), 0)?, "SELECT FIRST 0 a FROM t");
        Ok(())
    }

    #[test]
    fn max_int_limit_is_unbounded() -> DialectResult<()> {
        let max = i32::MAX as u64;
        assert_eq!(paginate("SELECT a FROM t", Some(max), 0)?, "SELECT a FROM t");
        assert_eq!(paginate("SELECT a FROM t", Some(max), 3)?, "SELECT SKIP 3 a FROM t");
        Ok(())
    }

    #[test]
    fn pagination_requires_leading_select() {
        for sql in ["select a FROM t", " SELECT a FROM t", "WITH x AS (SELECT 1) SELECT *"] {
            let err = paginate(sql, Some(1), 0).unwrap_err();
            match err {
                DialectError::InvalidQuery { message } => {
                    assert_eq!(
                        message,
                        "Cannot apply limit to a query that does not begin with SELECT"
                    );
                },
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn identifiers_are_unquoted() {
        let mut sql = String::new();
        DIALECT.encode_column_name(Some("a"), "geom", &mut sql);
        sql.push(' ');
        DIALECT.encode_table_name("roads", &mut sql);
        assert_eq!(sql, "a.geom roads");
    }

    #[test]
    fn serial_primary_key() {
        assert_eq!(DIALECT.primary_key_clause("fid"), "fid SERIAL PRIMARY KEY");
        let mut sql = String::from("CREATE TABLE t (");
        DIALECT.encode_primary_key("id", &mut sql);
        assert_eq!(sql, "CREATE TABLE t (id SERIAL PRIMARY KEY");
    }

    #[test]
    fn not_null_is_appended_once() {
        let column = ColumnDescriptor::geometry("geom", GeometryType::Point, Some(4326), false);
        let mut sql = String::from("geom ST_POINT");
        DIALECT.post_column_clause(&column, &mut sql);
        assert_eq!(sql, "geom ST_POINT NOT NULL");
        DIALECT.post_column_clause(&column, &mut sql);
        assert_eq!(sql, "geom ST_POINT NOT NULL");

        let mut padded = String::from("geom ST_POINT NOT NULL  ");
        DIALECT.post_column_clause(&column, &mut padded);
        assert_eq!(padded, "geom ST_POINT NOT NULL  ");
    }

    #[test]
    fn not_null_skips_nullable_and_attribute_columns() {
        let nullable = ColumnDescriptor::geometry("geom", GeometryType::Point, None, true);
        let attribute = ColumnDescriptor::attribute("name", "VARCHAR", false);
        let mut sql = String::from("x");
        DIALECT.post_column_clause(&nullable, &mut sql);
        DIALECT.post_column_clause(&attribute, &mut sql);
        assert_eq!(sql, "x");
    }

    #[test]
    fn system_tables_are_excluded_ignoring_case() -> SqlResult<()> {
        let conn = MockConnection::new();
        for table in ["geometry_columns", "GEOMETRY_COLUMNS", "Spatial_References"] {
            assert!(!DIALECT.include_table(None, table, &conn)?, "{table}");
        }
        assert!(DIALECT.include_table(Some("gis"), "roads", &conn)?);
        Ok(())
    }

    #[test]
    fn geometry_type_names() {
        assert_eq!(DIALECT.geometry_type_name(2003), Some("ST_POLYGON"));
        assert_eq!(DIALECT.geometry_type_name(2008), Some("ST_GEOMETRYCOLLECTION"));
        assert_eq!(DIALECT.geometry_type_name(4), Some("LVARCHAR"));
        assert_eq!(DIALECT.class_to_sql_type(GeometryType::MultiPoint), Some(2004));
        assert_eq!(DIALECT.sql_type_to_class(2007), Some(GeometryType::GenericGeometry));
        assert_eq!(
            DIALECT.sql_type_name_to_class("ST_GeometryCollection"),
            Some(GeometryType::GeometryCollection)
        );
        assert_eq!(DIALECT.sql_type_name_override(2001), None);
    }

    #[test]
    fn geometry_column_is_read_as_wkb() {
        let column = ColumnDescriptor::geometry("geom", GeometryType::Point, None, true);
        let mut sql = String::new();
        DIALECT.encode_geometry_column(&column, Some("f"), Some(4326), &mut sql);
        assert_eq!(sql, "ST_AsBinary(f.geom)");

        let mut sql = String::new();
        DIALECT.encode_geometry_envelope("roads", "geom", &mut sql);
        assert_eq!(sql, "ST_AsBinary(ST_Envelope(geom))");
    }

    #[test]
    fn srid_from_catalog() -> DialectResult<()> {
        let conn = MockConnection::new()
            .with_response("geometry_columns", MockResponse::single("srid", 4326_i64));
        let srid = DIALECT.geometry_srid(Some("gis"), "roads", "geom", &conn)?;
        assert_eq!(srid, Some(4326));
        assert_eq!(
            conn.executed_sql(),
            vec![
                "SELECT srid FROM geometry_columns WHERE f_table_schema = 'gis' \
                 AND f_table_name = 'roads' AND f_geometry_column = 'geom'"
                    .to_string()
            ]
        );
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn srid_falls_back_to_sampling_when_catalog_fails() -> DialectResult<()> {
        let conn = MockConnection::new()
            .with_response("geometry_columns", MockResponse::error("table not found"))
            .with_response("ST_Srid", MockResponse::single("srid", 32632_i64));
        let srid = DIALECT.geometry_srid(None, "roads", "geom", &conn)?;
        assert_eq!(srid, Some(32632));

        let executed = conn.executed_sql();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].contains("f_table_schema IS NULL"));
        assert_eq!(
            executed[1],
            "SELECT FIRST 1 ST_Srid(geom) FROM roads WHERE geom IS NOT NULL"
        );
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn srid_falls_back_when_catalog_has_no_row() -> DialectResult<()> {
        let conn = MockConnection::new()
            .with_response("geometry_columns", MockResponse::empty(&["srid"]))
            .with_response("ST_Srid", MockResponse::empty(&["srid"]));
        let srid = DIALECT.geometry_srid(Some("gis"), "roads", "geom", &conn)?;
        assert_eq!(srid, None);
        assert_eq!(
            conn.executed_sql()[1],
            "SELECT FIRST 1 ST_Srid(geom) FROM gis.roads WHERE geom IS NOT NULL"
        );
        Ok(())
    }

    #[test]
    fn srid_sampling_errors_propagate() {
        let conn = MockConnection::new()
            .with_response("geometry_columns", MockResponse::error("no catalog"))
            .with_response("ST_Srid", MockResponse::error("no such table"));
        let err = DIALECT
            .geometry_srid(None, "missing", "geom", &conn)
            .unwrap_err();
        assert!(err.is_sql());
        assert_eq!(conn.open_handles(), 0);
    }

    #[test]
    fn srid_literals_escape_quotes() {
        let sql = DIALECT.srid_catalog_query(None, "o'brien", "geom");
        assert!(sql.contains("f_table_name = 'o''brien'"));
    }

    #[test]
    fn spatial_index_for_mandatory_geometries_only() -> DialectResult<()> {
        let feature_type = FeatureType::new("roads")
            .with_primary_key("fid")
            .with_column(ColumnDescriptor::attribute("name", "VARCHAR", false))
            .with_column(ColumnDescriptor::geometry(
                "geom",
                GeometryType::LineString,
                Some(4326),
                false,
            ))
            .with_column(ColumnDescriptor::geometry(
                "label_point",
                GeometryType::Point,
                Some(4326),
                true,
            ));
        let conn = MockConnection::new();
        DIALECT.post_create_table(None, &feature_type, &conn)?;
        assert_eq!(
            conn.executed_sql(),
            vec!["ALTER TABLE roads ADD SPATIAL INDEX (geom)".to_string()]
        );
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn spatial_index_failure_propagates_and_releases() {
        let feature_type = FeatureType::new("roads").with_column(ColumnDescriptor::geometry(
            "geom",
            GeometryType::LineString,
            None,
            false,
        ));
        let conn =
            MockConnection::new().with_response("SPATIAL INDEX", MockResponse::error("no sbspace"));
        let err = DIALECT
            .post_create_table(None, &feature_type, &conn)
            .unwrap_err();
        assert!(err.is_sql());
        assert_eq!(conn.open_handles(), 0);
    }

    #[test]
    fn last_generated_key() -> DialectResult<()> {
        let conn =
            MockConnection::new().with_response("sqlerrd1", MockResponse::single("id", 42_i64));
        assert!(DIALECT.lookup_generated_values_post_insert());
        assert_eq!(DIALECT.next_auto_generated_value(None, "t", "id", &conn)?, None);
        assert_eq!(
            DIALECT.last_auto_generated_value(None, "t", "id", &conn)?,
            Some(42)
        );
        assert_eq!(conn.executed_sql().last().map(String::as_str), Some(LAST_GENERATED_KEY_QUERY));
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn last_generated_key_without_row() -> DialectResult<()> {
        let conn = MockConnection::new();
        assert_eq!(DIALECT.last_auto_generated_value(None, "t", "id", &conn)?, None);
        Ok(())
    }

    #[test]
    fn decode_value_and_envelope_from_result_set() -> DialectResult<()> {
        let point = Geometry::Point(Point::new(1.5, -2.0));
        let wkb = codec::encode_wkb(&point)?;
        let conn = MockConnection::new().with_response(
            "FROM roads",
            MockResponse::Rows {
                columns: vec!["geom".to_string(), "env".to_string()],
                rows: vec![
                    vec![BindValue::Bytes(wkb.clone()), BindValue::Bytes(wkb)],
                    vec![BindValue::Null, BindValue::Null],
                ],
            },
        );
        let descriptor = ColumnDescriptor::geometry("geom", GeometryType::Point, None, true);
        let mut st = conn.create_statement()?;
        let mut rs = st.execute_query("SELECT geom, env FROM roads")?;

        assert!(rs.next()?);
        assert_eq!(
            DIALECT.decode_geometry_value(&descriptor, &*rs, "GEOM")?,
            Some(point)
        );
        assert_eq!(
            DIALECT.decode_geometry_envelope(&*rs, 2)?,
            Some(Envelope::new(1.5, -2.0, 1.5, -2.0))
        );

        assert!(rs.next()?);
        assert_eq!(DIALECT.decode_geometry_value(&descriptor, &*rs, "geom")?, None);
        assert_eq!(DIALECT.decode_geometry_envelope(&*rs, 2)?, None);
        Ok(())
    }

    #[test]
    fn malformed_value_is_a_decode_error() -> SqlResult<()> {
        let conn = MockConnection::new().with_response(
            "FROM t",
            MockResponse::single("geom", BindValue::Bytes(vec![0x01, 0x02])),
        );
        let descriptor = ColumnDescriptor::geometry("geom", GeometryType::Point, None, true);
        let mut st = conn.create_statement()?;
        let mut rs = st.execute_query("SELECT geom FROM t")?;
        assert!(rs.next()?);
        let err = DIALECT
            .decode_geometry_value(&descriptor, &*rs, "geom")
            .unwrap_err();
        assert!(matches!(err, DialectError::Decode { .. }));
        Ok(())
    }
}
