//! Capability traits a generic feature store engine uses to obtain engine
//! specific SQL.
//!
//! [`SqlDialect`] holds the hooks common to every code path. The engine then
//! works either with raw statements, where values are inlined as SQL literals
//! ([`BasicSqlDialect`]), or with prepared statements, where values are bound
//! to placeholders ([`PreparedSqlDialect`]).
//!
//! Default method bodies describe an engine with no special behavior. Every
//! implementation must be safe to call from several threads at once.

use geo_types::Geometry;

use crate::connection::{Connection, PreparedStatement, ResultSet};
use crate::error::{DialectError, DialectResult, SqlResult};
use crate::filter::FilterToSql;
use crate::geometry::{Envelope, GeometryType};
use crate::schema::{ColumnDescriptor, FeatureType};

/// Hooks shared by the raw and prepared statement code paths.
pub trait SqlDialect: Send + Sync {
    /// Decides whether a catalog table is a user feature table.
    ///
    /// # Errors
    ///
    /// Implementations that probe the connection propagate its errors.
    fn include_table(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _cx: &dyn Connection,
    ) -> SqlResult<bool> {
        Ok(true)
    }

    /// Quote character wrapped around identifiers.
    fn name_escape(&self) -> &str {
        "\""
    }

    /// Writes a possibly prefixed column reference.
    fn encode_column_name(&self, prefix: Option<&str>, raw: &str, sql: &mut String) {
        let escape = self.name_escape();
        if let Some(prefix) = prefix {
            sql.push_str(escape);
            sql.push_str(prefix);
            sql.push_str(escape);
            sql.push('.');
        }
        sql.push_str(escape);
        sql.push_str(raw);
        sql.push_str(escape);
    }

    /// Writes a table name.
    fn encode_table_name(&self, raw: &str, sql: &mut String) {
        let escape = self.name_escape();
        sql.push_str(escape);
        sql.push_str(raw);
        sql.push_str(escape);
    }

    /// Writes a schema name.
    fn encode_schema_name(&self, raw: &str, sql: &mut String) {
        self.encode_table_name(raw, sql);
    }

    /// Writes a column type in a CREATE TABLE statement.
    fn encode_column_type(&self, sql_type_name: &str, sql: &mut String) {
        sql.push_str(sql_type_name);
    }

    /// Engine type name for a geometry SQL type code.
    fn geometry_type_name(&self, _code: i32) -> Option<&'static str> {
        None
    }

    /// Resolves the SRID of a geometry column.
    ///
    /// # Errors
    ///
    /// Propagates SQL errors from the connection.
    fn geometry_srid(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _column: &str,
        _cx: &dyn Connection,
    ) -> DialectResult<Option<i32>> {
        Ok(None)
    }

    /// Writes the SELECT list expression for a geometry column.
    fn encode_geometry_column(
        &self,
        column: &ColumnDescriptor,
        prefix: Option<&str>,
        _srid: Option<i32>,
        sql: &mut String,
    ) {
        self.encode_column_name(prefix, &column.name, sql);
    }

    /// Writes the SELECT list expression for the envelope of a geometry column.
    fn encode_geometry_envelope(&self, table: &str, column: &str, sql: &mut String);

    /// Decodes the envelope written by [`SqlDialect::encode_geometry_envelope`].
    ///
    /// Returns `None` when the column is SQL NULL.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Decode`] for malformed values and propagates SQL
    /// errors from the result set.
    fn decode_geometry_envelope(
        &self,
        rs: &dyn ResultSet,
        column: usize,
    ) -> DialectResult<Option<Envelope>>;

    /// Decodes the geometry value written by [`SqlDialect::encode_geometry_column`].
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Decode`] for malformed values and propagates SQL
    /// errors from the result set.
    fn decode_geometry_value(
        &self,
        descriptor: &ColumnDescriptor,
        rs: &dyn ResultSet,
        column: &str,
    ) -> DialectResult<Option<Geometry<f64>>>;

    /// SQL type code for a geometry kind.
    fn class_to_sql_type(&self, _class: GeometryType) -> Option<i32> {
        None
    }

    /// Geometry kind for a SQL type code.
    fn sql_type_to_class(&self, _code: i32) -> Option<GeometryType> {
        None
    }

    /// Geometry kind for an engine type name.
    fn sql_type_name_to_class(&self, _name: &str) -> Option<GeometryType> {
        None
    }

    /// Replacement type name for a SQL type code, when the engine spells it
    /// differently from the standard name.
    fn sql_type_name_override(&self, _code: i32) -> Option<&'static str> {
        None
    }

    /// Writes the declaration of a generated primary key column.
    fn encode_primary_key(&self, column: &str, sql: &mut String);

    /// Appends column constraints after a column declaration.
    fn encode_post_column_create_table(&self, _column: &ColumnDescriptor, _sql: &mut String) {}

    /// Appends table options after the closing parenthesis of CREATE TABLE.
    fn encode_post_create_table(&self, _table: &str, _sql: &mut String) {}

    /// Runs follow-up statements once a table has been created.
    ///
    /// # Errors
    ///
    /// Propagates SQL errors from the connection.
    fn post_create_table(
        &self,
        _schema: Option<&str>,
        _feature_type: &FeatureType,
        _cx: &dyn Connection,
    ) -> DialectResult<()> {
        Ok(())
    }

    /// Whether generated keys are read after the insert rather than before.
    fn lookup_generated_values_post_insert(&self) -> bool {
        false
    }

    /// Key value to use for the next insert, for engines that allocate keys
    /// before inserting.
    ///
    /// # Errors
    ///
    /// Propagates SQL errors from the connection.
    fn next_auto_generated_value(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _column: &str,
        _cx: &dyn Connection,
    ) -> DialectResult<Option<i64>> {
        Ok(None)
    }

    /// Key value generated by the last insert of this session.
    ///
    /// # Errors
    ///
    /// Propagates SQL errors from the connection.
    fn last_auto_generated_value(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _column: &str,
        _cx: &dyn Connection,
    ) -> DialectResult<Option<i64>> {
        Ok(None)
    }

    /// Whether [`SqlDialect::apply_limit_offset`] is implemented.
    fn is_limit_offset_supported(&self) -> bool {
        false
    }

    /// Rewrites a SELECT statement to skip `offset` rows and return at most
    /// `limit` rows. `None` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidQuery`] when the statement cannot be
    /// rewritten.
    fn apply_limit_offset(
        &self,
        _sql: &mut String,
        _limit: Option<u64>,
        _offset: u64,
    ) -> DialectResult<()> {
        Err(DialectError::InvalidQuery {
            message: "limit/offset is not supported by this dialect".to_string(),
        })
    }
}

/// Dialect for engines driven through raw statements.
pub trait BasicSqlDialect: SqlDialect {
    /// Writes a geometry as an inline SQL literal, or `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Encode`] when the geometry cannot be serialized.
    fn encode_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        srid: Option<i32>,
        sql: &mut String,
    ) -> DialectResult<()>;

    /// Creates a translator that inlines literal values.
    fn create_filter_to_sql(&self) -> Box<dyn FilterToSql>;
}

/// Dialect for engines driven through prepared statements.
pub trait PreparedSqlDialect: SqlDialect {
    /// Writes the placeholder expression for a geometry value.
    fn prepare_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        srid: Option<i32>,
        sql: &mut String,
    );

    /// Binds a geometry value to the placeholder written by
    /// [`PreparedSqlDialect::prepare_geometry_value`].
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Encode`] when the geometry cannot be serialized
    /// and propagates SQL errors from the statement.
    fn set_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        srid: Option<i32>,
        stmt: &mut dyn PreparedStatement,
        index: usize,
    ) -> DialectResult<()>;

    /// Creates a translator that emits placeholders and collects bind values.
    fn create_prepared_filter_to_sql(&self) -> Box<dyn FilterToSql>;
}
