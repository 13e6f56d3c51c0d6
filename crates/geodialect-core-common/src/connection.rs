//! Connection abstractions consumed by dialects.
//!
//! The engine owns connections; dialects borrow one for the duration of a call.
//! Statements and result sets are handed out as boxed handles that borrow from
//! their parent, so a result set can never outlive its statement and dropping
//! a handle releases it on every exit path, including early returns through `?`.

use crate::error::{SqlError, SqlResult};

/// A live database session.
pub trait Connection {
    /// Opens a statement for executing raw SQL text.
    fn create_statement(&self) -> SqlResult<Box<dyn Statement + '_>>;

    /// Prepares a parameterized statement.
    fn prepare_statement(&self, sql: &str) -> SqlResult<Box<dyn PreparedStatement + '_>>;
}

/// A statement executing raw SQL text.
pub trait Statement {
    /// Runs a query and returns its rows.
    fn execute_query(&mut self, sql: &str) -> SqlResult<Box<dyn ResultSet + '_>>;

    /// Runs a DDL or DML statement and returns the number of affected rows.
    fn execute(&mut self, sql: &str) -> SqlResult<u64>;
}

/// A prepared statement with positional (1-based) parameters.
pub trait PreparedStatement {
    /// Binds SQL NULL.
    fn set_null(&mut self, index: usize) -> SqlResult<()>;

    /// Binds a binary value.
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> SqlResult<()>;

    /// Binds an integer.
    fn set_i64(&mut self, index: usize, value: i64) -> SqlResult<()>;

    /// Binds a floating point number.
    fn set_f64(&mut self, index: usize, value: f64) -> SqlResult<()>;

    /// Binds a character value.
    fn set_string(&mut self, index: usize, value: &str) -> SqlResult<()>;

    /// Binds a boolean.
    fn set_bool(&mut self, index: usize, value: bool) -> SqlResult<()>;

    /// Runs the statement as a query.
    fn execute_query(&mut self) -> SqlResult<Box<dyn ResultSet + '_>>;

    /// Runs the statement as DDL or DML.
    fn execute_update(&mut self) -> SqlResult<u64>;

    /// Binds any [`BindValue`].
    fn set_value(&mut self, index: usize, value: &BindValue) -> SqlResult<()> {
        match value {
            BindValue::Null => self.set_null(index),
            BindValue::Bytes(bytes) => self.set_bytes(index, bytes),
            BindValue::Integer(v) => self.set_i64(index, *v),
            BindValue::Float(v) => self.set_f64(index, *v),
            BindValue::Text(v) => self.set_string(index, v),
            BindValue::Boolean(v) => self.set_bool(index, *v),
        }
    }
}

/// Rows produced by a query. Columns are 1-based.
pub trait ResultSet {
    /// Advances to the next row, returning `false` when exhausted.
    fn next(&mut self) -> SqlResult<bool>;

    /// Resolves a column label to its index.
    fn find_column(&self, name: &str) -> SqlResult<usize>;

    /// Reads a binary column of the current row.
    fn get_bytes(&self, column: usize) -> SqlResult<Option<Vec<u8>>>;

    /// Reads an integer column of the current row.
    fn get_i64(&self, column: usize) -> SqlResult<Option<i64>>;

    /// Reads a character column of the current row.
    fn get_string(&self, column: usize) -> SqlResult<Option<String>>;

    /// Reads an integer column that must fit in 32 bits.
    fn get_i32(&self, column: usize) -> SqlResult<Option<i32>> {
        self.get_i64(column)?
            .map(|v| {
                i32::try_from(v)
                    .map_err(|_| SqlError::new(format!("value {v} in column {column} overflows INT")))
            })
            .transpose()
    }
}

/// Catalog introspection.
pub trait MetadataProvider {
    /// Lists the tables visible in `schema` (or the default schema).
    fn table_names(&self, schema: Option<&str>) -> SqlResult<Vec<String>>;
}

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// SQL NULL
    Null,
    /// Binary data, e.g. WKB
    Bytes(Vec<u8>),
    /// Integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Character data
    Text(String),
    /// Boolean
    Boolean(bool),
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Integer(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Boolean(value)
    }
}
