//! Scripted in-memory connection for exercising dialects without a database.
//!
//! Responses are matched by substring against the SQL text, in registration
//! order. Unmatched queries return no rows and unmatched updates affect no
//! rows. The connection records every executed statement and tracks how many
//! statement and result set handles are currently open, so tests can assert
//! that handles are released on every path.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::connection::{
    BindValue, Connection, MetadataProvider, PreparedStatement, ResultSet, Statement,
};
use crate::error::{SqlError, SqlResult};

/// What a scripted statement returns.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A result set
    Rows {
        /// Column labels
        columns: Vec<String>,
        /// Row values, one `Vec` per row
        rows: Vec<Vec<BindValue>>,
    },
    /// Number of affected rows for an update
    Affected(u64),
    /// A failure
    Error(SqlError),
}

impl MockResponse {
    /// A result set with one column and one row.
    pub fn single(column: &str, value: impl Into<BindValue>) -> Self {
        MockResponse::Rows {
            columns: vec![column.to_string()],
            rows: vec![vec![value.into()]],
        }
    }

    /// A result set with no rows.
    #[must_use]
    pub fn empty(columns: &[&str]) -> Self {
        MockResponse::Rows {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// A failure with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        MockResponse::Error(SqlError::new(message))
    }
}

/// A statement recorded by [`MockConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    /// SQL text
    pub sql: String,
    /// Bound parameters by 1-based index; empty for raw statements
    pub params: BTreeMap<usize, BindValue>,
}

/// In-memory [`Connection`] driven by scripted responses.
#[derive(Debug, Default)]
pub struct MockConnection {
    script: Mutex<Vec<(String, MockResponse)>>,
    executed: Mutex<Vec<ExecutedStatement>>,
    open_handles: AtomicUsize,
    opened_statements: AtomicUsize,
}

impl MockConnection {
    /// Creates a connection with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for statements containing `pattern`.
    #[must_use]
    pub fn with_response(self, pattern: &str, response: MockResponse) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((pattern.to_string(), response));
        self
    }

    /// SQL text of every executed statement, in order.
    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        self.executed()
            .into_iter()
            .map(|statement| statement.sql)
            .collect()
    }

    /// Every executed statement with its bound parameters.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of statement and result set handles not yet released.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Number of statements opened over the connection's lifetime.
    #[must_use]
    pub fn opened_statements(&self) -> usize {
        self.opened_statements.load(Ordering::SeqCst)
    }

    fn record(&self, sql: &str, params: BTreeMap<usize, BindValue>) {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ExecutedStatement {
                sql: sql.to_string(),
                params,
            });
    }

    fn respond(&self, sql: &str) -> Option<MockResponse> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }

    fn acquire(&self) -> HandleGuard<'_> {
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        HandleGuard { conn: self }
    }

    fn query(&self, sql: &str, params: BTreeMap<usize, BindValue>) -> SqlResult<MockResultSet<'_>> {
        self.record(sql, params);
        let (columns, rows) = match self.respond(sql) {
            Some(MockResponse::Rows { columns, rows }) => (columns, rows),
            Some(MockResponse::Error(err)) => return Err(err),
            Some(MockResponse::Affected(_)) | None => (Vec::new(), Vec::new()),
        };
        Ok(MockResultSet {
            _guard: self.acquire(),
            columns,
            rows,
            cursor: None,
        })
    }

    fn update(&self, sql: &str, params: BTreeMap<usize, BindValue>) -> SqlResult<u64> {
        self.record(sql, params);
        match self.respond(sql) {
            Some(MockResponse::Affected(n)) => Ok(n),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Rows { .. }) | None => Ok(0),
        }
    }
}

impl Connection for MockConnection {
    fn create_statement(&self) -> SqlResult<Box<dyn Statement + '_>> {
        self.opened_statements.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockStatement {
            _guard: self.acquire(),
            conn: self,
        }))
    }

    fn prepare_statement(&self, sql: &str) -> SqlResult<Box<dyn PreparedStatement + '_>> {
        self.opened_statements.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPreparedStatement {
            _guard: self.acquire(),
            conn: self,
            sql: sql.to_string(),
            params: BTreeMap::new(),
        }))
    }
}

/// Decrements the open handle count when dropped.
#[derive(Debug)]
struct HandleGuard<'a> {
    conn: &'a MockConnection,
}

impl Drop for HandleGuard<'_> {
    fn drop(&mut self) {
        self.conn.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MockStatement<'a> {
    _guard: HandleGuard<'a>,
    conn: &'a MockConnection,
}

impl Statement for MockStatement<'_> {
    fn execute_query(&mut self, sql: &str) -> SqlResult<Box<dyn ResultSet + '_>> {
        Ok(Box::new(self.conn.query(sql, BTreeMap::new())?))
    }

    fn execute(&mut self, sql: &str) -> SqlResult<u64> {
        self.conn.update(sql, BTreeMap::new())
    }
}

struct MockPreparedStatement<'a> {
    _guard: HandleGuard<'a>,
    conn: &'a MockConnection,
    sql: String,
    params: BTreeMap<usize, BindValue>,
}

impl MockPreparedStatement<'_> {
    fn bind(&mut self, index: usize, value: BindValue) -> SqlResult<()> {
        if index == 0 {
            return Err(SqlError::new("parameter indexes are 1-based"));
        }
        self.params.insert(index, value);
        Ok(())
    }
}

impl PreparedStatement for MockPreparedStatement<'_> {
    fn set_null(&mut self, index: usize) -> SqlResult<()> {
        self.bind(index, BindValue::Null)
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> SqlResult<()> {
        self.bind(index, BindValue::Bytes(value.to_vec()))
    }

    fn set_i64(&mut self, index: usize, value: i64) -> SqlResult<()> {
        self.bind(index, BindValue::Integer(value))
    }

    fn set_f64(&mut self, index: usize, value: f64) -> SqlResult<()> {
        self.bind(index, BindValue::Float(value))
    }

    fn set_string(&mut self, index: usize, value: &str) -> SqlResult<()> {
        self.bind(index, BindValue::Text(value.to_string()))
    }

    fn set_bool(&mut self, index: usize, value: bool) -> SqlResult<()> {
        self.bind(index, BindValue::Boolean(value))
    }

    fn execute_query(&mut self) -> SqlResult<Box<dyn ResultSet + '_>> {
        Ok(Box::new(self.conn.query(&self.sql, self.params.clone())?))
    }

    fn execute_update(&mut self) -> SqlResult<u64> {
        self.conn.update(&self.sql, self.params.clone())
    }
}

/// Result set over scripted rows.
pub struct MockResultSet<'a> {
    _guard: HandleGuard<'a>,
    columns: Vec<String>,
    rows: Vec<Vec<BindValue>>,
    cursor: Option<usize>,
}

impl MockResultSet<'_> {
    fn value(&self, column: usize) -> SqlResult<&BindValue> {
        let row = self
            .cursor
            .and_then(|c| self.rows.get(c))
            .ok_or_else(|| SqlError::new("no current row"))?;
        column
            .checked_sub(1)
            .and_then(|i| row.get(i))
            .ok_or_else(|| SqlError::new(format!("column index {column} out of range")))
    }
}

impl ResultSet for MockResultSet<'_> {
    fn next(&mut self) -> SqlResult<bool> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next.min(self.rows.len()));
        Ok(next < self.rows.len())
    }

    fn find_column(&self, name: &str) -> SqlResult<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|i| i + 1)
            .ok_or_else(|| SqlError::new(format!("column '{name}' not found")))
    }

    fn get_bytes(&self, column: usize) -> SqlResult<Option<Vec<u8>>> {
        match self.value(column)? {
            BindValue::Null => Ok(None),
            BindValue::Bytes(bytes) => Ok(Some(bytes.clone())),
            BindValue::Text(text) => Ok(Some(text.as_bytes().to_vec())),
            other => Err(SqlError::new(format!("cannot read {other:?} as bytes"))),
        }
    }

    fn get_i64(&self, column: usize) -> SqlResult<Option<i64>> {
        match self.value(column)? {
            BindValue::Null => Ok(None),
            BindValue::Integer(v) => Ok(Some(*v)),
            other => Err(SqlError::new(format!("cannot read {other:?} as integer"))),
        }
    }

    fn get_string(&self, column: usize) -> SqlResult<Option<String>> {
        match self.value(column)? {
            BindValue::Null => Ok(None),
            BindValue::Text(v) => Ok(Some(v.clone())),
            BindValue::Integer(v) => Ok(Some(v.to_string())),
            BindValue::Float(v) => Ok(Some(v.to_string())),
            BindValue::Boolean(v) => Ok(Some(v.to_string())),
            BindValue::Bytes(_) => Err(SqlError::new("cannot read bytes as string")),
        }
    }
}

/// [`MetadataProvider`] over a fixed list of table names.
#[derive(Debug, Clone, Default)]
pub struct MockMetadata {
    tables: Vec<String>,
}

impl MockMetadata {
    /// Creates a catalog listing `tables`.
    #[must_use]
    pub fn new(tables: &[&str]) -> Self {
        Self {
            tables: tables.iter().map(ToString::to_string).collect(),
        }
    }
}

impl MetadataProvider for MockMetadata {
    fn table_names(&self, _schema: Option<&str>) -> SqlResult<Vec<String>> {
        Ok(self.tables.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rows_are_returned() -> SqlResult<()> {
        let conn = MockConnection::new().with_response("FROM t", MockResponse::single("n", 7_i64));
        let mut st = conn.create_statement()?;
        let mut rs = st.execute_query("SELECT n FROM t")?;
        assert!(rs.next()?);
        assert_eq!(rs.get_i64(1)?, Some(7));
        assert_eq!(rs.find_column("N")?, 1);
        assert!(!rs.next()?);
        Ok(())
    }

    #[test]
    fn handles_are_released_on_drop() -> SqlResult<()> {
        let conn = MockConnection::new();
        {
            let mut st = conn.create_statement()?;
            let _rs = st.execute_query("SELECT 1")?;
            assert_eq!(conn.open_handles(), 2);
        }
        assert_eq!(conn.open_handles(), 0);
        assert_eq!(conn.opened_statements(), 1);
        Ok(())
    }

    #[test]
    fn scripted_errors_propagate() {
        let conn = MockConnection::new().with_response("DROP", MockResponse::error("denied"));
        let mut st = conn.create_statement().expect("statement");
        let err = st.execute("DROP TABLE x").unwrap_err();
        assert_eq!(err.message, "denied");
    }

    #[test]
    fn prepared_statement_records_binds() -> SqlResult<()> {
        let conn = MockConnection::new();
        let mut ps = conn.prepare_statement("INSERT INTO t VALUES (?, ?)")?;
        ps.set_value(1, &BindValue::Integer(1))?;
        ps.set_null(2)?;
        ps.execute_update()?;
        drop(ps);

        let executed = conn.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].params.get(&2), Some(&BindValue::Null));
        assert_eq!(conn.open_handles(), 0);
        Ok(())
    }

    #[test]
    fn reading_before_next_fails() -> SqlResult<()> {
        let conn = MockConnection::new().with_response("t", MockResponse::single("n", 1_i64));
        let mut st = conn.create_statement()?;
        let rs = st.execute_query("SELECT n FROM t")?;
        assert!(rs.get_i64(1).is_err());
        Ok(())
    }
}
