//! A connection that records SQL instead of running it.
//!
//! Lets the CLI show every statement an operation would issue, including the
//! follow-up statements a dialect runs on its own, without a database.

use std::cell::RefCell;

use geodialect_core_common::{
    Connection, PreparedStatement, ResultSet, SqlError, SqlResult, Statement,
};

/// Records statements in execution order. Queries return no rows.
#[derive(Debug, Default)]
pub struct DryRunConnection {
    statements: RefCell<Vec<String>>,
}

impl DryRunConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements executed so far.
    pub fn into_statements(self) -> Vec<String> {
        self.statements.into_inner()
    }

    fn record(&self, sql: &str) {
        self.statements.borrow_mut().push(sql.to_string());
    }
}

impl Connection for DryRunConnection {
    fn create_statement(&self) -> SqlResult<Box<dyn Statement + '_>> {
        Ok(Box::new(DryRunStatement { conn: self }))
    }

    fn prepare_statement(&self, sql: &str) -> SqlResult<Box<dyn PreparedStatement + '_>> {
        Ok(Box::new(DryRunPrepared {
            conn: self,
            sql: sql.to_string(),
        }))
    }
}

struct DryRunStatement<'a> {
    conn: &'a DryRunConnection,
}

impl Statement for DryRunStatement<'_> {
    fn execute_query(&mut self, sql: &str) -> SqlResult<Box<dyn ResultSet + '_>> {
        self.conn.record(sql);
        Ok(Box::new(NoRows))
    }

    fn execute(&mut self, sql: &str) -> SqlResult<u64> {
        self.conn.record(sql);
        Ok(0)
    }
}

struct DryRunPrepared<'a> {
    conn: &'a DryRunConnection,
    sql: String,
}

impl PreparedStatement for DryRunPrepared<'_> {
    fn set_null(&mut self, _index: usize) -> SqlResult<()> {
        Ok(())
    }

    fn set_bytes(&mut self, _index: usize, _value: &[u8]) -> SqlResult<()> {
        Ok(())
    }

    fn set_i64(&mut self, _index: usize, _value: i64) -> SqlResult<()> {
        Ok(())
    }

    fn set_f64(&mut self, _index: usize, _value: f64) -> SqlResult<()> {
        Ok(())
    }

    fn set_string(&mut self, _index: usize, _value: &str) -> SqlResult<()> {
        Ok(())
    }

    fn set_bool(&mut self, _index: usize, _value: bool) -> SqlResult<()> {
        Ok(())
    }

    fn execute_query(&mut self) -> SqlResult<Box<dyn ResultSet + '_>> {
        self.conn.record(&self.sql);
        Ok(Box::new(NoRows))
    }

    fn execute_update(&mut self) -> SqlResult<u64> {
        self.conn.record(&self.sql);
        Ok(0)
    }
}

struct NoRows;

impl ResultSet for NoRows {
    fn next(&mut self) -> SqlResult<bool> {
        Ok(false)
    }

    fn find_column(&self, name: &str) -> SqlResult<usize> {
        Err(SqlError::new(format!("column '{name}' not found")))
    }

    fn get_bytes(&self, _column: usize) -> SqlResult<Option<Vec<u8>>> {
        Err(SqlError::new("no current row"))
    }

    fn get_i64(&self, _column: usize) -> SqlResult<Option<i64>> {
        Err(SqlError::new("no current row"))
    }

    fn get_string(&self, _column: usize) -> SqlResult<Option<String>> {
        Err(SqlError::new("no current row"))
    }
}
