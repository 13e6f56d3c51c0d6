//! Error types shared by dialect implementations and the engine that drives them.
//!
//! [`SqlError`] is what a [`Connection`](crate::connection::Connection) reports;
//! dialects propagate it unchanged. [`DialectError`] adds the failures a dialect
//! produces on its own, such as geometry decoding or a malformed query rewrite.

use thiserror::Error;

/// Failure reported by the underlying database connection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("SQL error{}: {message}", sql_state.as_ref().map(|s| format!(" [{s}]")).unwrap_or_default())]
pub struct SqlError {
    /// Message reported by the engine
    pub message: String,
    /// Five character SQLSTATE, when the driver reports one
    pub sql_state: Option<String>,
    /// Vendor specific error code
    pub vendor_code: Option<i32>,
}

impl SqlError {
    /// Creates an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: None,
            vendor_code: None,
        }
    }

    /// Attaches a SQLSTATE to the error.
    #[must_use]
    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    /// Attaches a vendor error code to the error.
    #[must_use]
    pub fn with_vendor_code(mut self, code: i32) -> Self {
        self.vendor_code = Some(code);
        self
    }
}

/// Errors raised while generating SQL or decoding values for a specific engine.
#[derive(Debug, Error)]
pub enum DialectError {
    /// Binary geometry could not be parsed
    #[error("{context}: {source}")]
    Decode {
        /// What was being decoded (e.g. "error decoding wkb")
        context: String,
        /// The underlying parser failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Geometry could not be serialized
    #[error("{context}: {source}")]
    Encode {
        /// What was being encoded
        context: String,
        /// The underlying writer failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A query rewrite precondition was violated
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of the violated precondition
        message: String,
    },

    /// A value has no SQL literal form (NaN or infinite numbers)
    #[error("Cannot write {value} into SQL text")]
    UnsupportedValue {
        /// Description of the rejected value
        value: String,
    },

    /// Failure from the underlying connection, passed through untouched
    #[error(transparent)]
    Sql(#[from] SqlError),
}

impl DialectError {
    /// Wraps a parser failure with decoding context.
    pub fn decode<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a writer failure with encoding context.
    pub fn encode<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encode {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` if this error came straight from the connection.
    #[must_use]
    pub fn is_sql(&self) -> bool {
        matches!(self, Self::Sql(_))
    }
}

/// Configuration errors.
///
/// These errors occur when data store parameters are invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },
}

/// Result type for connection level operations.
pub type SqlResult<T> = Result<T, SqlError>;

/// Result type for dialect operations.
pub type DialectResult<T> = Result<T, DialectError>;
