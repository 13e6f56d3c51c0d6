//! Custom error types for `geodialect` operations.
//!
//! The dialect crates report [`DialectError`], [`SqlError`] and
//! [`ConfigError`]; this module gathers them under one root type and adds the
//! registry failures that only arise when looking dialects up by name.

use geodialect_core_common::{ConfigError, DialectError, SqlError};
use thiserror::Error;

/// Main error type for `geodialect` operations.
///
/// Display formatting is delegated to the underlying variants.
#[derive(Debug, Error)]
pub enum GeoDialectError {
    /// Dialect lookup errors (not found, unsupported statement style)
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// SQL generation and geometry codec errors
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// Data store configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SqlError> for GeoDialectError {
    fn from(err: SqlError) -> Self {
        Self::Dialect(DialectError::Sql(err))
    }
}

/// Dialect registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Dialect was not found in the registry
    #[error("Dialect '{name}' not found. Available dialects: {available}")]
    NotFound {
        /// The requested dialect name
        name: String,
        /// Comma-separated list of available dialects
        available: String,
    },

    /// Dialect does not implement the requested statement style
    #[error("Dialect '{dialect}' does not support {style} statements")]
    StyleNotSupported {
        /// The dialect name
        dialect: String,
        /// The statement style (e.g., "prepared")
        style: String,
    },
}

/// Type alias for Results using `GeoDialectError`.
pub type Result<T> = std::result::Result<T, GeoDialectError>;

impl GeoDialectError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Registry(e) => e.user_message(),
            Self::Dialect(e) => dialect_user_message(e),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Registry(e) => e.recovery_suggestion(),
            Self::Dialect(e) => dialect_recovery_suggestion(e),
            Self::Config(ConfigError::MissingRequired { option }) => {
                Some(format!("Provide a value for '{option}'."))
            },
            _ => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors might be fixed by retrying with different
    /// parameters.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Registry(RegistryError::StyleNotSupported { .. })
                | Self::Dialect(DialectError::InvalidQuery { .. })
        )
    }
}

impl RegistryError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { name, available } => {
                format!(
                    "Dialect '{name}' not found.\n\nAvailable dialects:\n{}",
                    available
                        .split(", ")
                        .map(|d| format!("  - {d}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
            Self::StyleNotSupported { dialect, style } => {
                format!("The '{dialect}' dialect does not support {style} statements.")
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => {
                Some("Run 'geodialect dialects' to see all available dialects.".to_string())
            },
            Self::StyleNotSupported { .. } => {
                Some("Try the other statement style for this dialect.".to_string())
            },
        }
    }
}

fn dialect_user_message(err: &DialectError) -> String {
    match err {
        DialectError::Decode { context, .. } => format!("Could not read geometry ({context})"),
        DialectError::Encode { context, .. } => format!("Could not write geometry ({context})"),
        DialectError::Sql(sql) => format!("Database error: {sql}"),
        DialectError::InvalidQuery { .. } | DialectError::UnsupportedValue { .. } => {
            err.to_string()
        },
    }
}

fn dialect_recovery_suggestion(err: &DialectError) -> Option<String> {
    match err {
        DialectError::Decode { context, .. } if context.contains("wkt") => {
            Some("Check that the value is well-known text (WKT).".to_string())
        },
        DialectError::Decode { .. } => {
            Some("Check that the value is well-known binary (WKB).".to_string())
        },
        DialectError::InvalidQuery { .. } => {
            Some("Pagination can only be applied to statements starting with SELECT.".to_string())
        },
        DialectError::UnsupportedValue { .. } => {
            Some("Replace NaN or infinite numbers with finite values or NULL.".to_string())
        },
        _ => None,
    }
}

/// Helper to create `RegistryError::NotFound` with the available dialects.
#[must_use]
pub fn dialect_not_found(name: &str) -> RegistryError {
    use crate::dialects::get_dialect_names;

    RegistryError::NotFound {
        name: name.to_string(),
        available: get_dialect_names().join(", "),
    }
}
