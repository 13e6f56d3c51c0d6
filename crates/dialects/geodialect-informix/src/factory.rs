//! Data store description and dialect factory for Informix.
//!
//! This module implements the `DialectFactory` trait so that the Informix
//! dialect can be discovered through the dialect registry, and validates the
//! connection parameters a data store is configured with.

use std::collections::HashMap;
use std::sync::Arc;

use geodialect_core_common::{
    BasicSqlDialect, ConfigError, DialectFactory, DialectInfo, PreparedSqlDialect, SqlDialect,
    SupportStatus,
};
use log::debug;

use crate::basic::InformixDialectBasic;
use crate::prepared::InformixDialectPrepared;

/// Name shown to users.
pub const DISPLAY_NAME: &str = "Informix";
/// One line description of the data store.
pub const DESCRIPTION: &str = "Informix Database";
/// JDBC driver class of the Informix client.
pub const DRIVER_CLASS_NAME: &str = "com.informix.jdbc.IfxDriver";
/// Database type identifier, also the JDBC sub-protocol.
pub const DATABASE_ID: &str = "informix-sqli";
/// Query used to check that a pooled connection is alive.
pub const VALIDATION_QUERY: &str = "SELECT DBINFO('version','full') FROM systables WHERE tabid = 1";
/// Default Informix listener port.
pub const DEFAULT_PORT: u16 = 9088;

/// Parameter keys understood by [`InformixOptions::from_params`].
pub mod params {
    /// Database type, must be `informix-sqli`
    pub const DBTYPE: &str = "dbtype";
    /// Server host name
    pub const HOST: &str = "host";
    /// Server port
    pub const PORT: &str = "port";
    /// Database name
    pub const DATABASE: &str = "database";
    /// User name
    pub const USER: &str = "user";
    /// Password
    pub const PASSWD: &str = "passwd";
    /// Whether to use prepared statements
    pub const PREPARED_STATEMENTS: &str = "preparedStatements";
    /// Schema; accepted but ignored, tables live in the connection's database
    pub const SCHEMA: &str = "schema";
}

/// Connection options for an Informix data store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformixOptions {
    /// Server host name (default: `localhost`)
    pub host: String,
    /// Server port (default: 9088)
    pub port: u16,
    /// Database name (required)
    pub database: String,
    /// User name
    pub user: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Bind values to placeholders instead of inlining them (default: false)
    pub prepared_statements: bool,
}

impl Default for InformixOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: String::new(),
            user: None,
            password: None,
            prepared_statements: false,
        }
    }
}

impl InformixOptions {
    /// Create options for a database with every other option at its default
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the server host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the credentials
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Set whether prepared statements are used
    #[must_use]
    pub fn with_prepared_statements(mut self, prepared: bool) -> Self {
        self.prepared_statements = prepared;
        self
    }

    /// Builds options from data store parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `dbtype` is not `informix-sqli`, `port` or
    /// `preparedStatements` cannot be parsed, or `database` is missing.
    pub fn from_params(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        if let Some(schema) = values.get(params::SCHEMA) {
            debug!("Ignoring Informix schema parameter '{schema}'");
        }
        match values.get(params::DBTYPE) {
            Some(dbtype) if dbtype != DATABASE_ID => {
                return Err(ConfigError::InvalidOption {
                    option: params::DBTYPE.to_string(),
                    message: format!("expected '{DATABASE_ID}', got '{dbtype}'"),
                });
            },
            _ => {},
        }

        let mut options = Self::default();
        if let Some(host) = values.get(params::HOST) {
            options.host.clone_from(host);
        }
        if let Some(port) = values.get(params::PORT) {
            options.port = port.trim().parse().map_err(|_| ConfigError::InvalidOption {
                option: params::PORT.to_string(),
                message: format!("'{port}' is not a valid port number"),
            })?;
        }
        if let Some(database) = values.get(params::DATABASE) {
            options.database.clone_from(database);
        }
        options.user = values.get(params::USER).cloned();
        options.password = values.get(params::PASSWD).cloned();
        if let Some(prepared) = values.get(params::PREPARED_STATEMENTS) {
            options.prepared_statements = parse_bool(prepared).ok_or_else(|| {
                ConfigError::InvalidOption {
                    option: params::PREPARED_STATEMENTS.to_string(),
                    message: format!("'{prepared}' is not a boolean"),
                }
            })?;
        }

        for key in values.keys() {
            if !KNOWN_PARAMS.contains(&key.as_str()) {
                debug!("Ignoring unknown Informix parameter '{key}'");
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Checks that the options describe a reachable database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the database or host is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                option: params::DATABASE.to_string(),
            });
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidOption {
                option: params::HOST.to_string(),
                message: "host must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// JDBC connection URL, `jdbc:informix-sqli://host:port/database`.
    #[must_use]
    pub fn jdbc_url(&self) -> String {
        format!(
            "jdbc:{DATABASE_ID}://{}:{}/{}",
            self.host, self.port, self.database
        )
    }
}

const KNOWN_PARAMS: [&str; 8] = [
    params::DBTYPE,
    params::HOST,
    params::PORT,
    params::DATABASE,
    params::USER,
    params::PASSWD,
    params::PREPARED_STATEMENTS,
    params::SCHEMA,
];

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// The statement style selected for a data store.
#[derive(Debug, Clone, Copy)]
pub enum InformixSqlDialect {
    /// Values inlined into SQL text
    Basic(InformixDialectBasic),
    /// Values bound to placeholders
    Prepared(InformixDialectPrepared),
}

impl InformixSqlDialect {
    /// Picks the facade requested by `options`.
    #[must_use]
    pub fn from_options(options: &InformixOptions) -> Self {
        if options.prepared_statements {
            Self::Prepared(InformixDialectPrepared::new())
        } else {
            Self::Basic(InformixDialectBasic::new())
        }
    }

    /// The common hooks of the selected facade.
    #[must_use]
    pub fn as_sql_dialect(&self) -> &dyn SqlDialect {
        match self {
            Self::Basic(dialect) => dialect as &dyn SqlDialect,
            Self::Prepared(dialect) => dialect as &dyn SqlDialect,
        }
    }

    /// Returns `true` for the prepared statement facade.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        matches!(self, Self::Prepared(_))
    }
}

/// Factory for the Informix dialect facades.
pub struct InformixDialectFactory;

impl DialectFactory for InformixDialectFactory {
    fn dialect(&self) -> DialectInfo {
        DialectInfo::new(
            DISPLAY_NAME,
            DESCRIPTION,
            SupportStatus::Supported,
            SupportStatus::Supported,
            SupportStatus::Supported,
        )
    }

    fn create_basic(&self) -> Option<Arc<dyn BasicSqlDialect>> {
        Some(Arc::new(InformixDialectBasic::new()))
    }

    fn create_prepared(&self) -> Option<Arc<dyn PreparedSqlDialect>> {
        Some(Arc::new(InformixDialectPrepared::new()))
    }
}

/// Registers the Informix dialect with the global dialect registry.
///
/// This is called by `geodialect-core` during initialization.
pub fn register_informix_dialect() {
    let registry = geodialect_core_common::dialect_registry();
    registry.register(Arc::new(InformixDialectFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let options = InformixOptions::new("gis");
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 9088);
        assert!(!options.prepared_statements);
        assert_eq!(options.jdbc_url(), "jdbc:informix-sqli://localhost:9088/gis");
    }

    #[test]
    fn builder_overrides() {
        let options = InformixOptions::new("gis")
            .with_host("db.example.org")
            .with_port(9089)
            .with_credentials("informix", "secret")
            .with_prepared_statements(true);
        assert_eq!(options.jdbc_url(), "jdbc:informix-sqli://db.example.org:9089/gis");
        assert_eq!(options.user.as_deref(), Some("informix"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn from_params_reads_every_option() -> Result<(), ConfigError> {
        let options = InformixOptions::from_params(&param_map(&[
            ("dbtype", "informix-sqli"),
            ("host", "ifx"),
            ("port", "9090"),
            ("database", "stores"),
            ("user", "u"),
            ("passwd", "p"),
            ("preparedStatements", "TRUE"),
        ]))?;
        assert_eq!(
            options,
            InformixOptions::new("stores")
                .with_host("ifx")
                .with_port(9090)
                .with_credentials("u", "p")
                .with_prepared_statements(true)
        );
        Ok(())
    }

    #[test]
    fn from_params_ignores_schema() -> Result<(), ConfigError> {
        let options =
            InformixOptions::from_params(&param_map(&[("database", "gis"), ("schema", "public")]))?;
        assert_eq!(options, InformixOptions::new("gis"));
        Ok(())
    }

    #[test]
    fn from_params_validates_values() {
        let err = InformixOptions::from_params(&param_map(&[("database", "gis"), ("port", "x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref option, .. } if option == "port"));

        let err = InformixOptions::from_params(&param_map(&[("dbtype", "postgis"), ("database", "gis")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref option, .. } if option == "dbtype"));

        let err = InformixOptions::from_params(&param_map(&[("host", "ifx")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                option: "database".to_string()
            }
        );
    }

    #[test]
    fn facade_follows_prepared_flag() {
        let basic = InformixSqlDialect::from_options(&InformixOptions::new("gis"));
        assert!(!basic.is_prepared());
        let prepared = InformixSqlDialect::from_options(
            &InformixOptions::new("gis").with_prepared_statements(true),
        );
        assert!(prepared.is_prepared());
        assert_eq!(prepared.as_sql_dialect().name_escape(), "");
    }

    #[test]
    fn factory_builds_both_facades() {
        let factory = InformixDialectFactory;
        let info = factory.dialect();
        assert_eq!(info.short_name, "Informix");
        assert!(info.capabilities.has_statement_support());
        assert!(factory.create_basic().is_some());
        assert!(factory.create_prepared().is_some());
    }

    #[test]
    fn registration_is_idempotent() {
        register_informix_dialect();
        register_informix_dialect();
        let registry = geodialect_core_common::dialect_registry();
        assert!(registry.contains("informix"));
        assert_eq!(
            registry
                .dialects()
                .iter()
                .filter(|d| d.short_name == DISPLAY_NAME)
                .count(),
            1
        );
    }
}
