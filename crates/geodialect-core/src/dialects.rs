//! Lookup of the SQL dialects bundled with `geodialect`.
//!
//! Dialect crates publish a [`DialectFactory`] in the process wide registry of
//! `geodialect-core-common`. This module registers every bundled dialect the
//! first time it is used and offers name based lookup on top of the registry.
//!
//! # Examples
//!
//! ```
//! use geodialect_core::dialects::{basic_dialect, find_dialect};
//!
//! let informix = find_dialect("informix").expect("Informix dialect should exist");
//! assert!(informix.capabilities.prepared.is_supported());
//!
//! let dialect = basic_dialect("Informix").unwrap();
//! assert!(dialect.is_limit_offset_supported());
//! ```

use std::sync::{Arc, Once};

use geodialect_core_common::{
    BasicSqlDialect, DialectFactory, DialectInfo, PreparedSqlDialect, dialect_registry,
};
use geodialect_informix::register_informix_dialect;
use log::debug;

use crate::error::{RegistryError, dialect_not_found};

/// Ensures the bundled dialects are registered.
///
/// Safe to call any number of times; registration happens once.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        register_informix_dialect();
        debug!(
            "Registered dialects: {}",
            dialect_registry()
                .dialects()
                .iter()
                .map(|d| d.short_name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    });
}

/// Returns every registered dialect, sorted by short name.
#[must_use]
pub fn get_dialects() -> Vec<DialectInfo> {
    init();
    dialect_registry().dialects()
}

/// Returns the dialects that support at least one statement style.
#[must_use]
pub fn get_available_dialects() -> Vec<DialectInfo> {
    get_dialects()
        .into_iter()
        .filter(|d| d.capabilities.has_statement_support())
        .collect()
}

/// Finds a dialect by name (case-insensitive).
#[must_use]
pub fn find_dialect(name: &str) -> Option<DialectInfo> {
    get_dialects()
        .into_iter()
        .find(|d| d.short_name.eq_ignore_ascii_case(name))
}

/// Returns the short names of every registered dialect.
#[must_use]
pub fn get_dialect_names() -> Vec<&'static str> {
    get_dialects().iter().map(|d| d.short_name).collect()
}

fn factory(name: &str) -> Result<Arc<dyn DialectFactory>, RegistryError> {
    init();
    dialect_registry()
        .get(name)
        .ok_or_else(|| dialect_not_found(name))
}

/// Creates the raw statement variant of the named dialect.
///
/// # Errors
///
/// Returns [`RegistryError::NotFound`] for unknown names and
/// [`RegistryError::StyleNotSupported`] when the dialect has no raw variant.
pub fn basic_dialect(name: &str) -> Result<Arc<dyn BasicSqlDialect>, RegistryError> {
    let factory = factory(name)?;
    factory
        .create_basic()
        .ok_or_else(|| RegistryError::StyleNotSupported {
            dialect: factory.dialect().short_name.to_string(),
            style: "basic".to_string(),
        })
}

/// Creates the prepared statement variant of the named dialect.
///
/// # Errors
///
/// Returns [`RegistryError::NotFound`] for unknown names and
/// [`RegistryError::StyleNotSupported`] when the dialect has no prepared
/// variant.
pub fn prepared_dialect(name: &str) -> Result<Arc<dyn PreparedSqlDialect>, RegistryError> {
    let factory = factory(name)?;
    factory
        .create_prepared()
        .ok_or_else(|| RegistryError::StyleNotSupported {
            dialect: factory.dialect().short_name.to_string(),
            style: "prepared".to_string(),
        })
}
