//! `geodialect-core` is the entry point of the `geodialect` workspace.
//!
//! This crate includes:
//! - **Dialect Lookup**: discovery of the registered SQL dialects and their
//!   statement styles.
//! - **Operations**: assembly of complete statements (CREATE TABLE, paged
//!   SELECT, bounds queries, feature table discovery) from dialect hooks.
//! - **Errors**: a top level error type with user facing messages.
//!
//! The `dialects` module registers every bundled dialect on first use, so
//! callers never have to initialise the registry themselves.

pub mod dialects;
pub mod error;
pub mod operations;
pub mod types;

pub use error::{GeoDialectError, RegistryError, Result};
