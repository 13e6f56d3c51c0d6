//! Common types and traits shared across `geodialect` crates.
//!
//! This crate provides the abstractions that sit between a generic feature
//! store engine and the per-engine dialects: the connection traits dialects
//! borrow, the capability traits they implement, the schema and filter models
//! they translate, and the registry they are published in.

pub mod connection;
pub mod dialect;
pub mod dialects;
pub mod error;
pub mod factory;
pub mod filter;
pub mod geometry;
pub mod schema;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export commonly used types
pub use connection::{BindValue, Connection, MetadataProvider, PreparedStatement, ResultSet, Statement};
pub use dialect::{BasicSqlDialect, PreparedSqlDialect, SqlDialect};
pub use dialects::{DialectCapabilities, DialectInfo, SupportStatus};
pub use error::{ConfigError, DialectError, DialectResult, SqlError, SqlResult};
pub use factory::{DialectFactory, DialectRegistry, dialect_registry};
pub use filter::{ComparisonOp, Filter, FilterToSql, Literal, SpatialOp};
pub use geometry::{Envelope, GeometryType};
pub use schema::{ColumnDescriptor, ColumnKind, FeatureType};
