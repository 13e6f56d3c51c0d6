//! Informix spatial DataBlade dialect.
//!
//! Translates the engine independent hooks of `geodialect-core-common` into
//! Informix SQL: unquoted identifiers, `SERIAL` primary keys, spatial indexes
//! over mandatory geometry columns, `SKIP`/`FIRST` pagination and the `ST_*`
//! constructor family for geometry values.
//!
//! # Example
//!
//! ```
//! use geodialect_core_common::SqlDialect;
//! use geodialect_informix::InformixDialectBasic;
//!
//! let dialect = InformixDialectBasic::new();
//! let mut sql = String::from("SELECT name FROM roads");
//! dialect.apply_limit_offset(&mut sql, Some(10), 20).unwrap();
//! assert_eq!(sql, "SELECT SKIP 20 FIRST 10 name FROM roads");
//! ```

pub mod basic;
pub mod codec;
mod delegate;
pub mod dialect;
pub mod factory;
pub mod filter_to_sql;
pub mod prepared;
pub mod types;
mod wkt;

pub use basic::InformixDialectBasic;
pub use dialect::{EXCLUDED_SYSTEM_TABLES, InformixDialect};
pub use factory::{
    InformixDialectFactory, InformixOptions, InformixSqlDialect, register_informix_dialect,
};
pub use filter_to_sql::{BindingMode, InformixFilterToSql};
pub use prepared::InformixDialectPrepared;
