//! Prepared statement facade: geometries are bound as WKB parameters to a
//! `*FromWKB` constructor.

use geo_types::Geometry;
use geodialect_core_common::{
    DialectResult, FilterToSql, GeometryType, PreparedSqlDialect, PreparedStatement,
};

use crate::codec;
use crate::delegate::delegate_sql_dialect;
use crate::dialect::InformixDialect;
use crate::filter_to_sql::InformixFilterToSql;

/// Informix dialect for engines that bind values to placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixDialectPrepared {
    delegate: InformixDialect,
}

impl InformixDialectPrepared {
    /// Creates the facade.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delegate: InformixDialect::new(),
        }
    }

    /// The shared rule set.
    #[must_use]
    pub fn rules(&self) -> &InformixDialect {
        &self.delegate
    }
}

delegate_sql_dialect!(InformixDialectPrepared);

impl PreparedSqlDialect for InformixDialectPrepared {
    fn prepare_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        srid: Option<i32>,
        sql: &mut String,
    ) {
        sql.push_str(&codec::encode_wkb_placeholder(
            value.map(GeometryType::of),
            srid,
        ));
    }

    fn set_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        _srid: Option<i32>,
        stmt: &mut dyn PreparedStatement,
        index: usize,
    ) -> DialectResult<()> {
        match value {
            Some(geometry) => stmt.set_bytes(index, &codec::encode_wkb(geometry)?)?,
            None => stmt.set_null(index)?,
        }
        Ok(())
    }

    fn create_prepared_filter_to_sql(&self) -> Box<dyn FilterToSql> {
        Box::new(InformixFilterToSql::prepared())
    }
}
