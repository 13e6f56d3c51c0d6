//! Raw statement facade: geometries are inlined as `*FromText` literals.

use geo_types::Geometry;
use geodialect_core_common::{BasicSqlDialect, DialectResult, FilterToSql};

use crate::codec;
use crate::delegate::delegate_sql_dialect;
use crate::dialect::InformixDialect;
use crate::filter_to_sql::InformixFilterToSql;

/// Informix dialect for engines that build SQL text with inline values.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixDialectBasic {
    delegate: InformixDialect,
}

impl InformixDialectBasic {
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

delegate_sql_dialect!(InformixDialectBasic);

impl BasicSqlDialect for InformixDialectBasic {
    fn encode_geometry_value(
        &self,
        value: Option<&Geometry<f64>>,
        srid: Option<i32>,
        sql: &mut String,
    ) -> DialectResult<()> {
        if let Some(geometry) = value {
            codec::ensure_finite(geometry)?;
        }
        sql.push_str(&codec::encode(value, srid));
        Ok(())
    }

    fn create_filter_to_sql(&self) -> Box<dyn FilterToSql> {
        Box::new(InformixFilterToSql::inline())
    }
}
