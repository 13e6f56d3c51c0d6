//! Translation of [`Filter`] predicates into Informix `WHERE` clauses.
//!
//! Spatial predicates use the DataBlade's `ST_*` functions. A bounding box
//! test is written as `ST_Intersects` against the box polygon.

use geo_types::Geometry;
use geodialect_core_common::{
    BindValue, DialectError, DialectResult, Filter, FilterToSql, GeometryType, Literal,
    SqlDialect,
};

use crate::codec;
use crate::dialect::{InformixDialect, quote_literal};

const ALWAYS_TRUE: &str = "1 = 1";
const ALWAYS_FALSE: &str = "1 = 0";

/// How literal values reach the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Values are written into the SQL text
    Inline,
    /// Values are replaced by `?` and collected for binding
    Prepared,
}

/// Renders [`Filter`]s for Informix.
#[derive(Debug, Clone)]
pub struct InformixFilterToSql {
    dialect: InformixDialect,
    mode: BindingMode,
    binds: Vec<BindValue>,
}

impl InformixFilterToSql {
    /// Translator writing literals into the SQL text.
    #[must_use]
    pub fn inline() -> Self {
        Self::new(BindingMode::Inline)
    }

    /// Translator emitting placeholders.
    #[must_use]
    pub fn prepared() -> Self {
        Self::new(BindingMode::Prepared)
    }

    fn new(mode: BindingMode) -> Self {
        Self {
            dialect: InformixDialect::new(),
            mode,
            binds: Vec::new(),
        }
    }

    /// The binding mode of this translator.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    fn write(&mut self, filter: &Filter, out: &mut String) -> DialectResult<()> {
        match filter {
            Filter::Include => out.push_str(ALWAYS_TRUE),
            Filter::Exclude => out.push_str(ALWAYS_FALSE),
            Filter::And(children) => self.write_junction(children, " AND ", ALWAYS_TRUE, out)?,
            Filter::Or(children) => self.write_junction(children, " OR ", ALWAYS_FALSE, out)?,
            Filter::Not(child) => {
                out.push_str("NOT (");
                self.write(child, out)?;
                out.push(')');
            },
            Filter::Compare {
                property,
                op,
                value,
            } => {
                self.write_property(property, out);
                out.push(' ');
                out.push_str(op.as_sql());
                out.push(' ');
                self.write_literal(value, out)?;
            },
            Filter::IsNull(property) => {
                self.write_property(property, out);
                out.push_str(" IS NULL");
            },
            Filter::Like { property, pattern } => {
                self.write_property(property, out);
                out.push_str(" LIKE ");
                self.write_literal(&Literal::Text(pattern.clone()), out)?;
            },
            Filter::Bbox {
                property,
                envelope,
                srid,
            } => match envelope.to_polygon() {
                Some(polygon) => {
                    let geometry = Geometry::Polygon(polygon);
                    self.write_spatial_call("ST_Intersects", property, &geometry, *srid, out)?;
                },
                // an empty box intersects nothing
                None => out.push_str(ALWAYS_FALSE),
            },
            Filter::Spatial {
                op,
                property,
                geometry,
                srid,
            } => {
                let function = format!("ST_{}", op.as_str());
                self.write_spatial_call(&function, property, geometry, *srid, out)?;
            },
        }
        Ok(())
    }

    fn write_junction(
        &mut self,
        children: &[Filter],
        separator: &str,
        identity: &str,
        out: &mut String,
    ) -> DialectResult<()> {
        if children.is_empty() {
            out.push_str(identity);
            return Ok(());
        }
        out.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write(child, out)?;
        }
        out.push(')');
        Ok(())
    }

    fn write_property(&self, property: &str, out: &mut String) {
        self.dialect.encode_column_name(None, property, out);
    }

    fn write_literal(&mut self, value: &Literal, out: &mut String) -> DialectResult<()> {
        if self.mode == BindingMode::Prepared {
            self.binds.push(BindValue::from(value));
            out.push('?');
            return Ok(());
        }
        match value {
            Literal::Null => out.push_str(codec::NULL_LITERAL),
            Literal::Integer(v) => out.push_str(&v.to_string()),
            Literal::Float(v) if !v.is_finite() => {
                return Err(DialectError::UnsupportedValue {
                    value: v.to_string(),
                });
            },
            Literal::Float(v) => out.push_str(&v.to_string()),
            Literal::Text(v) => out.push_str(&quote_literal(v)),
            Literal::Boolean(v) => out.push_str(if *v { "'t'" } else { "'f'" }),
        }
        Ok(())
    }

    fn write_spatial_call(
        &mut self,
        function: &str,
        property: &str,
        geometry: &Geometry<f64>,
        srid: Option<i32>,
        out: &mut String,
    ) -> DialectResult<()> {
        out.push_str(function);
        out.push('(');
        self.write_property(property, out);
        out.push_str(", ");
        match self.mode {
            BindingMode::Inline => {
                codec::ensure_finite(geometry)?;
                out.push_str(&codec::encode(Some(geometry), srid));
            },
            BindingMode::Prepared => {
                self.binds.push(BindValue::Bytes(codec::encode_wkb(geometry)?));
                out.push_str(&codec::encode_wkb_placeholder(
                    Some(GeometryType::of(geometry)),
                    srid,
                ));
            },
        }
        out.push(')');
        Ok(())
    }
}

impl FilterToSql for InformixFilterToSql {
    fn encode(&mut self, filter: &Filter) -> DialectResult<String> {
        let mut out = String::new();
        self.write(filter, &mut out)?;
        Ok(out)
    }

    fn bind_values(&self) -> &[BindValue] {
        &self.binds
    }
}
