//! Engine independent predicate model and the trait dialects implement to
//! render it as SQL.

use geo_types::Geometry;

use crate::connection::BindValue;
use crate::error::DialectResult;
use crate::geometry::Envelope;

/// A scalar literal compared against a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// SQL NULL
    Null,
    /// Integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Character data
    Text(String),
    /// Boolean
    Boolean(bool),
}

impl From<&Literal> for BindValue {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => BindValue::Null,
            Literal::Integer(v) => BindValue::Integer(*v),
            Literal::Float(v) => BindValue::Float(*v),
            Literal::Text(v) => BindValue::Text(v.clone()),
            Literal::Boolean(v) => BindValue::Boolean(*v),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl ComparisonOp {
    /// SQL token for the operator.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

/// Binary spatial relationship between a geometry column and a literal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialOp {
    /// Shares any point
    Intersects,
    /// Column contains the literal
    Contains,
    /// Column lies within the literal
    Within,
    /// Shares no point
    Disjoint,
    /// Boundaries touch, interiors do not
    Touches,
    /// Interiors cross
    Crosses,
    /// Same dimension, partially shared interior
    Overlaps,
    /// Topologically equal
    Equals,
}

impl SpatialOp {
    /// Every spatial relationship.
    pub const ALL: [SpatialOp; 8] = [
        SpatialOp::Intersects,
        SpatialOp::Contains,
        SpatialOp::Within,
        SpatialOp::Disjoint,
        SpatialOp::Touches,
        SpatialOp::Crosses,
        SpatialOp::Overlaps,
        SpatialOp::Equals,
    ];

    /// Name of the relationship as used in OGC function names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SpatialOp::Intersects => "Intersects",
            SpatialOp::Contains => "Contains",
            SpatialOp::Within => "Within",
            SpatialOp::Disjoint => "Disjoint",
            SpatialOp::Touches => "Touches",
            SpatialOp::Crosses => "Crosses",
            SpatialOp::Overlaps => "Overlaps",
            SpatialOp::Equals => "Equals",
        }
    }
}

/// A predicate over feature properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches everything
    Include,
    /// Matches nothing
    Exclude,
    /// All children match
    And(Vec<Filter>),
    /// Any child matches
    Or(Vec<Filter>),
    /// Child does not match
    Not(Box<Filter>),
    /// Property compared with a literal
    Compare {
        /// Property (column) name
        property: String,
        /// Operator
        op: ComparisonOp,
        /// Right hand side
        value: Literal,
    },
    /// Property is NULL
    IsNull(String),
    /// Property matches a SQL LIKE pattern
    Like {
        /// Property (column) name
        property: String,
        /// Pattern using `%` and `_` wildcards
        pattern: String,
    },
    /// Geometry property interacts with a bounding box
    Bbox {
        /// Geometry column name
        property: String,
        /// Box to test against
        envelope: Envelope,
        /// SRID of the box coordinates
        srid: Option<i32>,
    },
    /// Geometry property related to a literal geometry
    Spatial {
        /// Relationship to test
        op: SpatialOp,
        /// Geometry column name
        property: String,
        /// Literal geometry
        geometry: Geometry<f64>,
        /// SRID of the literal geometry
        srid: Option<i32>,
    },
}

impl Filter {
    /// `property = value`
    pub fn eq(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(property, ComparisonOp::Eq, value)
    }

    /// `property <op> value`
    pub fn compare(property: impl Into<String>, op: ComparisonOp, value: impl Into<Literal>) -> Self {
        Filter::Compare {
            property: property.into(),
            op,
            value: value.into(),
        }
    }

    /// Conjunction of the given filters.
    #[must_use]
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// Disjunction of the given filters.
    #[must_use]
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    /// Negation.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Bounding box test on a geometry column.
    pub fn bbox(property: impl Into<String>, envelope: Envelope, srid: Option<i32>) -> Self {
        Filter::Bbox {
            property: property.into(),
            envelope,
            srid,
        }
    }

    /// Spatial relationship test on a geometry column.
    pub fn spatial(
        op: SpatialOp,
        property: impl Into<String>,
        geometry: Geometry<f64>,
        srid: Option<i32>,
    ) -> Self {
        Filter::Spatial {
            op,
            property: property.into(),
            geometry,
            srid,
        }
    }
}

/// Renders [`Filter`]s as SQL for one engine.
///
/// Implementations that use placeholders collect the values to bind, in
/// placeholder order, and expose them through [`FilterToSql::bind_values`].
pub trait FilterToSql {
    /// Renders the predicate body, without the `WHERE` keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if a literal cannot be rendered (e.g. a geometry that
    /// fails to serialize).
    fn encode(&mut self, filter: &Filter) -> DialectResult<String>;

    /// Renders a complete `WHERE` clause.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`FilterToSql::encode`].
    fn encode_to_where(&mut self, filter: &Filter) -> DialectResult<String> {
        Ok(format!("WHERE {}", self.encode(filter)?))
    }

    /// Values to bind to the placeholders emitted so far.
    fn bind_values(&self) -> &[BindValue];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_to_bind_value() {
        assert_eq!(BindValue::from(&Literal::from(3_i64)), BindValue::Integer(3));
        assert_eq!(
            BindValue::from(&Literal::from("a")),
            BindValue::Text("a".to_string())
        );
        assert_eq!(BindValue::from(&Literal::Null), BindValue::Null);
    }

    #[test]
    fn constructors_build_expected_variants() {
        let f = Filter::and(vec![
            Filter::eq("name", "x"),
            Filter::not(Filter::IsNull("geom".to_string())),
        ]);
        match f {
            Filter::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[1], Filter::Not(_)));
            },
            other => panic!("unexpected filter {other:?}"),
        }
    }

    #[test]
    fn comparison_tokens() {
        assert_eq!(ComparisonOp::NotEq.as_sql(), "<>");
        assert_eq!(ComparisonOp::Ge.as_sql(), ">=");
    }
}
