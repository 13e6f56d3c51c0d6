//! Table and column descriptions handed to dialects for DDL generation.

use crate::geometry::GeometryType;

/// What a column stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// A spatial column
    Geometry {
        /// Geometry kind accepted by the column
        geometry_type: GeometryType,
        /// Coordinate reference system, when known
        srid: Option<i32>,
    },
    /// A plain attribute column
    Attribute {
        /// SQL type name as understood by the target engine
        sql_type: String,
        /// Optional length, for character types
        length: Option<u32>,
    },
}

/// Description of a single column of a feature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// What the column stores
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Creates a spatial column description.
    #[must_use]
    pub fn geometry(
        name: impl Into<String>,
        geometry_type: GeometryType,
        srid: Option<i32>,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            nullable,
            kind: ColumnKind::Geometry {
                geometry_type,
                srid,
            },
        }
    }

    /// Creates an attribute column description.
    #[must_use]
    pub fn attribute(name: impl Into<String>, sql_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            nullable,
            kind: ColumnKind::Attribute {
                sql_type: sql_type.into(),
                length: None,
            },
        }
    }

    /// Sets the length of an attribute column. Has no effect on spatial columns.
    #[must_use]
    pub fn with_length(mut self, value: u32) -> Self {
        if let ColumnKind::Attribute { length, .. } = &mut self.kind {
            *length = Some(value);
        }
        self
    }

    /// Returns the geometry kind if this is a spatial column.
    #[must_use]
    pub fn geometry_type(&self) -> Option<GeometryType> {
        match self.kind {
            ColumnKind::Geometry { geometry_type, .. } => Some(geometry_type),
            ColumnKind::Attribute { .. } => None,
        }
    }

    /// Returns `true` for spatial columns.
    #[must_use]
    pub fn is_geometry(&self) -> bool {
        self.geometry_type().is_some()
    }
}

/// A feature table: its name, columns and generated primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureType {
    /// Table name
    pub name: String,
    /// Column of the generated primary key, if any
    pub primary_key: Option<String>,
    /// Non key columns, in declaration order
    pub columns: Vec<ColumnDescriptor>,
}

impl FeatureType {
    /// Creates an empty feature type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            columns: Vec::new(),
        }
    }

    /// Sets the generated primary key column.
    #[must_use]
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Iterates over the spatial columns.
    pub fn geometry_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_geometry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let ft = FeatureType::new("roads")
            .with_primary_key("fid")
            .with_column(ColumnDescriptor::attribute("name", "VARCHAR", true).with_length(64))
            .with_column(ColumnDescriptor::geometry(
                "geom",
                GeometryType::LineString,
                Some(4326),
                false,
            ));

        assert_eq!(ft.primary_key.as_deref(), Some("fid"));
        let names: Vec<_> = ft.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["name", "geom"]);
        assert_eq!(ft.geometry_columns().count(), 1);
    }

    #[test]
    fn length_only_applies_to_attributes() {
        let geom = ColumnDescriptor::geometry("g", GeometryType::Point, None, true).with_length(3);
        assert!(matches!(geom.kind, ColumnKind::Geometry { .. }));

        let name = ColumnDescriptor::attribute("n", "CHAR", true).with_length(3);
        assert_eq!(
            name.kind,
            ColumnKind::Attribute {
                sql_type: "CHAR".to_string(),
                length: Some(3)
            }
        );
    }
}
