//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting dialects, generated tables and decoded geometries.

use tabled::{Table, Tabled};

use geodialect_core::types::{GeometryInfo, TableInfo};
use geodialect_core_common::DialectInfo;

/// Table row representation for displaying dialect information.
#[derive(Tabled)]
pub struct DialectRow {
    /// Short identifier for the dialect (e.g., `Informix`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the dialect.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Support status for raw statements with inline literals.
    #[tabled(rename = "Basic")]
    pub basic: String,
    /// Support status for prepared statements.
    #[tabled(rename = "Prepared")]
    pub prepared: String,
    /// Support status for native paging.
    #[tabled(rename = "Limit/Offset")]
    pub limit_offset: String,
}

impl From<&DialectInfo> for DialectRow {
    fn from(d: &DialectInfo) -> Self {
        Self {
            short_name: d.short_name.to_string(),
            long_name: d.long_name.to_string(),
            basic: d.capabilities.basic.as_str().to_string(),
            prepared: d.capabilities.prepared.as_str().to_string(),
            limit_offset: d.capabilities.limit_offset.as_str().to_string(),
        }
    }
}

/// Table row representation for displaying a generated column.
#[derive(Tabled)]
pub struct ColumnRow {
    /// Name of the column.
    #[tabled(rename = "Column")]
    pub name: String,
    /// SQL type of the column.
    #[tabled(rename = "Type")]
    pub sql_type: String,
    /// Whether the column can contain null values.
    #[tabled(rename = "Nullable")]
    pub nullable: String,
    /// Spatial reference of geometry columns.
    #[tabled(rename = "SRID")]
    pub srid: String,
}

/// Display dialects in a formatted table.
pub fn display_dialects(dialects: &[DialectInfo]) {
    println!("\nAvailable Dialects ({} total):\n", dialects.len());
    let rows: Vec<DialectRow> = dialects.iter().map(DialectRow::from).collect();
    println!("{}", Table::new(rows));
}

/// Display the columns of a generated table followed by the statements that
/// create it.
pub fn display_table_info(info: &TableInfo, statements: &[String]) {
    match &info.schema {
        Some(schema) => println!("\nTable: {schema}.{}", info.table),
        None => println!("\nTable: {}", info.table),
    }
    if let Some(pk) = &info.primary_key {
        println!("Primary key: {pk}");
    }

    if !info.columns.is_empty() {
        println!("\n=== Columns ===");
        let rows: Vec<ColumnRow> = info
            .columns
            .iter()
            .map(|c| ColumnRow {
                name: c.name.clone(),
                sql_type: c.sql_type.clone(),
                nullable: if c.nullable { "Yes" } else { "No" }.to_string(),
                srid: match (c.geometry, c.srid) {
                    (true, Some(srid)) => srid.to_string(),
                    (true, None) => "unknown".to_string(),
                    (false, _) => String::new(),
                },
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    println!("\n=== Statements ===");
    for sql in statements {
        println!("{sql};");
    }
}

/// Display a decoded geometry.
pub fn display_geometry_info(info: &GeometryInfo) {
    println!("Type: {}", info.geometry_type);
    println!("WKT: {}", info.wkt);
    println!(
        "Envelope: {}",
        info.envelope.as_deref().unwrap_or("empty")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodialect_core::types::ColumnInfo;
    use geodialect_core_common::SupportStatus;

    #[test]
    fn dialect_row_from_info() {
        let info = DialectInfo::new(
            "Test",
            "Test dialect",
            SupportStatus::Supported,
            SupportStatus::Planned,
            SupportStatus::NotSupported,
        );
        let row = DialectRow::from(&info);
        assert_eq!(row.short_name, "Test");
        assert_eq!(row.prepared, "Planned");
        assert_eq!(row.limit_offset, "Not Supported");
    }

    #[test]
    fn table_rendering_has_headers() {
        let rows = vec![ColumnRow {
            name: "geom".to_string(),
            sql_type: "ST_POINT".to_string(),
            nullable: "No".to_string(),
            srid: "4326".to_string(),
        }];
        let table = Table::new(rows).to_string();
        assert!(table.contains("Column"));
        assert!(table.contains("ST_POINT"));
    }

    #[test]
    fn display_functions_accept_empty_input() {
        display_dialects(&[]);
        display_table_info(
            &TableInfo {
                table: "t".to_string(),
                schema: None,
                primary_key: None,
                columns: vec![ColumnInfo {
                    name: "a".to_string(),
                    sql_type: "INT".to_string(),
                    nullable: true,
                    geometry: false,
                    srid: None,
                }],
            },
            &[],
        );
        display_geometry_info(&GeometryInfo {
            geometry_type: "Point".to_string(),
            wkt: "POINT EMPTY".to_string(),
            envelope: None,
        });
    }
}
