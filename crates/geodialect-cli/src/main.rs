//! Command-line interface for `geodialect`, the spatial SQL dialect toolkit.
//!
//! This binary exposes the [`geodialect_core`] library so the SQL a dialect
//! generates can be inspected without a database: paging rewrites, geometry
//! literals and placeholders, decoded WKB values and complete table DDL.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for
//! structured logging. It parses arguments, configures logging, and delegates
//! to command handlers.
//!
//! # Available Commands
//!
//! - `dialects` - List the registered dialects and their capabilities
//! - `paginate` - Apply a limit and offset to a SELECT statement
//! - `encode` - Write a geometry as a SQL literal or bound placeholder
//! - `decode` - Read a hex encoded WKB value
//! - `ddl` - Print the statements that create a feature table

mod display;
mod dry_run;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use hex::FromHexError;
use tracing::{Level, debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geodialect_core::GeoDialectError;
use geodialect_core::dialects::{basic_dialect, get_available_dialects, prepared_dialect};
use geodialect_core::operations;
use geodialect_core::types::GeometryInfo;
use geodialect_core_common::{ColumnDescriptor, FeatureType, GeometryType};
use geodialect_informix::codec;

use crate::dry_run::DryRunConnection;

const DEFAULT_DIALECT: &str = "Informix";

#[derive(Parser)]
#[command(
    name = "geodialect",
    version,
    about = "Inspect the spatial SQL generated by geodialect dialects",
    long_about = "geodialect translates feature store operations into engine specific spatial SQL.\n\
                  This tool shows the statements a dialect produces without connecting to a database."
)]
/// Command-line arguments and options for the `geodialect` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `geodialect` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Lists all registered dialects and their capabilities.
    Dialects,

    /// Applies a limit and offset to a SELECT statement.
    Paginate {
        /// The SELECT statement to rewrite.
        #[arg(value_name = "SQL")]
        sql: String,

        /// Maximum number of rows to return.
        #[arg(short, long)]
        limit: Option<u64>,

        /// Number of rows to skip.
        #[arg(short, long, default_value_t = 0)]
        offset: u64,

        /// Dialect to generate SQL for.
        #[arg(long, default_value = DEFAULT_DIALECT)]
        dialect: String,
    },

    /// Writes a geometry the way a dialect embeds it in INSERT and UPDATE
    /// statements.
    Encode {
        /// Geometry as well-known text (e.g., "POINT (10 20)").
        #[arg(short, long)]
        wkt: String,

        /// Spatial reference identifier of the geometry.
        #[arg(short, long)]
        srid: Option<i32>,

        /// Emit a placeholder and the WKB bound to it instead of a literal.
        #[arg(short, long)]
        prepared: bool,

        /// Dialect to generate SQL for.
        #[arg(long, default_value = DEFAULT_DIALECT)]
        dialect: String,
    },

    /// Decodes a hex encoded WKB value, as returned by a geometry column.
    Decode {
        /// WKB bytes as hexadecimal, optionally prefixed with `0x`.
        #[arg(long, value_name = "HEX")]
        hex: String,
    },

    /// Prints the statements that create a feature table.
    Ddl {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Schema the table is created in.
        #[arg(long)]
        schema: Option<String>,

        /// Generated primary key column.
        #[arg(long, value_name = "COLUMN")]
        primary_key: Option<String>,

        /// Attribute column as NAME:TYPE[:LENGTH] (e.g., "name:VARCHAR:80").
        #[arg(long = "column", value_name = "SPEC", value_parser = parse_attribute)]
        columns: Vec<ColumnDescriptor>,

        /// Geometry column as NAME:KIND[:SRID] (e.g., "geom:Point:4326").
        #[arg(long = "geometry", value_name = "SPEC", value_parser = parse_geometry)]
        geometries: Vec<ColumnDescriptor>,

        /// Column that must not be NULL. May be repeated.
        #[arg(long = "required", value_name = "COLUMN")]
        required: Vec<String>,

        /// Dialect to generate SQL for.
        #[arg(long, default_value = DEFAULT_DIALECT)]
        dialect: String,
    },
}

/// Entry point for the `geodialect` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot
/// be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(err) = run(cli.command) {
        if let Some(err) = err.downcast_ref::<GeoDialectError>() {
            eprintln!("Error: {}", err.user_message());
            if let Some(suggestion) = err.recovery_suggestion() {
                eprintln!("\n{suggestion}");
            }
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Dialects => handle_dialects(),
        Commands::Paginate {
            sql,
            limit,
            offset,
            dialect,
        } => {
            println!("{}", handle_paginate(&dialect, &sql, limit, offset)?);
            Ok(())
        },
        Commands::Encode {
            wkt,
            srid,
            prepared,
            dialect,
        } => {
            for line in handle_encode(&dialect, &wkt, srid, prepared)? {
                println!("{line}");
            }
            Ok(())
        },
        Commands::Decode { hex } => {
            match handle_decode(&hex)? {
                Some(info) => display::display_geometry_info(&info),
                None => println!("NULL"),
            }
            Ok(())
        },
        Commands::Ddl {
            table,
            schema,
            primary_key,
            columns,
            geometries,
            required,
            dialect,
        } => {
            let feature_type =
                build_feature_type(&table, primary_key, columns, geometries, &required)?;
            handle_ddl(&dialect, schema.as_deref(), &feature_type)
        },
    }
}

#[allow(clippy::unnecessary_wraps)] // Keeps the handler signatures uniform
fn handle_dialects() -> Result<()> {
    display::display_dialects(&get_available_dialects());
    Ok(())
}

fn handle_paginate(
    dialect_name: &str,
    sql: &str,
    limit: Option<u64>,
    offset: u64,
) -> Result<String> {
    let dialect = basic_dialect(dialect_name).map_err(GeoDialectError::from)?;
    info!("Paging with limit {limit:?} and offset {offset}");
    let mut sql = sql.trim().to_string();
    if dialect.is_limit_offset_supported() {
        dialect
            .apply_limit_offset(&mut sql, limit, offset)
            .map_err(GeoDialectError::from)?;
    } else {
        bail!("Dialect '{dialect_name}' cannot page natively");
    }
    Ok(sql)
}

fn handle_encode(
    dialect_name: &str,
    wkt: &str,
    srid: Option<i32>,
    prepared: bool,
) -> Result<Vec<String>> {
    let geometry = codec::parse_wkt(wkt).map_err(GeoDialectError::from)?;
    debug!("Parsed {} geometry", GeometryType::of(&geometry));

    let mut sql = String::new();
    if prepared {
        let dialect = prepared_dialect(dialect_name).map_err(GeoDialectError::from)?;
        dialect.prepare_geometry_value(Some(&geometry), srid, &mut sql);
        let wkb = codec::encode_wkb(&geometry).map_err(GeoDialectError::from)?;
        Ok(vec![sql, format!("-- ?1 = {}", to_hex(&wkb))])
    } else {
        let dialect = basic_dialect(dialect_name).map_err(GeoDialectError::from)?;
        dialect
            .encode_geometry_value(Some(&geometry), srid, &mut sql)
            .map_err(GeoDialectError::from)?;
        Ok(vec![sql])
    }
}

fn handle_decode(hex: &str) -> Result<Option<GeometryInfo>> {
    let bytes = parse_hex(hex)?;
    // empty input stands for SQL NULL
    let value = (!bytes.is_empty()).then_some(bytes.as_slice());
    let Some(geometry) = codec::decode(value).map_err(GeoDialectError::from)? else {
        return Ok(None);
    };
    let envelope = codec::decode_envelope(&bytes).map_err(GeoDialectError::from)?;
    Ok(Some(GeometryInfo {
        geometry_type: GeometryType::of(&geometry).to_string(),
        wkt: codec::wkt(&geometry),
        envelope: (!envelope.is_null()).then(|| envelope.to_string()),
    }))
}

fn handle_ddl(dialect_name: &str, schema: Option<&str>, feature_type: &FeatureType) -> Result<()> {
    let dialect = basic_dialect(dialect_name).map_err(GeoDialectError::from)?;
    let conn = DryRunConnection::new();
    operations::create_schema(&*dialect, schema, feature_type, &conn)?;
    let info = operations::describe_table(&*dialect, schema, feature_type);
    display::display_table_info(&info, &conn.into_statements());
    Ok(())
}

fn build_feature_type(
    table: &str,
    primary_key: Option<String>,
    columns: Vec<ColumnDescriptor>,
    geometries: Vec<ColumnDescriptor>,
    required: &[String],
) -> Result<FeatureType> {
    let mut feature_type = FeatureType::new(table);
    feature_type.primary_key = primary_key;
    feature_type.columns = columns.into_iter().chain(geometries).collect();

    for name in required {
        let column = feature_type
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Required column '{name}' is not declared"))?;
        column.nullable = false;
    }
    Ok(feature_type)
}

/// Parses `NAME:TYPE[:LENGTH]`.
fn parse_attribute(spec: &str) -> Result<ColumnDescriptor, String> {
    let mut parts = spec.split(':');
    let (Some(name), Some(sql_type)) = (parts.next(), parts.next()) else {
        return Err(format!("expected NAME:TYPE[:LENGTH], got '{spec}'"));
    };
    if name.is_empty() || sql_type.is_empty() {
        return Err(format!("expected NAME:TYPE[:LENGTH], got '{spec}'"));
    }
    let column = ColumnDescriptor::attribute(name, sql_type.to_uppercase(), true);
    match (parts.next(), parts.next()) {
        (None, _) => Ok(column),
        (Some(length), None) => length
            .parse::<u32>()
            .map(|length| column.with_length(length))
            .map_err(|e| format!("invalid length '{length}': {e}")),
        (Some(_), Some(_)) => Err(format!("too many parts in '{spec}'")),
    }
}

/// Parses `NAME:KIND[:SRID]`.
fn parse_geometry(spec: &str) -> Result<ColumnDescriptor, String> {
    let mut parts = spec.split(':');
    let (Some(name), Some(kind)) = (parts.next(), parts.next()) else {
        return Err(format!("expected NAME:KIND[:SRID], got '{spec}'"));
    };
    let geometry_type = GeometryType::ALL
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(kind))
        .ok_or_else(|| {
            let kinds: Vec<_> = GeometryType::ALL.iter().map(GeometryType::as_str).collect();
            format!("unknown geometry kind '{kind}', expected one of {}", kinds.join(", "))
        })?;
    let srid = match (parts.next(), parts.next()) {
        (None, _) => None,
        (Some(srid), None) => Some(
            srid.parse::<i32>()
                .map_err(|e| format!("invalid srid '{srid}': {e}"))?,
        ),
        (Some(_), Some(_)) => return Err(format!("too many parts in '{spec}'")),
    };
    if name.is_empty() {
        return Err(format!("missing column name in '{spec}'"));
    }
    Ok(ColumnDescriptor::geometry(name, geometry_type, srid, true))
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let digits: String = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    hex::decode(&digits).map_err(|err| match err {
        FromHexError::InvalidHexCharacter { c, .. } => anyhow!("Invalid hex digit '{c}'"),
        FromHexError::OddLength => anyhow!("Hex input has an odd number of digits"),
        other => anyhow!("Invalid hex input: {other}"),
    })
}

fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}
