//! sheetbind - typed spreadsheet ingestion and export
//!
//! Binds the columns of a single-sheet workbook to the fields of a record
//! type. The record type declares which fields map to which header, which
//! values are required, and whether a trailing run of columns collapses into
//! one multi-valued field.
//!
//! # Features
//!
//! - Case-insensitive header matching against an ordered column schema
//! - Required values and blank-cell policy, enforced per call
//! - Fail-fast (`stop_on_error`) or best-effort reading and writing
//! - Repeated trailing columns for variable-width rows
//! - YAML schema files and JSON records for untyped use
//!
//! # Example
//!
//! ```no_run
//! use sheetbind::excel::SpreadsheetReader;
//! use sheetbind::schema::{ColumnAttr, Field, SheetRecord};
//!
//! struct Person {
//!     name: String,
//! }
//!
//! impl SheetRecord for Person {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![Field::scalar("name", |p: &Person| Some(p.name.clone()))
//!             .column(ColumnAttr::new("Name").required())]
//!     }
//! }
//!
//! let schema = sheetbind::extract_schema::<Person>()?;
//! let sheet = SpreadsheetReader::new("people.xlsx")
//!     .stop_on_error(true)
//!     .read(&schema)?;
//!
//! for row in &sheet {
//!     println!("{}: {:?}", row.number(), row.value("name"));
//! }
//! # Ok::<(), sheetbind::SheetError>(())
//! ```

pub mod cli;
pub mod dynamic;
pub mod error;
pub mod excel;
pub mod handler;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use handler::{read_spreadsheet, write_spreadsheet, write_spreadsheet_file};
pub use schema::{extract_schema, ColumnAttr, Field, SheetRecord, SheetSchema, SheetSettings};
pub use types::{Cell, Row, Spreadsheet};
