//! Excel read/write for schema-bound records
//!
//! - Read: first sheet of a workbook → [`Spreadsheet`](crate::types::Spreadsheet)
//! - Write: records → single-sheet xlsx blob

mod reader;
mod writer;

pub use reader::SpreadsheetReader;
pub use writer::SpreadsheetWriter;
