//! Typed entry points: the schema comes from the record type itself

use crate::error::SheetResult;
use crate::excel::{SpreadsheetReader, SpreadsheetWriter};
use crate::schema::{extract_schema, SheetRecord};
use crate::types::Spreadsheet;
use std::path::Path;

/// Read the spreadsheet at `path` with the schema declared by `T`
pub fn read_spreadsheet<T: SheetRecord>(
    path: &Path,
    stop_on_error: bool,
) -> SheetResult<Spreadsheet> {
    let schema = extract_schema::<T>()?;
    SpreadsheetReader::new(path)
        .stop_on_error(stop_on_error)
        .read(&schema)
}

/// Write `records` to an in-memory xlsx blob with the schema declared by `T`
pub fn write_spreadsheet<T: SheetRecord>(
    records: &[T],
    stop_on_error: bool,
) -> SheetResult<Vec<u8>> {
    let schema = extract_schema::<T>()?;
    SpreadsheetWriter::new()
        .stop_on_error(stop_on_error)
        .write(records, &schema)
}

/// Write `records` to an xlsx file at `path`
pub fn write_spreadsheet_file<T: SheetRecord>(
    records: &[T],
    path: &Path,
    stop_on_error: bool,
) -> SheetResult<()> {
    let schema = extract_schema::<T>()?;
    SpreadsheetWriter::new()
        .stop_on_error(stop_on_error)
        .write_to_file(records, &schema, path)
}
