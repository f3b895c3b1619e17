//! Spreadsheet writer - typed records → single-sheet xlsx blob

use crate::error::{SheetError, SheetResult};
use crate::schema::{ColumnKind, ColumnSchema, SheetSchema};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, warn};

/// Writes records to a new workbook using a [`SheetSchema`]
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetWriter {
    stop_on_error: bool,
    sheet_name: Option<String>,
}

impl SpreadsheetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first violation instead of logging it and writing an empty cell
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    /// Worksheet name; the workbook default ("Sheet1") otherwise
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Serialize `records` to an in-memory xlsx file
    pub fn write<'a, T, I>(&self, records: I, schema: &SheetSchema<T>) -> SheetResult<Vec<u8>>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        if schema.is_empty() {
            return Err(SheetError::NoColumnsDefined);
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        if let Some(name) = &self.sheet_name {
            worksheet.set_name(name)?;
        }

        for (idx, column) in schema.columns().iter().enumerate() {
            worksheet.write_string(0, col_num(idx)?, &column.column_name)?;
        }

        let mut repeated_span = 0usize;
        let mut written = 0usize;

        for (record_idx, record) in records.into_iter().enumerate() {
            let number = record_idx + 1;
            let excel_row = row_num(number)?;

            for (idx, column) in schema.columns().iter().enumerate() {
                match &column.kind {
                    ColumnKind::Scalar(get) => {
                        let value = get(record);
                        self.check_value(value.is_some(), column, schema, number, idx)?;
                        if let Some(text) = value {
                            worksheet.write_string(excel_row, col_num(idx)?, text)?;
                        }
                    }
                    ColumnKind::Repeated(get) => {
                        let values = get(record);
                        // An empty list leaves the repeated column blank, same as no list
                        let present = values.as_ref().is_some_and(|v| !v.is_empty());
                        self.check_value(present, column, schema, number, idx)?;
                        let values = values.unwrap_or_default();
                        for (offset, text) in values.iter().enumerate() {
                            worksheet.write_string(excel_row, col_num(idx + offset)?, text)?;
                        }
                        repeated_span = repeated_span.max(values.len());
                    }
                }
            }
            written += 1;
        }

        extend_repeated_header(worksheet, schema, repeated_span)?;

        let buffer = workbook.save_to_buffer()?;
        debug!(rows = written, bytes = buffer.len(), "spreadsheet written");
        Ok(buffer)
    }

    /// Serialize `records` and save the result at `path`
    pub fn write_to_file<'a, T, I>(
        &self,
        records: I,
        schema: &SheetSchema<T>,
        path: &Path,
    ) -> SheetResult<()>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let buffer = self.write(records, schema)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }

    fn check_value<T>(
        &self,
        present: bool,
        column: &ColumnSchema<T>,
        schema: &SheetSchema<T>,
        row: usize,
        index: usize,
    ) -> SheetResult<()> {
        if present {
            return Ok(());
        }

        let violation = if column.required {
            SheetError::RequiredValueMissing {
                row,
                column: index,
                column_name: column.column_name.clone(),
            }
        } else if !schema.empty_cells_allowed() {
            SheetError::InvalidRow { row, column: index }
        } else {
            return Ok(());
        };

        if self.stop_on_error {
            return Err(violation);
        }
        warn!(
            row,
            column = index,
            kind = violation.kind(),
            "value missing, cell left empty"
        );
        Ok(())
    }
}

/// Title every extra column the repeated values spill into with the repeated column's name
fn extend_repeated_header<T>(
    worksheet: &mut Worksheet,
    schema: &SheetSchema<T>,
    span: usize,
) -> SheetResult<()> {
    let (Some(idx), Some(column)) = (schema.repeated_index(), schema.repeated_column()) else {
        return Ok(());
    };

    for offset in 1..span {
        worksheet.write_string(0, col_num(idx + offset)?, &column.column_name)?;
    }
    Ok(())
}

fn col_num(index: usize) -> SheetResult<ColNum> {
    ColNum::try_from(index).map_err(|_| SheetError::ColumnOutOfRange(index))
}

fn row_num(index: usize) -> SheetResult<RowNum> {
    RowNum::try_from(index).map_err(|_| SheetError::RowOutOfRange(index))
}
