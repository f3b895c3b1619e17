//! Spreadsheet reader - first sheet of a workbook → rows of bound cells

use crate::error::{SheetError, SheetResult};
use crate::schema::SheetSchema;
use crate::types::{Cell, Spreadsheet, SpreadsheetBuilder};
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Physical index of the header row
const HEADER_ROW: u32 = 0;

/// Reads a workbook's first sheet against a [`SheetSchema`]
pub struct SpreadsheetReader {
    path: PathBuf,
    stop_on_error: bool,
}

impl SpreadsheetReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            stop_on_error: false,
        }
    }

    /// Abort on the first violation instead of logging it and carrying on
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    /// Read the file at the reader's path
    pub fn read<T>(&self, schema: &SheetSchema<T>) -> SheetResult<Spreadsheet> {
        if !self.path.is_file() {
            return Err(SheetError::FileNotFound(self.path.clone()));
        }

        let range = {
            let mut workbook = open_workbook_auto(&self.path)?;
            workbook.worksheet_range_at(0).transpose()?
        };

        match range {
            Some(range) => self.read_range(&range, schema),
            None => {
                debug!(path = %self.path.display(), "workbook has no sheets");
                Ok(Spreadsheet::default())
            }
        }
    }

    /// Read an in-memory xlsx blob; the reader's path is not consulted
    pub fn read_bytes<T>(
        &self,
        bytes: &[u8],
        schema: &SheetSchema<T>,
    ) -> SheetResult<Spreadsheet> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        match workbook.worksheet_range_at(0).transpose()? {
            Some(range) => self.read_range(&range, schema),
            None => Ok(Spreadsheet::default()),
        }
    }

    /// Apply the header, blank-cell, required and repeated-column rules to a loaded sheet
    pub fn read_range<T>(
        &self,
        range: &Range<Data>,
        schema: &SheetSchema<T>,
    ) -> SheetResult<Spreadsheet> {
        let Some((last_row, last_col)) = range.end() else {
            return Ok(Spreadsheet::default());
        };

        let Some(column_names) = self.read_header(range, last_col)? else {
            return Ok(Spreadsheet::default());
        };
        let width = column_names.len();

        let mut builder = SpreadsheetBuilder::default();

        for r in (HEADER_ROW + 1)..=last_row {
            let number = (r - HEADER_ROW) as usize;

            // Blank cells contribute no entry
            let values: BTreeMap<usize, String> = (0..width)
                .filter_map(|col| cell_text(range, r, col).map(|text| (col, text)))
                .collect();

            if values.values().all(|v| is_blank_value(v)) {
                debug!(row = number, "skipping empty row");
                continue;
            }

            if !schema.empty_cells_allowed() {
                if let Some(column) = (0..width).find(|col| !values.contains_key(col)) {
                    let violation = SheetError::InvalidRow {
                        row: number,
                        column,
                    };
                    if self.stop_on_error {
                        return Err(violation);
                    }
                    warn!(
                        row = number,
                        column,
                        kind = violation.kind(),
                        "row contains empty cells, reading it anyway"
                    );
                }
            }

            builder.begin_row(number);

            for (i, header) in column_names.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }

                let Some(definition) = schema.resolve(i, header) else {
                    debug!(
                        row = number,
                        column = i,
                        header = %header,
                        "no matching definition found"
                    );
                    continue;
                };

                let value = values.get(&i).cloned().unwrap_or_default();

                if definition.required && is_blank_value(&value) {
                    let violation = SheetError::RequiredValueMissing {
                        row: number,
                        column: i,
                        column_name: header.clone(),
                    };
                    if self.stop_on_error {
                        return Err(violation);
                    }
                    warn!(
                        row = number,
                        column = i,
                        kind = violation.kind(),
                        "required value missing, cell skipped"
                    );
                    continue;
                }

                builder.push_cell(Cell {
                    column_name: header.clone(),
                    property_name: definition.property_name.clone(),
                    value,
                    required: definition.required,
                });
            }
        }

        Ok(builder.finish())
    }

    /// Column names by index, up to the last titled column.
    ///
    /// `None` means the header row is entirely blank and there is nothing to bind.
    fn read_header(
        &self,
        range: &Range<Data>,
        last_col: u32,
    ) -> SheetResult<Option<Vec<String>>> {
        let titles: Vec<Option<String>> = (0..=last_col as usize)
            .map(|col| cell_text(range, HEADER_ROW, col))
            .collect();

        let Some(width) = titles.iter().rposition(Option::is_some).map(|i| i + 1) else {
            if self.stop_on_error {
                return Err(SheetError::MalformedHeader { column: 0 });
            }
            error!(kind = "malformed_header", "header row is empty, nothing read");
            return Ok(None);
        };

        let mut column_names = Vec::with_capacity(width);
        for (column, title) in titles.into_iter().take(width).enumerate() {
            match title {
                Some(name) => column_names.push(name),
                None => {
                    if self.stop_on_error {
                        return Err(SheetError::MalformedHeader { column });
                    }
                    error!(
                        column,
                        kind = "malformed_header",
                        "header cell is empty, column is skipped"
                    );
                    column_names.push(String::new());
                }
            }
        }

        Ok(Some(column_names))
    }
}

/// Text of the cell at an absolute position; `None` for absent or empty cells
fn cell_text(range: &Range<Data>, row: u32, col: usize) -> Option<String> {
    let col = u32::try_from(col).ok()?;
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => None,
        Some(data) => Some(data.to_string()),
    }
}

fn is_blank_value(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnAttr, Field, SheetSettings};

    fn sheet(rows: &[&[&str]]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String(text.to_string()));
                }
            }
        }
        range
    }

    fn people(settings: SheetSettings) -> SheetSchema<()> {
        SheetSchema::extract(
            settings,
            vec![
                Field::scalar("name", |_: &()| None).column(ColumnAttr::new("Name").required()),
                Field::scalar("age", |_: &()| None).column("Age"),
            ],
        )
        .unwrap()
    }

    fn reader(stop_on_error: bool) -> SpreadsheetReader {
        SpreadsheetReader::new("unused.xlsx").stop_on_error(stop_on_error)
    }

    #[test]
    fn test_cell_text() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 4));
        range.set_value((0, 0), Data::String("abc".to_string()));
        range.set_value((0, 1), Data::Float(42.0));
        range.set_value((0, 2), Data::Int(7));
        range.set_value((0, 3), Data::Bool(true));

        assert_eq!(cell_text(&range, 0, 0), Some("abc".to_string()));
        assert_eq!(cell_text(&range, 0, 1), Some("42".to_string()));
        assert_eq!(cell_text(&range, 0, 2), Some("7".to_string()));
        assert_eq!(cell_text(&range, 0, 3), Some("true".to_string()));
        assert_eq!(cell_text(&range, 0, 4), None);
        assert_eq!(cell_text(&range, 5, 0), None);
    }

    #[test]
    fn test_blank_value() {
        assert!(is_blank_value(""));
        assert!(is_blank_value("  \t"));
        assert!(!is_blank_value(" x "));
    }

    #[test]
    fn test_rows_numbered_from_one() {
        let range = sheet(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "41"]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows()[0].number(), 1);
        assert_eq!(result.rows()[0].value("name"), Some("Alice"));
        assert_eq!(result.rows()[1].number(), 2);
        assert_eq!(result.rows()[1].value("age"), Some("41"));
    }

    #[test]
    fn test_blank_rows_keep_source_numbering() {
        let range = sheet(&[&["Name", "Age"], &["Alice", "30"], &["", ""], &["Carol", "25"]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        let numbers: Vec<usize> = result.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_whitespace_only_row_is_skipped() {
        let range = sheet(&[&["Name", "Age"], &["  ", " "]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_header_only_is_empty() {
        let range = sheet(&[&["Name", "Age"]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_range_is_empty() {
        let range: Range<Data> = Range::empty();
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_blank_cell_disallowed_stops() {
        let range = sheet(&[&["Name", "Age"], &["Alice", ""]]);
        let err = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap_err();

        assert!(matches!(err, SheetError::InvalidRow { row: 1, column: 1 }));
    }

    #[test]
    fn test_blank_cell_disallowed_best_effort_reads_row() {
        let range = sheet(&[&["Name", "Age"], &["Alice", ""]]);
        let result = reader(false)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].value("name"), Some("Alice"));
        assert_eq!(result.rows()[0].value("age"), Some(""));
    }

    #[test]
    fn test_required_missing_best_effort_skips_cell() {
        let range = sheet(&[&["Name", "Age"], &["", "30"], &["Bob", "41"]]);
        let settings = SheetSettings::new().empty_cells_allowed(true);
        let result = reader(false).read_range(&range, &people(settings)).unwrap();

        assert_eq!(result.len(), 2);
        let first = &result.rows()[0];
        assert_eq!(first.cells().len(), 1);
        assert_eq!(first.value("name"), None);
        assert_eq!(first.value("age"), Some("30"));
    }

    #[test]
    fn test_unmatched_columns_are_ignored() {
        let range = sheet(&[&["Name", "Colour", "AGE"], &["Alice", "red", "30"]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        let row = &result.rows()[0];
        assert_eq!(row.cells().len(), 2);
        assert_eq!(row.cells()[1].column_name, "AGE");
        assert_eq!(row.cells()[1].property_name, "age");
    }

    #[test]
    fn test_blank_header_stops() {
        let range = sheet(&[&["Name", "", "Age"], &["Alice", "x", "30"]]);
        let err = reader(true)
            .read_range(&range, &people(SheetSettings::new().empty_cells_allowed(true)))
            .unwrap_err();

        assert!(matches!(err, SheetError::MalformedHeader { column: 1 }));
    }

    #[test]
    fn test_blank_header_row_best_effort_is_empty() {
        let range = sheet(&[&["", ""], &["Alice", "30"]]);
        let result = reader(false)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();
        assert!(result.is_empty());

        assert!(reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .is_err());
    }

    #[test]
    fn test_values_beyond_header_are_ignored() {
        let range = sheet(&[&["Name", "Age"], &["Alice", "30", "extra"]]);
        let result = reader(true)
            .read_range(&range, &people(SheetSettings::default()))
            .unwrap();

        assert_eq!(result.rows()[0].cells().len(), 2);
    }
}
