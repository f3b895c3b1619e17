use serde::Serialize;

//==============================================================================
// Read result
//==============================================================================

/// A cell bound to a column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Header text as found in the sheet
    pub column_name: String,
    pub property_name: String,
    pub value: String,
    pub required: bool,
}

/// A data row; `number` is 1-based with the header row excluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    number: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(number: usize) -> Self {
        Self {
            number,
            cells: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Value of the first cell bound to `property_name`
    pub fn value(&self, property_name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.property_name == property_name)
            .map(|c| c.value.as_str())
    }

    /// Values of every cell bound to `property_name`, in column order
    pub fn values(&self, property_name: &str) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| c.property_name == property_name)
            .map(|c| c.value.as_str())
            .collect()
    }
}

/// Rows read from the first sheet of a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Spreadsheet {
    rows: Vec<Row>,
}

impl Spreadsheet {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Spreadsheet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Accumulates rows during a single pass over a sheet
#[derive(Debug, Default)]
pub(crate) struct SpreadsheetBuilder {
    rows: Vec<Row>,
}

impl SpreadsheetBuilder {
    pub(crate) fn begin_row(&mut self, number: usize) {
        self.rows.push(Row::new(number));
    }

    /// Append to the row begun last
    pub(crate) fn push_cell(&mut self, cell: Cell) {
        if let Some(row) = self.rows.last_mut() {
            row.push(cell);
        }
    }

    pub(crate) fn finish(self) -> Spreadsheet {
        Spreadsheet { rows: self.rows }
    }
}
