use std::path::PathBuf;
use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Spreadsheet file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Malformed header: column {column} has no name")]
    MalformedHeader { column: usize },

    #[error("Invalid row {row}: column {column} is empty and empty cells are not allowed")]
    InvalidRow { row: usize, column: usize },

    #[error("Required value missing in row {row}, column {column} ({column_name})")]
    RequiredValueMissing {
        row: usize,
        column: usize,
        column_name: String,
    },

    #[error("No column definitions: a record type without columns cannot be written")]
    NoColumnsDefined,

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid records: {0}")]
    InvalidRecords(String),

    #[error("Column index {0} is outside the worksheet grid")]
    ColumnOutOfRange(usize),

    #[error("Row index {0} is outside the worksheet grid")]
    RowOutOfRange(usize),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Xlsx read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetError {
    /// Short machine-readable name of the violation, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SheetError::FileNotFound(_) => "file_not_found",
            SheetError::MalformedHeader { .. } => "malformed_header",
            SheetError::InvalidRow { .. } => "invalid_row",
            SheetError::RequiredValueMissing { .. } => "required_value_missing",
            SheetError::NoColumnsDefined => "no_columns_defined",
            SheetError::InvalidSchema(_) => "invalid_schema",
            SheetError::InvalidRecords(_) => "invalid_records",
            SheetError::ColumnOutOfRange(_) | SheetError::RowOutOfRange(_) => "out_of_range",
            SheetError::Workbook(_) | SheetError::XlsxRead(_) => "workbook",
            SheetError::XlsxWrite(_) => "xlsx_write",
            SheetError::Io(_) => "io",
            SheetError::Yaml(_) => "yaml",
            SheetError::Json(_) => "json",
        }
    }
}
