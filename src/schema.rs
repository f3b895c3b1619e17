//! Column schema for record types
//!
//! A record type declares its sheet-level settings and, for every field in
//! declaration order, an optional column annotation plus a typed accessor.
//! [`SheetSchema::extract`] keeps the annotated fields and freezes them into
//! the ordered column list the reader and writer work from.

use crate::error::{SheetError, SheetResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Accessor producing the text of a single-valued field.
pub type ScalarAccessor<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Accessor producing every value of a multi-valued field.
pub type RepeatedAccessor<T> = Arc<dyn Fn(&T) -> Option<Vec<String>> + Send + Sync>;

//==============================================================================
// Declarations
//==============================================================================

/// Type-level sheet settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// Whether blank cells are tolerated in data rows
    pub empty_cells_allowed: bool,
    /// Zero-based column index from which every column maps to the repeated column
    pub repeated_from_column: Option<usize>,
}

impl SheetSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty_cells_allowed(mut self, allowed: bool) -> Self {
        self.empty_cells_allowed = allowed;
        self
    }

    pub fn repeated_from_column(mut self, column: usize) -> Self {
        self.repeated_from_column = Some(column);
        self
    }
}

/// Field-level column annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttr {
    pub column_name: String,
    pub required: bool,
}

impl ColumnAttr {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl From<&str> for ColumnAttr {
    fn from(column_name: &str) -> Self {
        ColumnAttr::new(column_name)
    }
}

impl From<String> for ColumnAttr {
    fn from(column_name: String) -> Self {
        ColumnAttr::new(column_name)
    }
}

/// How a column binds to its field
pub enum ColumnKind<T> {
    /// One cell per record
    Scalar(ScalarAccessor<T>),
    /// The trailing column: one cell per value, from the column's index onwards
    Repeated(RepeatedAccessor<T>),
}

impl<T> Clone for ColumnKind<T> {
    fn clone(&self) -> Self {
        match self {
            ColumnKind::Scalar(accessor) => ColumnKind::Scalar(Arc::clone(accessor)),
            ColumnKind::Repeated(accessor) => ColumnKind::Repeated(Arc::clone(accessor)),
        }
    }
}

impl<T> fmt::Debug for ColumnKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Scalar(_) => f.write_str("Scalar"),
            ColumnKind::Repeated(_) => f.write_str("Repeated"),
        }
    }
}

/// A declared field of a record type
pub struct Field<T> {
    property_name: String,
    column: Option<ColumnAttr>,
    kind: ColumnKind<T>,
}

impl<T> Field<T> {
    /// A single-valued field
    pub fn scalar<F>(property_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            property_name: property_name.into(),
            column: None,
            kind: ColumnKind::Scalar(Arc::new(accessor)),
        }
    }

    /// A multi-valued field, spread over the trailing columns of a row
    pub fn repeated<F>(property_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<Vec<String>> + Send + Sync + 'static,
    {
        Self {
            property_name: property_name.into(),
            column: None,
            kind: ColumnKind::Repeated(Arc::new(accessor)),
        }
    }

    /// Annotate the field with a column; unannotated fields are not mapped
    pub fn column(mut self, attr: impl Into<ColumnAttr>) -> Self {
        self.column = Some(attr.into());
        self
    }
}

/// A record type that can be read from and written to a sheet
///
/// ```
/// use sheetbind::schema::{Field, SheetRecord, SheetSettings};
///
/// struct Person {
///     name: String,
///     age: Option<u32>,
///     internal_id: u64,
/// }
///
/// impl SheetRecord for Person {
///     fn sheet_settings() -> SheetSettings {
///         SheetSettings::new().empty_cells_allowed(true)
///     }
///
///     fn fields() -> Vec<Field<Self>> {
///         vec![
///             Field::scalar("name", |p: &Person| Some(p.name.clone()))
///                 .column(sheetbind::schema::ColumnAttr::new("Name").required()),
///             Field::scalar("age", |p: &Person| p.age.map(|a| a.to_string())).column("Age"),
///             Field::scalar("internal_id", |p: &Person| Some(p.internal_id.to_string())),
///         ]
///     }
/// }
///
/// let schema = sheetbind::extract_schema::<Person>()?;
/// assert_eq!(schema.columns().len(), 2);
/// # Ok::<(), sheetbind::SheetError>(())
/// ```
pub trait SheetRecord: Sized {
    fn sheet_settings() -> SheetSettings {
        SheetSettings::default()
    }

    /// Every field of the type, in declaration order
    fn fields() -> Vec<Field<Self>>;
}

//==============================================================================
// Extracted schema
//==============================================================================

/// One mapped column
pub struct ColumnSchema<T> {
    pub property_name: String,
    pub column_name: String,
    pub required: bool,
    pub kind: ColumnKind<T>,
}

impl<T> ColumnSchema<T> {
    pub fn is_repeated(&self) -> bool {
        matches!(self.kind, ColumnKind::Repeated(_))
    }

    /// Case-insensitive header match
    pub fn matches_header(&self, header: &str) -> bool {
        self.column_name.to_lowercase() == header.to_lowercase()
    }
}

impl<T> Clone for ColumnSchema<T> {
    fn clone(&self) -> Self {
        Self {
            property_name: self.property_name.clone(),
            column_name: self.column_name.clone(),
            required: self.required,
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSchema")
            .field("property_name", &self.property_name)
            .field("column_name", &self.column_name)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered column schema plus sheet-level policies for a record type
pub struct SheetSchema<T> {
    settings: SheetSettings,
    columns: Vec<ColumnSchema<T>>,
}

impl<T> SheetSchema<T> {
    /// Keep the annotated fields, in order, and check the column invariants
    pub fn extract(settings: SheetSettings, fields: Vec<Field<T>>) -> SheetResult<Self> {
        let mut columns: Vec<ColumnSchema<T>> = Vec::new();

        for field in fields {
            let Some(attr) = field.column else {
                continue;
            };

            if field.property_name.is_empty() {
                return Err(SheetError::InvalidSchema(format!(
                    "column '{}' has no property name",
                    attr.column_name
                )));
            }
            if attr.column_name.is_empty() {
                return Err(SheetError::InvalidSchema(format!(
                    "property '{}' has an empty column name",
                    field.property_name
                )));
            }
            if let Some(previous) = columns.iter().find(|c| c.is_repeated()) {
                return Err(SheetError::InvalidSchema(format!(
                    "repeated column '{}' must be the last column, found '{}' after it",
                    previous.column_name, attr.column_name
                )));
            }

            columns.push(ColumnSchema {
                property_name: field.property_name,
                column_name: attr.column_name,
                required: attr.required,
                kind: field.kind,
            });
        }

        Ok(Self { settings, columns })
    }

    pub fn settings(&self) -> SheetSettings {
        self.settings
    }

    pub fn empty_cells_allowed(&self) -> bool {
        self.settings.empty_cells_allowed
    }

    pub fn repeated_from_column(&self) -> Option<usize> {
        self.settings.repeated_from_column
    }

    pub fn columns(&self) -> &[ColumnSchema<T>] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column flagged as repeated, if any
    pub fn repeated_column(&self) -> Option<&ColumnSchema<T>> {
        self.columns.iter().find(|c| c.is_repeated())
    }

    /// Index of the repeated column within the schema
    pub fn repeated_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.is_repeated())
    }

    /// First column whose name matches `header`, ignoring case
    pub fn find_column(&self, header: &str) -> Option<&ColumnSchema<T>> {
        self.columns.iter().find(|c| c.matches_header(header))
    }

    /// Column definition for sheet column `index` titled `header`.
    ///
    /// From `repeated_from_column` onwards every column uses the repeated
    /// definition; before it the header text decides.
    pub fn resolve(&self, index: usize, header: &str) -> Option<&ColumnSchema<T>> {
        match self.settings.repeated_from_column {
            Some(from) if index >= from => self.repeated_column(),
            _ => self.find_column(header),
        }
    }
}

impl<T> Clone for SheetSchema<T> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings,
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for SheetSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetSchema")
            .field("settings", &self.settings)
            .field("columns", &self.columns)
            .finish()
    }
}

/// Build the schema of a [`SheetRecord`] type
pub fn extract_schema<T: SheetRecord>() -> SheetResult<SheetSchema<T>> {
    SheetSchema::extract(T::sheet_settings(), T::fields())
}
