//! Declarative schema files and JSON records
//!
//! Lets a record type be described in YAML instead of Rust code. Records are
//! JSON objects; scalar fields accept strings, numbers and booleans, repeated
//! fields accept arrays.

use crate::error::SheetResult;
use crate::schema::{ColumnAttr, Field, SheetSchema, SheetSettings};
use crate::types::Spreadsheet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Name of the row number member added by [`to_records`]
pub const ROW_KEY: &str = "_row";

/// A field declaration in a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub property: String,
    /// Header text; a field without one is not mapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeated: bool,
}

/// Root of a YAML schema file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub sheet: SheetSettings,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl SchemaFile {
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> SheetResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Bind every field to a JSON member accessor and extract the schema
    pub fn into_schema(self) -> SheetResult<SheetSchema<Value>> {
        let fields = self
            .fields
            .into_iter()
            .map(|spec| {
                let key = spec.property.clone();
                let field = if spec.repeated {
                    Field::repeated(spec.property, move |record: &Value| {
                        record.get(&key).and_then(json_list)
                    })
                } else {
                    Field::scalar(spec.property, move |record: &Value| {
                        record.get(&key).and_then(json_text)
                    })
                };
                match spec.column {
                    Some(name) => {
                        let attr = ColumnAttr::new(name);
                        field.column(if spec.required { attr.required() } else { attr })
                    }
                    None => field,
                }
            })
            .collect();

        SheetSchema::extract(self.sheet, fields)
    }
}

/// Text of a scalar JSON value; `null` is absent
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Texts of a JSON array; anything else writes nothing
fn json_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| json_text(item).unwrap_or_default())
            .collect()
    })
}

/// Turn read rows into JSON objects keyed by property name
///
/// Repeated properties become arrays; every object carries its row number
/// under [`ROW_KEY`].
pub fn to_records(sheet: &Spreadsheet, schema: &SheetSchema<Value>) -> Vec<Value> {
    let repeated = schema.repeated_column().map(|c| c.property_name.as_str());

    sheet
        .iter()
        .map(|row| {
            let mut record = Map::new();
            record.insert(ROW_KEY.to_string(), Value::from(row.number()));

            for cell in row.cells() {
                let value = Value::String(cell.value.clone());
                if Some(cell.property_name.as_str()) == repeated {
                    let list = record
                        .entry(cell.property_name.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(items) = list {
                        items.push(value);
                    }
                } else {
                    record.entry(cell.property_name.clone()).or_insert(value);
                }
            }

            Value::Object(record)
        })
        .collect()
}
