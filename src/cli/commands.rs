use crate::dynamic::{to_records, SchemaFile};
use crate::error::{SheetError, SheetResult};
use crate::excel::{SpreadsheetReader, SpreadsheetWriter};
use crate::schema::ColumnKind;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Execute the read command
pub fn read(
    input: PathBuf,
    schema: PathBuf,
    stop_on_error: bool,
    records: bool,
    output: Option<PathBuf>,
    verbose: bool,
) -> SheetResult<()> {
    eprintln!("{}", "📖 sheetbind - Read".bold().green());
    eprintln!("   Input:  {}", input.display());
    eprintln!("   Schema: {}\n", schema.display());

    let schema = SchemaFile::from_path(&schema)?.into_schema()?;
    if verbose {
        eprintln!("   {} mapped columns", schema.columns().len());
    }

    let sheet = SpreadsheetReader::new(&input)
        .stop_on_error(stop_on_error)
        .read(&schema)?;

    let json = if records {
        serde_json::to_string_pretty(&to_records(&sheet, &schema))?
    } else {
        serde_json::to_string_pretty(&sheet)?
    };

    match &output {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }

    eprintln!("{}", "✅ Read Complete!".bold().green());
    eprintln!("   Rows: {}", sheet.len());
    if let Some(path) = output {
        eprintln!("   JSON file: {}", path.display());
    }

    Ok(())
}

/// Execute the write command
pub fn write(
    input: PathBuf,
    schema: PathBuf,
    output: PathBuf,
    stop_on_error: bool,
    sheet_name: Option<String>,
    verbose: bool,
) -> SheetResult<()> {
    eprintln!("{}", "📊 sheetbind - Write".bold().green());
    eprintln!("   Input:  {}", input.display());
    eprintln!("   Output: {}\n", output.display());

    let schema = SchemaFile::from_path(&schema)?.into_schema()?;

    let content = fs::read_to_string(&input)?;
    let records: Vec<Value> = match serde_json::from_str(&content)? {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        _ => {
            return Err(SheetError::InvalidRecords(
                "records must be a JSON array of objects".to_string(),
            ))
        }
    };

    if verbose {
        eprintln!("   {} records, {} columns", records.len(), schema.columns().len());
    }

    let mut writer = SpreadsheetWriter::new().stop_on_error(stop_on_error);
    if let Some(name) = sheet_name {
        writer = writer.sheet_name(name);
    }
    writer.write_to_file(&records, &schema, &output)?;

    eprintln!("{}", "✅ Write Complete!".bold().green());
    eprintln!("   Records: {}", records.len());
    eprintln!("   Excel file: {}", output.display());

    Ok(())
}

/// Execute the schema command
pub fn schema(file: PathBuf) -> SheetResult<()> {
    let schema = SchemaFile::from_path(&file)?.into_schema()?;
    let settings = schema.settings();

    println!("{}", "🧾 sheetbind - Schema".bold().green());
    println!("   File: {}", file.display());
    println!("   Empty cells allowed: {}", settings.empty_cells_allowed);
    match settings.repeated_from_column {
        Some(column) => println!("   Repeated from column: {}\n", column),
        None => println!("   Repeated from column: -\n"),
    }

    for (idx, column) in schema.columns().iter().enumerate() {
        let kind = match column.kind {
            ColumnKind::Scalar(_) => "scalar",
            ColumnKind::Repeated(_) => "repeated",
        };
        let required = if column.required { "required" } else { "optional" };
        println!(
            "   {:>3}  {:<24} → {:<24} {} {}",
            idx,
            column.column_name.bright_blue(),
            column.property_name,
            kind,
            required
        );
    }

    Ok(())
}
