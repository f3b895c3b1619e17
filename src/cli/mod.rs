//! CLI command handlers

pub mod commands;

pub use commands::{read, schema, write};
