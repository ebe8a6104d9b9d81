//! Export module for budgetbook
//!
//! - JSON: the full data set, re-importable
//! - CSV: transactions only, for spreadsheets

pub mod csv;
pub mod json;

pub use self::csv::export_transactions_csv;
pub use json::{default_file_name, export_json, ExportDocument, EXPORT_VERSION};
