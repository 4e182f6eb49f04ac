//! # gridcalc-csv
//!
//! CSV reader and writer for gridcalc.
//!
//! Fields starting with `=` load as formula cells, so a set of CSV files can
//! serve as a small workbook for the formula engine.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
