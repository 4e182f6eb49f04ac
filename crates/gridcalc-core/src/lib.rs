//! # gridcalc-core
//!
//! Core data structures for the gridcalc spreadsheet library.
//!
//! This crate provides the document model the formula engine reads from:
//! - [`CellValue`] - Represents cell values (numbers, strings, booleans, errors, formulas)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`Workbook`], [`Worksheet`] - The main document structures
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{Workbook, CellValue};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! // Using string addresses
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//!
//! // Or using row/column indices (0-based)
//! sheet.set_cell_value_at(1, 1, CellValue::Number(3.5)).unwrap();
//!
//! assert_eq!(workbook.get_cell_value("Sheet1", "B1").unwrap(), "42");
//! assert_eq!(workbook.get_cell_value("Sheet1", "B2").unwrap(), "3.5");
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    cell_name_to_coordinates, coordinates_to_cell_name, format_number, CellAddress, CellError,
    CellRange, CellValue, SharedString,
};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
