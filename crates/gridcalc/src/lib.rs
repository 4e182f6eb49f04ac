//! # gridcalc
//!
//! A Rust spreadsheet library built around an embedded formula engine.
//!
//! ## Features
//!
//! - Sparse worksheets and multi-sheet workbooks
//! - Formula evaluation with operator precedence, nested function calls and
//!   cell, range and cross-sheet references
//! - Built-in SUM, PRODUCT, POWER, SQRT and QUOTIENT
//! - Whole-workbook calculation passes
//! - CSV import and export, with `=` fields loaded as formulas
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", 3.0).unwrap();
//! sheet.set_cell_value("A2", 4.0).unwrap();
//! sheet.set_cell_formula("B1", "=SQRT(POWER(A1,2)+POWER(A2,2))").unwrap();
//!
//! assert_eq!(workbook.calc_cell_value("Sheet1", "B1").unwrap(), "5");
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{CalculationOptions, CalculationStats, WorkbookCalculationExt};

// Re-export core types
pub use gridcalc_core::{
    cell_name_to_coordinates,
    coordinates_to_cell_name,
    format_number,
    CellAddress,
    CellError,
    CellRange,
    // Cell types
    CellValue,
    // Error types
    Error,
    Result,
    // Main types
    Workbook,
    Worksheet,

    MAX_COLS,
    // Constants
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export formula types
pub use gridcalc_formula::{
    calc_cell_value, evaluate, evaluate_formula, registry, tokenize, CellSource,
    EvaluationContext, FormulaError, FormulaResult, FunctionDef, FunctionRegistry, Token,
    TokenKind, TokenSubKind,
};

// Re-export I/O types
pub use gridcalc_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter, LineTerminator,
};
