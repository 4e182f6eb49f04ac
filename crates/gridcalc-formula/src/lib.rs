//! # gridcalc-formula
//!
//! Formula calculation engine for gridcalc.
//!
//! This crate provides:
//! - Formula tokenizing (text → token stream)
//! - Reference resolution (`A1`, `A1:B3`, `Sheet2!C1:C9` → cell values)
//! - Infix evaluation with operator precedence and nested function calls
//! - Built-in math functions (SUM, PRODUCT, POWER, SQRT, QUOTIENT)
//!
//! Values travel through the engine as text, the way a cell displays them.
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::Workbook;
//! use gridcalc_formula::{evaluate_formula, EvaluationContext};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", 2.0).unwrap();
//! sheet.set_cell_value("A2", 5.0).unwrap();
//!
//! let ctx = EvaluationContext::new(&workbook, "Sheet1");
//! assert_eq!(evaluate_formula("=SUM(A1:A2)*2", &ctx).unwrap(), "14");
//! ```

pub mod calculator;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod reference;
pub mod token;
pub mod tokenizer;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{calc_cell_value, evaluate, evaluate_formula, CellSource, EvaluationContext};
pub use functions::{registry, FunctionDef, FunctionRegistry};
pub use reference::{parse_reference, CellRangeRef, CellRef, Reference};
pub use token::{Token, TokenKind, TokenSubKind};
pub use tokenizer::tokenize;
