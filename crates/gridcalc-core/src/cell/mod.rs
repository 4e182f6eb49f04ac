//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellStorage`] - Sparse storage backing a worksheet

mod address;
mod storage;
mod value;

pub use address::{cell_name_to_coordinates, coordinates_to_cell_name, CellAddress, CellRange};
pub use storage::CellStorage;
pub use value::{format_number, CellError, CellValue, SharedString};
