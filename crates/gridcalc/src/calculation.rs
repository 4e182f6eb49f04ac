//! Workbook calculation
//!
//! Evaluates formula cells against the values currently stored in the
//! workbook. A pass visits formula cells sheet by sheet in row-major order
//! and stores each result as the formula's cached value, so later formulas
//! in the same pass see results stored earlier. There is no dependency
//! ordering and referenced formulas are never re-evaluated.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", 10.0).unwrap();
//! sheet.set_cell_value("A2", 20.0).unwrap();
//! sheet.set_cell_formula("A3", "=A1+A2").unwrap();
//!
//! let stats = workbook.calculate().unwrap();
//! assert_eq!(stats.cells_calculated, 1);
//! assert_eq!(workbook.get_cell_value("Sheet1", "A3").unwrap(), "30");
//! ```

use gridcalc_formula::calculator::parse_number;
use tracing::{debug, warn};

use crate::{evaluate_formula, CellValue, EvaluationContext, FormulaResult, Workbook};

/// Options for workbook calculation
#[derive(Debug, Clone, Default)]
pub struct CalculationOptions {
    /// Only calculate formulas on this sheet (default: every sheet)
    pub sheet: Option<String>,
    /// Return the first evaluation error instead of storing it in the cell
    pub stop_on_error: bool,
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells visited
    pub formula_count: usize,
    /// Number of cells whose result was stored
    pub cells_calculated: usize,
    /// Number of cells that calculated to an error
    pub errors: usize,
}

/// Extension trait for Workbook to add calculation methods
pub trait WorkbookCalculationExt {
    /// Calculate the formula stored in one cell without storing the result
    fn calc_cell_value(&self, sheet: &str, address: &str) -> FormulaResult<String>;

    /// Calculate all formulas in the workbook with default options
    fn calculate(&mut self) -> FormulaResult<CalculationStats>;

    /// Calculate all formulas with custom options
    fn calculate_with_options(&mut self, options: &CalculationOptions) -> FormulaResult<CalculationStats>;
}

impl WorkbookCalculationExt for Workbook {
    fn calc_cell_value(&self, sheet: &str, address: &str) -> FormulaResult<String> {
        gridcalc_formula::calc_cell_value(self, sheet, address)
    }

    fn calculate(&mut self) -> FormulaResult<CalculationStats> {
        self.calculate_with_options(&CalculationOptions::default())
    }

    fn calculate_with_options(&mut self, options: &CalculationOptions) -> FormulaResult<CalculationStats> {
        if let Some(name) = &options.sheet {
            if self.sheet_index(name).is_none() {
                return Err(crate::Error::SheetNotFound(name.clone()).into());
            }
        }

        let pending = collect_formulas(self, options.sheet.as_deref());
        let mut stats = CalculationStats {
            formula_count: pending.len(),
            ..Default::default()
        };

        for cell in pending {
            let result = {
                let ctx = EvaluationContext::new(&*self, &cell.sheet);
                evaluate_formula(&cell.formula, &ctx)
            };

            let value = match result {
                Ok(text) => result_value(text),
                Err(e) if options.stop_on_error => return Err(e),
                Err(e) => {
                    warn!(
                        sheet = %cell.sheet,
                        row = cell.row,
                        col = cell.col,
                        error = %e,
                        "formula calculated to an error"
                    );
                    stats.errors += 1;
                    CellValue::Error(e.cell_error())
                }
            };

            if let Some(sheet) = self.worksheet_mut(cell.sheet_index) {
                sheet.set_formula_result(cell.row, cell.col, value)?;
                stats.cells_calculated += 1;
            }
        }

        debug!(
            formulas = stats.formula_count,
            calculated = stats.cells_calculated,
            errors = stats.errors,
            "calculation pass finished"
        );
        Ok(stats)
    }
}

struct PendingFormula {
    sheet_index: usize,
    sheet: String,
    row: u32,
    col: u16,
    formula: String,
}

fn collect_formulas(workbook: &Workbook, only_sheet: Option<&str>) -> Vec<PendingFormula> {
    workbook
        .worksheets()
        .enumerate()
        .filter(|(_, sheet)| only_sheet.map_or(true, |name| sheet.name() == name))
        .flat_map(|(sheet_index, sheet)| {
            sheet.formula_cells().map(move |(row, col, formula)| PendingFormula {
                sheet_index,
                sheet: sheet.name().to_string(),
                row,
                col,
                formula: formula.to_string(),
            })
        })
        .collect()
}

/// Results that read as numbers are cached as numbers, anything else as text
fn result_value(text: String) -> CellValue {
    if text.is_empty() {
        return CellValue::Empty;
    }
    match parse_number(&text) {
        Some(n) => CellValue::Number(n),
        None => CellValue::string(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellError, FormulaError};
    use pretty_assertions::assert_eq;

    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", 1.0).unwrap();
        sheet.set_cell_value("A2", 2.0).unwrap();
        sheet.set_cell_formula("B1", "=A1+A2").unwrap();
        sheet.set_cell_formula("B2", "=B1*10").unwrap();
        sheet.set_cell_formula("C1", "=A1/0").unwrap();
        wb
    }

    #[test]
    fn test_calculate_stores_results_in_row_major_order() {
        let mut wb = workbook();
        let stats = wb.calculate().unwrap();

        assert_eq!(
            stats,
            CalculationStats {
                formula_count: 3,
                cells_calculated: 3,
                errors: 1,
            }
        );
        assert_eq!(wb.get_cell_value("Sheet1", "B1").unwrap(), "3");
        assert_eq!(wb.get_cell_value("Sheet1", "B2").unwrap(), "30");
        assert_eq!(wb.get_cell_value("Sheet1", "C1").unwrap(), "#DIV/0!");

        let b1 = wb.worksheet(0).unwrap().get_value("B1").unwrap();
        assert_eq!(b1.effective_value(), &CellValue::Number(3.0));
    }

    #[test]
    fn test_later_formula_reads_stale_value() {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_formula("A1", "=B1+1").unwrap();
        sheet.set_cell_formula("B1", "=5").unwrap();

        // A1 is visited before B1 has a cached value
        let stats = wb.calculate().unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(wb.get_cell_value("Sheet1", "A1").unwrap(), "#VALUE!");

        // A second pass sees the value stored by the first
        let stats = wb.calculate().unwrap();
        assert_eq!(stats.errors, 0);
        assert_eq!(wb.get_cell_value("Sheet1", "A1").unwrap(), "6");
    }

    #[test]
    fn test_stop_on_error() {
        let mut wb = workbook();
        let options = CalculationOptions {
            stop_on_error: true,
            ..Default::default()
        };
        let err = wb.calculate_with_options(&options).unwrap_err();
        assert_eq!(err.cell_error(), CellError::Div0);
    }

    #[test]
    fn test_single_sheet() {
        let mut wb = workbook();
        wb.add_worksheet_with_name("Other").unwrap();
        wb.worksheet_by_name_mut("Other")
            .unwrap()
            .set_cell_formula("A1", "=Sheet1!A2*3")
            .unwrap();

        let options = CalculationOptions {
            sheet: Some("Other".to_string()),
            ..Default::default()
        };
        let stats = wb.calculate_with_options(&options).unwrap();
        assert_eq!(stats.formula_count, 1);
        assert_eq!(wb.get_cell_value("Other", "A1").unwrap(), "6");
        assert_eq!(wb.get_cell_value("Sheet1", "B1").unwrap(), "");

        let options = CalculationOptions {
            sheet: Some("Missing".to_string()),
            ..Default::default()
        };
        let err = wb.calculate_with_options(&options).unwrap_err();
        assert!(matches!(
            err,
            FormulaError::Core(crate::Error::SheetNotFound(ref name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_calc_cell_value_does_not_store() {
        let wb = workbook();
        assert_eq!(wb.calc_cell_value("Sheet1", "B1").unwrap(), "3");
        assert_eq!(wb.get_cell_value("Sheet1", "B1").unwrap(), "");
        assert_eq!(wb.calc_cell_value("Sheet1", "A1").unwrap(), "");
    }
}
