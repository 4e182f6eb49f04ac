//! Reference resolution
//!
//! Turns the text of a reference operand (`A1`, `$B$2:C4`, `Sheet2!A1:A3`)
//! into the text values of the cells it covers.
//!
//! Colon-separated segments are paired strictly left to right. A
//! sheet-qualified segment starts a new pending reference; a bare segment
//! either starts one on the current sheet or closes a range with the pending
//! one. Because of this, a chain of more than two addresses such as
//! `A1:A2:B2:B3` resolves as the ranges `A1:A2` and `B2:B3`, not as the
//! bounding box `A1:B3`.

use gridcalc_core::{cell_name_to_coordinates, coordinates_to_cell_name, CellError};
use indexmap::IndexMap;
use tracing::trace;

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::EvaluationContext;

/// A single cell on a named sheet, in 1-based coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub sheet: String,
    pub col: u32,
    pub row: u32,
}

/// A rectangular block of cells between two corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRangeRef {
    pub from: CellRef,
    pub to: CellRef,
}

/// The parsed form of a reference operand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub cells: Vec<CellRef>,
    pub ranges: Vec<CellRangeRef>,
}

impl Reference {
    /// Parse reference text, with `default_sheet` for unqualified addresses
    pub fn parse(default_sheet: &str, reference: &str) -> FormulaResult<Self> {
        let reference = reference.replace('$', "");
        let mut parsed = Reference::default();
        let mut pending: Option<CellRef> = None;

        for segment in reference.split(':') {
            match segment.rsplit_once('!') {
                Some((sheet, address)) => {
                    let (col, row) = coordinates(address)?;
                    if let Some(previous) = pending.take() {
                        parsed.cells.push(previous);
                    }
                    pending = Some(CellRef {
                        sheet: unquote_sheet(sheet),
                        col,
                        row,
                    });
                }
                None => {
                    let (col, row) = coordinates(segment)?;
                    match pending.take() {
                        None => {
                            pending = Some(CellRef {
                                sheet: default_sheet.to_string(),
                                col,
                                row,
                            })
                        }
                        Some(from) => {
                            let to = CellRef {
                                sheet: from.sheet.clone(),
                                col,
                                row,
                            };
                            parsed.ranges.push(CellRangeRef { from, to });
                        }
                    }
                }
            }
        }

        parsed.cells.extend(pending);
        Ok(parsed)
    }
}

/// Resolve reference text into cell values.
///
/// Values come back in first-seen order with duplicates removed (the same
/// cell named twice contributes once). Ranges are read before single
/// references, each range column by column.
pub fn parse_reference(ctx: &EvaluationContext<'_>, reference: &str) -> FormulaResult<Vec<String>> {
    let parsed = Reference::parse(ctx.sheet, reference)?;
    let values = resolve(ctx, &parsed)?;
    trace!(reference, count = values.len(), "resolved reference");
    Ok(values)
}

/// Resolve a reference that must name exactly one cell
pub fn resolve_single(ctx: &EvaluationContext<'_>, reference: &str) -> FormulaResult<String> {
    let mut values = parse_reference(ctx, reference)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        _ => Err(CellError::Value.into()),
    }
}

fn resolve(ctx: &EvaluationContext<'_>, reference: &Reference) -> FormulaResult<Vec<String>> {
    let mut values: IndexMap<String, String> = IndexMap::new();

    for range in &reference.ranges {
        if range.from.sheet != range.to.sheet {
            return Err(CellError::Value.into());
        }
        let sheet = &range.from.sheet;
        let (min_col, max_col) = ordered(range.from.col, range.to.col);
        let (min_row, max_row) = ordered(range.from.row, range.to.row);

        for col in min_col..=max_col {
            for row in min_row..=max_row {
                let address = coordinates_to_cell_name(col, row).map_err(|_| CellError::Ref)?;
                let value = read_cell(ctx, sheet, &address)?;
                values.insert(format!("{}!{}", sheet, address), value);
            }
        }
    }

    for cell in &reference.cells {
        let address = coordinates_to_cell_name(cell.col, cell.row).map_err(|_| CellError::Ref)?;
        let value = read_cell(ctx, &cell.sheet, &address)?;
        values.insert(format!("{}!{}", cell.sheet, address), value);
    }

    Ok(values.into_values().collect())
}

fn read_cell(ctx: &EvaluationContext<'_>, sheet: &str, address: &str) -> FormulaResult<String> {
    ctx.source
        .cell_value(sheet, address)
        .map_err(|e| match e {
            gridcalc_core::Error::SheetNotFound(_) => FormulaError::Cell(CellError::Ref),
            other => FormulaError::Core(other),
        })
}

fn coordinates(address: &str) -> FormulaResult<(u32, u32)> {
    cell_name_to_coordinates(address).map_err(|_| FormulaError::Cell(CellError::Name))
}

/// `'It''s'` → `It's`
fn unquote_sheet(sheet: &str) -> String {
    match sheet
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => sheet.to_string(),
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::Workbook;
    use pretty_assertions::assert_eq;

    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_cell_value("A1", 1.0).unwrap();
        ws.set_cell_value("A2", 2.0).unwrap();
        ws.set_cell_value("A3", 3.0).unwrap();
        ws.set_cell_value("B1", 10.0).unwrap();
        ws.set_cell_value("B2", 20.0).unwrap();
        ws.set_cell_value("B3", 30.0).unwrap();

        let idx = wb.add_worksheet_with_name("My Data").unwrap();
        let ws = wb.worksheet_mut(idx).unwrap();
        ws.set_cell_value("A1", 100.0).unwrap();
        ws.set_cell_value("A2", 200.0).unwrap();
        wb
    }

    fn resolve_text(wb: &Workbook, reference: &str) -> FormulaResult<Vec<String>> {
        let ctx = EvaluationContext::new(wb, "Sheet1");
        parse_reference(&ctx, reference)
    }

    #[test]
    fn test_single_cell() {
        let wb = workbook();
        assert_eq!(resolve_text(&wb, "A2").unwrap(), vec!["2"]);
        assert_eq!(resolve_text(&wb, "$B$3").unwrap(), vec!["30"]);
        assert_eq!(resolve_text(&wb, "C9").unwrap(), vec![""]);
    }

    #[test]
    fn test_range_is_column_major() {
        let wb = workbook();
        assert_eq!(
            resolve_text(&wb, "A1:B2").unwrap(),
            vec!["1", "2", "10", "20"]
        );
        // Corners are normalized
        assert_eq!(
            resolve_text(&wb, "B2:A1").unwrap(),
            vec!["1", "2", "10", "20"]
        );
    }

    #[test]
    fn test_sheet_qualified() {
        let wb = workbook();
        assert_eq!(
            resolve_text(&wb, "'My Data'!A1:A2").unwrap(),
            vec!["100", "200"]
        );
        // Both sides qualified: two single references
        assert_eq!(
            resolve_text(&wb, "Sheet1!A1:'My Data'!A2").unwrap(),
            vec!["1", "200"]
        );
    }

    #[test]
    fn test_same_cell_on_two_sheets_is_kept_twice() {
        let wb = workbook();
        assert_eq!(
            resolve_text(&wb, "A1:'My Data'!A1").unwrap(),
            vec!["1", "100"]
        );
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let wb = workbook();
        let ctx = EvaluationContext::new(&wb, "Sheet1");
        let reference = Reference {
            cells: vec![CellRef {
                sheet: "Sheet1".into(),
                col: 1,
                row: 1,
            }],
            ranges: vec![CellRangeRef {
                from: CellRef {
                    sheet: "Sheet1".into(),
                    col: 1,
                    row: 1,
                },
                to: CellRef {
                    sheet: "Sheet1".into(),
                    col: 1,
                    row: 2,
                },
            }],
        };
        assert_eq!(resolve(&ctx, &reference).unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_chained_addresses_pair_in_sequence() {
        let wb = workbook();
        // A3 and B1 lie inside the bounding box A1:B3 but are not read
        assert_eq!(
            resolve_text(&wb, "A1:A2:B2:B3").unwrap(),
            vec!["1", "2", "20", "30"]
        );
    }

    #[test]
    fn test_parse_pairing() {
        let parsed = Reference::parse("Sheet1", "A1:B2:C3").unwrap();
        assert_eq!(parsed.ranges.len(), 1);
        assert_eq!(
            parsed.cells,
            vec![CellRef {
                sheet: "Sheet1".into(),
                col: 3,
                row: 3,
            }]
        );

        let parsed = Reference::parse("Sheet1", "'It''s'!B2:D4").unwrap();
        assert_eq!(parsed.ranges[0].from.sheet, "It's");
        assert_eq!(parsed.ranges[0].to.sheet, "It's");
        assert_eq!((parsed.ranges[0].to.col, parsed.ranges[0].to.row), (4, 4));
    }

    #[test]
    fn test_errors() {
        let wb = workbook();

        let err = resolve_text(&wb, "NOPE").unwrap_err();
        assert_eq!(err.cell_error(), CellError::Name);

        let err = resolve_text(&wb, "A1:").unwrap_err();
        assert_eq!(err.cell_error(), CellError::Name);

        let err = resolve_text(&wb, "Missing!A1").unwrap_err();
        assert_eq!(err.cell_error(), CellError::Ref);

        let ctx = EvaluationContext::new(&wb, "Sheet1");
        let cross_sheet = Reference {
            cells: Vec::new(),
            ranges: vec![CellRangeRef {
                from: CellRef {
                    sheet: "Sheet1".into(),
                    col: 1,
                    row: 1,
                },
                to: CellRef {
                    sheet: "My Data".into(),
                    col: 1,
                    row: 2,
                },
            }],
        };
        let err = resolve(&ctx, &cross_sheet).unwrap_err();
        assert_eq!(err.cell_error(), CellError::Value);
    }

    #[test]
    fn test_resolve_single_requires_one_value() {
        let wb = workbook();
        let ctx = EvaluationContext::new(&wb, "Sheet1");
        assert_eq!(resolve_single(&ctx, "B1").unwrap(), "10");

        let err = resolve_single(&ctx, "A1:A3").unwrap_err();
        assert_eq!(err.cell_error(), CellError::Value);
    }
}
