//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use gridcalc_core::{CellValue, Workbook, Worksheet};
use tracing::debug;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a worksheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        let file = File::open(path)?;
        Self::read(file, &name, options)
    }

    /// Read several CSV files into one workbook, one sheet per file
    pub fn read_workbook<P: AsRef<Path>>(paths: &[P], options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut workbook = Workbook::empty();
        for path in paths {
            let worksheet = Self::read_file(path, options)?;
            workbook.add_existing_worksheet(worksheet)?;
        }
        Ok(workbook)
    }

    /// Read CSV from a reader into a worksheet
    pub fn read<R: Read>(reader: R, sheet_name: &str, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(sheet_name);

        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx).map_err(|_| CsvError::Parse {
                row: row_idx,
                column: 0,
                message: "too many rows".into(),
            })?;

            for (col_idx, field) in record.iter().enumerate() {
                let col = u16::try_from(col_idx).map_err(|_| CsvError::Parse {
                    row: row_idx,
                    column: col_idx,
                    message: "too many columns".into(),
                })?;

                let is_header = options.has_header && row_idx == 0;
                let value = if is_header {
                    CellValue::string(field)
                } else {
                    Self::field_value(field, options)
                };
                worksheet.set_cell_value_at(row, col, value)?;
            }
        }

        debug!(
            sheet = sheet_name,
            cells = worksheet.cell_count(),
            "loaded CSV worksheet"
        );
        Ok(worksheet)
    }

    fn field_value(field: &str, options: &CsvReadOptions) -> CellValue {
        if options.detect_formulas && field.trim_start().starts_with('=') {
            return CellValue::formula(field.trim());
        }
        if options.auto_detect_types {
            Self::detect_type(field)
        } else if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::string(field)
        }
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if trimmed.eq_ignore_ascii_case("TRUE") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("FALSE") {
            return CellValue::Boolean(false);
        }

        // Plain decimal text only, not "inf" or "NaN"
        let looks_numeric = trimmed
            .trim_start_matches(&['+', '-'][..])
            .starts_with(|c: char| c.is_ascii_digit() || c == '.');
        if looks_numeric {
            if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
                return CellValue::Number(n);
            }
        }

        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn read(data: &str, options: &CsvReadOptions) -> Worksheet {
        CsvReader::read(data.as_bytes(), "Data", options).unwrap()
    }

    #[test]
    fn test_type_detection() {
        let ws = read("1,2.5,-3\ntrue,FALSE,hello\n,1e3,inf\n", &CsvReadOptions::default());

        assert_eq!(ws.name(), "Data");
        assert_eq!(ws.get_value("A1").unwrap(), CellValue::Number(1.0));
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::Number(2.5));
        assert_eq!(ws.get_value("C1").unwrap(), CellValue::Number(-3.0));
        assert_eq!(ws.get_value("A2").unwrap(), CellValue::Boolean(true));
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::Boolean(false));
        assert_eq!(ws.get_value("C2").unwrap(), CellValue::string("hello"));
        assert_eq!(ws.get_value("A3").unwrap(), CellValue::Empty);
        assert_eq!(ws.get_value("B3").unwrap(), CellValue::Number(1000.0));
        assert_eq!(ws.get_value("C3").unwrap(), CellValue::string("inf"));
    }

    #[test]
    fn test_formulas_detected() {
        let ws = read("1,2,\"=SUM(A1,B1)\"\n", &CsvReadOptions::default());
        assert_eq!(ws.get_formula_at(0, 2), Some("=SUM(A1,B1)"));

        let options = CsvReadOptions {
            detect_formulas: false,
            ..Default::default()
        };
        let ws = read("\"=A1\"\n", &options);
        assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("=A1"));
    }

    #[test]
    fn test_header_row_is_text() {
        let options = CsvReadOptions {
            has_header: true,
            ..Default::default()
        };
        let ws = read("2024,total\n1,2\n", &options);
        assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("2024"));
        assert_eq!(ws.get_value("A2").unwrap(), CellValue::Number(1.0));
    }

    #[test]
    fn test_no_type_detection() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            ..Default::default()
        };
        let ws = read("1,,x\n", &options);
        assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("1"));
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_semicolon_delimiter_and_ragged_rows() {
        let options = CsvReadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let ws = read("1;2;3\n4\n", &options);
        assert_eq!(ws.get_value("C1").unwrap(), CellValue::Number(3.0));
        assert_eq!(ws.get_value("A2").unwrap(), CellValue::Number(4.0));
        assert_eq!(ws.cell_count(), 4);
    }

    #[test]
    fn test_read_workbook_names_sheets_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let sales = dir.path().join("sales.csv");
        let costs = dir.path().join("costs.csv");
        std::fs::File::create(&sales)
            .unwrap()
            .write_all(b"10\n20\n")
            .unwrap();
        std::fs::File::create(&costs)
            .unwrap()
            .write_all(b"=SUM(sales!A1:A2)\n")
            .unwrap();

        let wb = CsvReader::read_workbook(&[&sales, &costs], &CsvReadOptions::default()).unwrap();
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.get_cell_value("sales", "A2").unwrap(), "20");
        assert_eq!(wb.get_cell_formula("costs", "A1").unwrap(), "=SUM(sales!A1:A2)");
    }

    #[test]
    fn test_read_workbook_rejects_duplicate_stems() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("data.csv");
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let second = nested.join("data.csv");
        std::fs::write(&first, "1\n").unwrap();
        std::fs::write(&second, "2\n").unwrap();

        let err = CsvReader::read_workbook(&[first, second], &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::Core(gridcalc_core::Error::DuplicateSheetName(_))
        ));
    }
}
