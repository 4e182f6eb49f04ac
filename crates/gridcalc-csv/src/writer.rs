//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gridcalc_core::Worksheet;
use tracing::debug;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a worksheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        worksheet: &Worksheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(worksheet, file, options)
    }

    /// Write a worksheet to a writer
    ///
    /// Output always starts at `A1` so cell addresses survive a round trip
    /// through [`CsvReader`](crate::CsvReader).
    pub fn write<W: Write>(
        worksheet: &Worksheet,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        let mut rows = 0;
        if let Some(range) = worksheet.used_range() {
            for row in 0..=range.end.row {
                let mut record = Vec::with_capacity(usize::from(range.end.col) + 1);

                for col in 0..=range.end.col {
                    let field = match worksheet.cell_at(row, col) {
                        Some(value) if options.write_formulas && value.is_formula() => value
                            .formula_text()
                            .map(str::to_string)
                            .unwrap_or_default(),
                        Some(value) => value.to_string(),
                        None => String::new(),
                    };
                    record.push(field);
                }

                csv_writer.write_record(&record)?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        debug!(sheet = worksheet.name(), rows, "wrote CSV worksheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvReadOptions, CsvReader};
    use gridcalc_core::CellValue;
    use pretty_assertions::assert_eq;

    fn write(worksheet: &Worksheet, options: &CsvWriteOptions) -> String {
        let mut out = Vec::new();
        CsvWriter::write(worksheet, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Worksheet {
        let mut ws = Worksheet::new("Data");
        ws.set_cell_value("A1", 1.0).unwrap();
        ws.set_cell_value("B1", "a,b").unwrap();
        ws.set_cell_value("A2", true).unwrap();
        ws.set_cell_formula("B2", "A1*2").unwrap();
        ws.set_formula_result(1, 1, CellValue::Number(2.0)).unwrap();
        ws
    }

    #[test]
    fn test_write_values() {
        let csv = write(&sample(), &CsvWriteOptions::default());
        assert_eq!(csv, "1,\"a,b\"\nTRUE,2\n");
    }

    #[test]
    fn test_write_formulas() {
        let options = CsvWriteOptions {
            write_formulas: true,
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        let csv = write(&sample(), &options);
        assert_eq!(csv, "1,\"a,b\"\r\nTRUE,=A1*2\r\n");
    }

    #[test]
    fn test_write_pads_from_a1() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell_value("B2", 5.0).unwrap();
        assert_eq!(write(&ws, &CsvWriteOptions::default()), ",\n,5\n");
    }

    #[test]
    fn test_write_empty_sheet() {
        let ws = Worksheet::new("Data");
        assert_eq!(write(&ws, &CsvWriteOptions::default()), "");
    }

    #[test]
    fn test_file_round_trip_keeps_formulas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Data.csv");
        let options = CsvWriteOptions {
            write_formulas: true,
            ..Default::default()
        };
        CsvWriter::write_file(&sample(), &path, &options).unwrap();

        let ws = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();
        assert_eq!(ws.name(), "Data");
        assert_eq!(ws.get_formula_at(1, 1), Some("=A1*2"));
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::string("a,b"));
    }
}
