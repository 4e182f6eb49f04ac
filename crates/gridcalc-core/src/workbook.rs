//! Workbook type - the main document structure

use crate::cell::CellAddress;
use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// A workbook holds an ordered list of uniquely named worksheets. Sheet
/// lookups by name are exact; uniqueness is checked case-insensitively.
#[derive(Debug, Clone)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1")],
        }
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with default name
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Remove a worksheet by index
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        Ok(self.worksheets.remove(index))
    }

    // === Text-level cell access ===

    /// Get the displayed value of a cell as text.
    ///
    /// Empty cells read as `""`. Formula cells read as their last calculated
    /// value, or `""` when they were never calculated.
    pub fn get_cell_value(&self, sheet: &str, address: &str) -> Result<String> {
        let worksheet = self.require_sheet(sheet)?;
        let addr = CellAddress::parse(address)?;
        Ok(worksheet
            .cell_at(addr.row, addr.col)
            .map(|value| value.to_string())
            .unwrap_or_default())
    }

    /// Get the formula text stored in a cell.
    ///
    /// Non-formula cells read as `""`. A cell with nothing stored is
    /// [`Error::CellNotFound`].
    pub fn get_cell_formula(&self, sheet: &str, address: &str) -> Result<String> {
        let worksheet = self.require_sheet(sheet)?;
        let addr = CellAddress::parse(address)?;
        let cell = worksheet
            .cell_at(addr.row, addr.col)
            .ok_or_else(|| Error::CellNotFound {
                sheet: sheet.to_string(),
                address: address.to_string(),
            })?;
        Ok(cell.formula_text().unwrap_or_default().to_string())
    }

    fn require_sheet(&self, name: &str) -> Result<&Worksheet> {
        self.worksheet_by_name(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Validate a sheet name
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        for c in INVALID_CHARS {
            if name.contains(*c) {
                return Err(Error::InvalidSheetName(format!(
                    "Sheet name cannot contain '{}'",
                    c
                )));
            }
        }

        // Duplicate check is case-insensitive
        let name_lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }

    /// Generate a unique sheet name
    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.validate_sheet_name(&name).is_ok() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
        assert!(Workbook::empty().is_empty());
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();

        let idx = wb.add_worksheet().unwrap();
        assert_eq!(idx, 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet2");

        let idx = wb.add_worksheet_with_name("Data").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(wb.sheet_index("Data"), Some(2));

        let removed = wb.remove_worksheet(1).unwrap();
        assert_eq!(removed.name(), "Sheet2");
        assert_eq!(wb.sheet_index("Data"), Some(1));
        assert!(matches!(
            wb.remove_worksheet(5),
            Err(Error::SheetOutOfBounds(5, 2))
        ));
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_worksheet_with_name("SHEET1").is_err());
        assert!(wb.add_worksheet_with_name("sheet1").is_err());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet:1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());

        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet_with_name(&long_name).is_err());
    }

    #[test]
    fn test_get_cell_value() {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_cell_value("A1", 1.5).unwrap();
        ws.set_cell_value("A2", "text").unwrap();
        ws.set_cell_value("A3", false).unwrap();
        ws.set_cell_formula("A4", "=A1*2").unwrap();
        ws.set_cell_formula("A5", "=A1*4").unwrap();
        ws.set_formula_result(4, 0, CellValue::Number(6.0)).unwrap();

        assert_eq!(wb.get_cell_value("Sheet1", "A1").unwrap(), "1.5");
        assert_eq!(wb.get_cell_value("Sheet1", "A2").unwrap(), "text");
        assert_eq!(wb.get_cell_value("Sheet1", "A3").unwrap(), "FALSE");
        assert_eq!(wb.get_cell_value("Sheet1", "A4").unwrap(), "");
        assert_eq!(wb.get_cell_value("Sheet1", "A5").unwrap(), "6");
        assert_eq!(wb.get_cell_value("Sheet1", "Q100").unwrap(), "");
        assert_eq!(wb.get_cell_value("Sheet1", "$A$1").unwrap(), "1.5");

        assert!(matches!(
            wb.get_cell_value("Missing", "A1"),
            Err(Error::SheetNotFound(_))
        ));
        assert!(matches!(
            wb.get_cell_value("Sheet1", "1A"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_get_cell_formula() {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_cell_value("A1", 3.0).unwrap();
        ws.set_cell_formula("B1", "=SUM(A1,1)").unwrap();

        assert_eq!(wb.get_cell_formula("Sheet1", "B1").unwrap(), "=SUM(A1,1)");
        assert_eq!(wb.get_cell_formula("Sheet1", "A1").unwrap(), "");
        assert!(matches!(
            wb.get_cell_formula("Sheet1", "C1"),
            Err(Error::CellNotFound { .. })
        ));
        assert!(matches!(
            wb.get_cell_formula("Other", "B1"),
            Err(Error::SheetNotFound(_))
        ));
    }
}
