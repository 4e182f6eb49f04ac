//! Formula error types

use gridcalc_core::CellError;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula evaluation
///
/// The first error aborts the evaluation. [`FormulaError::cell_error`] gives
/// the error literal a cell would display for it.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// A spreadsheet error value such as `#DIV/0!` or `#NUM!`
    #[error("{0}")]
    Cell(CellError),

    /// An operand that had to be numeric was not
    #[error("#VALUE!")]
    NotNumeric(String),

    /// Function name not present in the registry
    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),

    /// Operator the evaluator does not implement (`^`, `&`, comparisons, ...)
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Token stream that does not form a single expression
    #[error("Malformed formula: {0}")]
    Malformed(String),

    /// Error raised by the document model
    #[error(transparent)]
    Core(#[from] gridcalc_core::Error),
}

impl FormulaError {
    /// Create a malformed-formula error with a message
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        FormulaError::Malformed(msg.into())
    }

    /// The error value a cell displays for this error
    pub fn cell_error(&self) -> CellError {
        match self {
            FormulaError::Cell(e) => *e,
            FormulaError::NotNumeric(_) => CellError::Value,
            FormulaError::UnsupportedFunction(_) => CellError::Name,
            FormulaError::UnsupportedOperator(_) => CellError::Value,
            FormulaError::ArgumentCount { .. } => CellError::Value,
            FormulaError::Malformed(_) => CellError::Value,
            FormulaError::Core(
                gridcalc_core::Error::InvalidAddress(_) | gridcalc_core::Error::InvalidRange(_),
            ) => CellError::Name,
            FormulaError::Core(_) => CellError::Ref,
        }
    }
}

impl From<CellError> for FormulaError {
    fn from(e: CellError) -> Self {
        FormulaError::Cell(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_matches_cell_literal() {
        assert_eq!(FormulaError::Cell(CellError::Div0).to_string(), "#DIV/0!");
        assert_eq!(FormulaError::NotNumeric("abc".into()).to_string(), "#VALUE!");
        assert_eq!(
            FormulaError::UnsupportedFunction("FOO".into()).to_string(),
            "Unsupported function: FOO"
        );
    }

    #[test]
    fn test_cell_error_mapping() {
        assert_eq!(FormulaError::from(CellError::Num).cell_error(), CellError::Num);
        assert_eq!(
            FormulaError::UnsupportedFunction("FOO".into()).cell_error(),
            CellError::Name
        );
        assert_eq!(
            FormulaError::ArgumentCount {
                function: "SQRT".into(),
                expected: "1".into(),
                actual: 3,
            }
            .cell_error(),
            CellError::Value
        );
        assert_eq!(
            FormulaError::from(gridcalc_core::Error::SheetNotFound("X".into())).cell_error(),
            CellError::Ref
        );
    }
}
