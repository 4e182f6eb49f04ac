//! Math functions

use gridcalc_core::{format_number, CellError};

use crate::calculator::to_number;
use crate::error::{FormulaError, FormulaResult};
use crate::token::Token;

/// SUM function
///
/// Empty arguments (blank cells, `SUM(1,,2)`) are skipped.
pub fn fn_sum(args: &mut Vec<Token>) -> FormulaResult<String> {
    let mut sum = 0.0;
    while let Some(arg) = args.pop() {
        if arg.value.is_empty() {
            continue;
        }
        sum += to_number(&arg)?;
    }
    finish(sum)
}

/// PRODUCT function
pub fn fn_product(args: &mut Vec<Token>) -> FormulaResult<String> {
    let mut product = 1.0;
    while let Some(arg) = args.pop() {
        if arg.value.is_empty() {
            continue;
        }
        product *= to_number(&arg)?;
    }
    finish(product)
}

/// POWER function: `POWER(number, power)`
pub fn fn_power(args: &mut Vec<Token>) -> FormulaResult<String> {
    let exponent = pop_number(args)?;
    let base = pop_number(args)?;

    if base == 0.0 && exponent == 0.0 {
        return Err(CellError::Num.into());
    }
    if base == 0.0 && exponent < 0.0 {
        return Err(CellError::Div0.into());
    }
    finish(base.powf(exponent))
}

/// SQRT function
pub fn fn_sqrt(args: &mut Vec<Token>) -> FormulaResult<String> {
    let value = pop_number(args)?;
    if value < 0.0 {
        return Err(CellError::Num.into());
    }
    finish(value.sqrt())
}

/// QUOTIENT function: integer part of `numerator / denominator`
pub fn fn_quotient(args: &mut Vec<Token>) -> FormulaResult<String> {
    let denominator = pop_number(args)?;
    let numerator = pop_number(args)?;
    if denominator == 0.0 {
        return Err(CellError::Div0.into());
    }
    finish((numerator / denominator).trunc())
}

fn pop_number(args: &mut Vec<Token>) -> FormulaResult<f64> {
    let arg = args
        .pop()
        .ok_or_else(|| FormulaError::malformed("missing function argument"))?;
    to_number(&arg)
}

/// Non-finite results (overflow, negative base with fractional power) are `#NUM!`
fn finish(value: f64) -> FormulaResult<String> {
    if value.is_finite() {
        Ok(format_number(value))
    } else {
        Err(CellError::Num.into())
    }
}
