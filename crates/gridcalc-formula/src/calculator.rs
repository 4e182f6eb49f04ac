//! Arithmetic on operand stacks

use gridcalc_core::{format_number, CellError};

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Token, TokenKind, TokenSubKind};

/// Binding strength of an operator token.
///
/// `(` is 0 so that nothing reduces past an open parenthesis.
pub fn priority(token: &Token) -> u8 {
    if token.is_subexpression_start() {
        return 0;
    }
    if token.is_negation() {
        return 3;
    }
    match token.value.as_str() {
        "*" | "/" => 2,
        "+" | "-" => 1,
        _ => 0,
    }
}

/// Whether the evaluator knows how to apply this operator
pub fn is_arithmetic(token: &Token) -> bool {
    token.is_negation()
        || (token.kind == TokenKind::OperatorInfix
            && token.subkind == TokenSubKind::Math
            && matches!(token.value.as_str(), "+" | "-" | "*" | "/"))
}

/// Apply `operator` to the top of `operands`, pushing the result back.
///
/// Binary operators pop the right operand first, then the left.
pub fn calculate(operands: &mut Vec<Token>, operator: &Token) -> FormulaResult<()> {
    if operator.is_subexpression_start() {
        return Err(FormulaError::malformed("unbalanced parentheses"));
    }
    if !is_arithmetic(operator) {
        return Err(FormulaError::UnsupportedOperator(operator.value.clone()));
    }

    if operator.is_negation() {
        let operand = pop_operand(operands, operator)?;
        let value = to_number(&operand)?;
        operands.push(number_token(-value)?);
        return Ok(());
    }

    let right = pop_operand(operands, operator)?;
    let left = pop_operand(operands, operator)?;
    let lhs = to_number(&left)?;
    let rhs = to_number(&right)?;

    let result = match operator.value.as_str() {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" => {
            if rhs == 0.0 {
                return Err(CellError::Div0.into());
            }
            lhs / rhs
        }
        other => return Err(FormulaError::UnsupportedOperator(other.to_string())),
    };

    operands.push(number_token(result)?);
    Ok(())
}

/// Parse an operand's text as a number
pub fn to_number(token: &Token) -> FormulaResult<f64> {
    parse_number(&token.value).ok_or_else(|| FormulaError::NotNumeric(token.value.clone()))
}

/// Parse decimal text, rejecting `inf`/`nan` spellings
pub fn parse_number(text: &str) -> Option<f64> {
    let digits = text.trim_start_matches(&['+', '-'][..]);
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A numeric operand holding `value`; overflow is `#NUM!`
pub fn number_token(value: f64) -> FormulaResult<Token> {
    if !value.is_finite() {
        return Err(CellError::Num.into());
    }
    Ok(Token::number(format_number(value)))
}

fn pop_operand(operands: &mut Vec<Token>, operator: &Token) -> FormulaResult<Token> {
    operands.pop().ok_or_else(|| {
        FormulaError::malformed(format!("missing operand for '{}'", operator.value))
    })
}
