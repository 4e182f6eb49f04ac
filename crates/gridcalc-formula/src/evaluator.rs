//! Formula evaluator
//!
//! A single forward pass over the token stream with one token of lookahead.
//! Operators are resolved by precedence on an operand stack and an operator
//! stack. Every open function call gets its own frame holding its own pair
//! of stacks plus the arguments collected so far, so nested calls only ever
//! see their own arguments.

use gridcalc_core::{CellError, Workbook};
use tracing::debug;

use crate::calculator::{calculate, is_arithmetic, priority};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::registry;
use crate::reference::{parse_reference, resolve_single};
use crate::token::{Token, TokenKind, TokenSubKind};
use crate::tokenizer::tokenize;

/// Read access to the cells a formula refers to
///
/// Values are the text a reader of the cell sees; formula cells contribute
/// their last stored result and are never re-evaluated.
pub trait CellSource {
    /// Displayed value of a cell, `""` when empty
    fn cell_value(&self, sheet: &str, address: &str) -> gridcalc_core::Result<String>;

    /// Formula text of a cell, `""` when it holds a plain value
    fn cell_formula(&self, sheet: &str, address: &str) -> gridcalc_core::Result<String>;
}

impl CellSource for Workbook {
    fn cell_value(&self, sheet: &str, address: &str) -> gridcalc_core::Result<String> {
        self.get_cell_value(sheet, address)
    }

    fn cell_formula(&self, sheet: &str, address: &str) -> gridcalc_core::Result<String> {
        self.get_cell_formula(sheet, address)
    }
}

/// Context for formula evaluation
pub struct EvaluationContext<'a> {
    /// Where referenced cell values come from
    pub source: &'a dyn CellSource,
    /// Sheet that unqualified references point at
    pub sheet: &'a str,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(source: &'a dyn CellSource, sheet: &'a str) -> Self {
        Self { source, sheet }
    }
}

/// Calculate the value of the formula stored in a cell.
///
/// A cell holding a plain value (no formula) calculates to `""`.
///
/// # Example
/// ```rust
/// use gridcalc_core::Workbook;
/// use gridcalc_formula::calc_cell_value;
///
/// let mut workbook = Workbook::new();
/// let sheet = workbook.worksheet_mut(0).unwrap();
/// sheet.set_cell_value("A1", 4.0).unwrap();
/// sheet.set_cell_formula("B1", "=SQRT(A1)*(1+2)").unwrap();
///
/// assert_eq!(calc_cell_value(&workbook, "Sheet1", "B1").unwrap(), "6");
/// ```
pub fn calc_cell_value(source: &dyn CellSource, sheet: &str, address: &str) -> FormulaResult<String> {
    let formula = source.cell_formula(sheet, address)?;
    let ctx = EvaluationContext::new(source, sheet);
    let result = evaluate_formula(&formula, &ctx);
    debug!(sheet, address, formula = %formula, result = ?result, "calculated cell");
    result
}

/// Tokenize and evaluate formula text in a context
pub fn evaluate_formula(formula: &str, ctx: &EvaluationContext<'_>) -> FormulaResult<String> {
    let tokens = tokenize(formula);
    evaluate(&tokens, ctx)
}

/// Evaluate a token stream to its single result.
///
/// An empty stream evaluates to `""`.
pub fn evaluate(tokens: &[Token], ctx: &EvaluationContext<'_>) -> FormulaResult<String> {
    if tokens.is_empty() {
        return Ok(String::new());
    }

    let mut evaluator = Evaluator::new(ctx);
    for (i, token) in tokens.iter().enumerate() {
        evaluator.step(token, tokens.get(i + 1))?;
    }
    evaluator.finish()
}

/// One open function call
#[derive(Debug)]
struct CallFrame {
    name: String,
    operands: Vec<Token>,
    operators: Vec<Token>,
    args: Vec<Token>,
}

impl CallFrame {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            operands: Vec::new(),
            operators: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Apply pending operators and move the finished argument, if any
    fn close_argument(&mut self) -> FormulaResult<()> {
        drain_operators(&mut self.operands, &mut self.operators)?;
        if self.operands.len() > 1 {
            return Err(FormulaError::malformed(format!(
                "missing separator in arguments of {}",
                self.name
            )));
        }
        self.args.extend(self.operands.pop());
        Ok(())
    }
}

struct Evaluator<'c, 'a> {
    ctx: &'c EvaluationContext<'a>,
    operands: Vec<Token>,
    operators: Vec<Token>,
    frames: Vec<CallFrame>,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    fn new(ctx: &'c EvaluationContext<'a>) -> Self {
        Self {
            ctx,
            operands: Vec::new(),
            operators: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn step(&mut self, token: &Token, next: Option<&Token>) -> FormulaResult<()> {
        if token.is_function_start() {
            self.frames.push(CallFrame::new(&token.value));
            return Ok(());
        }
        if token.is_function_stop() {
            return self.call_function();
        }

        let ctx = self.ctx;
        let Some(frame) = self.frames.last_mut() else {
            return apply_token(ctx, token, &mut self.operands, &mut self.operators);
        };

        if token.is_range() {
            // Part of an expression inside the argument: one value
            if !frame.operators.is_empty() {
                let value = resolve_single(ctx, &token.value)?;
                frame.operands.push(Token::number(value));
                return Ok(());
            }
            // Standing alone as an argument: every value it covers
            if next.is_some_and(|n| n.kind == TokenKind::Argument || n.kind == TokenKind::Function) {
                let values = parse_reference(ctx, &token.value)?;
                if values.is_empty() {
                    return Err(CellError::Value.into());
                }
                frame.args.extend(values.into_iter().map(Token::number));
                return Ok(());
            }
        }

        if token.kind == TokenKind::Argument {
            return frame.close_argument();
        }
        apply_token(ctx, token, &mut frame.operands, &mut frame.operators)
    }

    /// Close the innermost call and push its result to the enclosing level
    fn call_function(&mut self) -> FormulaResult<()> {
        let Some(mut frame) = self.frames.pop() else {
            return Err(FormulaError::malformed("unexpected ')'"));
        };
        frame.close_argument()?;

        let result = registry().call(&frame.name, &mut frame.args)?;
        let result = Token::number(result);
        match self.frames.last_mut() {
            Some(parent) => parent.operands.push(result),
            None => self.operands.push(result),
        }
        Ok(())
    }

    fn finish(mut self) -> FormulaResult<String> {
        if let Some(frame) = self.frames.last() {
            return Err(FormulaError::malformed(format!(
                "missing ')' after arguments of {}",
                frame.name
            )));
        }
        drain_operators(&mut self.operands, &mut self.operators)?;

        match self.operands.len() {
            1 => Ok(self.operands.remove(0).value),
            0 => Err(FormulaError::malformed("formula has no value")),
            n => Err(FormulaError::malformed(format!(
                "expected one value, found {}",
                n
            ))),
        }
    }
}

/// Precedence handling of one token against a pair of stacks
fn apply_token(
    ctx: &EvaluationContext<'_>,
    token: &Token,
    operands: &mut Vec<Token>,
    operators: &mut Vec<Token>,
) -> FormulaResult<()> {
    match token.kind {
        TokenKind::Operand => match token.subkind {
            TokenSubKind::Range => {
                let value = resolve_single(ctx, &token.value)?;
                operands.push(Token::number(value));
            }
            TokenSubKind::Logical => {
                let value = if token.value.eq_ignore_ascii_case("TRUE") {
                    "1"
                } else {
                    "0"
                };
                operands.push(Token::number(value));
            }
            TokenSubKind::Error => {
                let error = CellError::from_literal(&token.value).unwrap_or(CellError::Value);
                return Err(error.into());
            }
            _ => operands.push(token.clone()),
        },
        TokenKind::OperatorPrefix => match token.value.as_str() {
            // a prefix operator has no left operand to reduce against
            "-" => operators.push(token.clone()),
            "+" => {}
            other => return Err(FormulaError::UnsupportedOperator(other.to_string())),
        },
        TokenKind::OperatorInfix => {
            if !is_arithmetic(token) {
                return Err(FormulaError::UnsupportedOperator(token.value.clone()));
            }
            let incoming = priority(token);
            while let Some(top) = operators.last() {
                if priority(top) < incoming {
                    break;
                }
                if let Some(top) = operators.pop() {
                    calculate(operands, &top)?;
                }
            }
            operators.push(token.clone());
        }
        TokenKind::OperatorPostfix => {
            return Err(FormulaError::UnsupportedOperator(token.value.clone()));
        }
        TokenKind::Subexpression if token.subkind == TokenSubKind::Start => {
            operators.push(token.clone());
        }
        TokenKind::Subexpression => loop {
            match operators.pop() {
                Some(top) if top.is_subexpression_start() => break,
                Some(top) => calculate(operands, &top)?,
                None => return Err(FormulaError::malformed("unbalanced parentheses")),
            }
        },
        TokenKind::Whitespace => {}
        TokenKind::Function | TokenKind::Argument | TokenKind::Unknown => {
            return Err(FormulaError::malformed(format!(
                "unexpected '{}'",
                token.value
            )));
        }
    }
    Ok(())
}

/// Apply every pending operator; a leftover `(` is unbalanced
fn drain_operators(operands: &mut Vec<Token>, operators: &mut Vec<Token>) -> FormulaResult<()> {
    while let Some(top) = operators.pop() {
        calculate(operands, &top)?;
    }
    Ok(())
}
