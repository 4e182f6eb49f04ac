//! Formula tokens
//!
//! A formula is evaluated as a flat sequence of tokens, each carrying a kind,
//! a subkind and its source text. Numbers travel through the evaluator as
//! text and are parsed at the point of use.

use std::fmt;

/// Primary classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Operand,
    Function,
    Subexpression,
    Argument,
    OperatorPrefix,
    OperatorInfix,
    OperatorPostfix,
    Whitespace,
    Unknown,
}

/// Secondary classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSubKind {
    Nothing,
    /// Opening `name(` or `(`
    Start,
    /// Closing `)`
    Stop,
    Text,
    Number,
    /// `TRUE`/`FALSE` operands and comparison operators
    Logical,
    Error,
    /// Cell reference, range or 3-D reference operand
    Range,
    Math,
    Concatenation,
    Intersection,
    Union,
}

/// A single lexical unit of a formula
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub subkind: TokenSubKind,
    pub value: String,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, subkind: TokenSubKind, value: S) -> Self {
        Self {
            kind,
            subkind,
            value: value.into(),
        }
    }

    /// A numeric operand
    pub fn number<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Operand, TokenSubKind::Number, value)
    }

    /// A text operand
    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Operand, TokenSubKind::Text, value)
    }

    /// A reference operand (`A1`, `A1:B2`, `Sheet2!C3`)
    pub fn range<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Operand, TokenSubKind::Range, value)
    }

    pub fn is_operand(&self) -> bool {
        self.kind == TokenKind::Operand
    }

    pub fn is_range(&self) -> bool {
        self.kind == TokenKind::Operand && self.subkind == TokenSubKind::Range
    }

    pub fn is_function_start(&self) -> bool {
        self.kind == TokenKind::Function && self.subkind == TokenSubKind::Start
    }

    pub fn is_function_stop(&self) -> bool {
        self.kind == TokenKind::Function && self.subkind == TokenSubKind::Stop
    }

    pub fn is_subexpression_start(&self) -> bool {
        self.kind == TokenKind::Subexpression && self.subkind == TokenSubKind::Start
    }

    pub fn is_subexpression_stop(&self) -> bool {
        self.kind == TokenKind::Subexpression && self.subkind == TokenSubKind::Stop
    }

    /// Unary minus
    pub fn is_negation(&self) -> bool {
        self.kind == TokenKind::OperatorPrefix && self.value == "-"
    }
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Operand => "Operand",
            TokenKind::Function => "Function",
            TokenKind::Subexpression => "Subexpression",
            TokenKind::Argument => "Argument",
            TokenKind::OperatorPrefix => "OperatorPrefix",
            TokenKind::OperatorInfix => "OperatorInfix",
            TokenKind::OperatorPostfix => "OperatorPostfix",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Unknown => "Unknown",
        }
    }
}

impl TokenSubKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSubKind::Nothing => "Nothing",
            TokenSubKind::Start => "Start",
            TokenSubKind::Stop => "Stop",
            TokenSubKind::Text => "Text",
            TokenSubKind::Number => "Number",
            TokenSubKind::Logical => "Logical",
            TokenSubKind::Error => "Error",
            TokenSubKind::Range => "Range",
            TokenSubKind::Math => "Math",
            TokenSubKind::Concatenation => "Concatenation",
            TokenSubKind::Intersection => "Intersection",
            TokenSubKind::Union => "Union",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TokenSubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind, subkind and value in aligned columns
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:<14} {}", self.kind, self.subkind, self.value)
    }
}
