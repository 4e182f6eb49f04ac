//! Formula tokenizer
//!
//! Splits formula text into the flat [`Token`] stream the evaluator consumes.
//! References are not interpreted here: `A1`, `A1:B3` and `'My Sheet'!C2`
//! each come out as a single `Operand/Range` token.

use lazy_regex::regex_is_match;

use crate::token::{Token, TokenKind, TokenSubKind};

/// Error literals recognized as operands, longest first
const ERROR_LITERALS: &[&str] = &[
    "#GETTING_DATA",
    "#DIV/0!",
    "#SPILL!",
    "#VALUE!",
    "#CALC!",
    "#NAME?",
    "#NULL!",
    "#NUM!",
    "#REF!",
    "#N/A",
];

/// Tokenize a formula.
///
/// Returns an empty vector when the text is not a formula (does not start
/// with `=`) or has nothing after the `=`.
///
/// # Example
/// ```rust
/// use gridcalc_formula::{tokenize, TokenKind, TokenSubKind};
///
/// let tokens = tokenize("=SUM(A1:A3)*2");
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0].kind, TokenKind::Function);
/// assert_eq!(tokens[1].subkind, TokenSubKind::Range);
/// assert_eq!(tokens[1].value, "A1:A3");
/// ```
pub fn tokenize(formula: &str) -> Vec<Token> {
    let formula = formula.trim();
    let body = match formula.strip_prefix('=') {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Vec::new(),
    };

    let mut tokenizer = Tokenizer::new(body);
    tokenizer.run();
    tokenizer.tokens
}

/// Which construct an open parenthesis belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Function,
    Subexpression,
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Pending operand text
    buffer: String,
    groups: Vec<Group>,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            buffer: String::new(),
            groups: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.peek_char() {
            // Quoted sheet names belong to the reference being built
            if c == '\'' {
                self.scan_quoted_sheet();
                continue;
            }

            if c == '"' {
                self.flush_operand();
                self.scan_string();
                continue;
            }

            if c == '#' && self.buffer.is_empty() {
                if let Some(literal) = self.match_error_literal() {
                    self.pos += literal.len();
                    self.push(TokenKind::Operand, TokenSubKind::Error, literal);
                    continue;
                }
            }

            // Scientific notation: 1.5E+3 keeps its sign
            if (c == '+' || c == '-') && regex_is_match!(r"^[1-9](\.[0-9]+)?[Ee]$", &self.buffer) {
                self.buffer.push(c);
                self.advance();
                continue;
            }

            match c {
                c if c.is_whitespace() => {
                    self.flush_operand();
                    self.advance();
                }
                '(' => {
                    self.advance();
                    if self.buffer.is_empty() {
                        self.groups.push(Group::Subexpression);
                        self.push(TokenKind::Subexpression, TokenSubKind::Start, "(");
                    } else {
                        let name = std::mem::take(&mut self.buffer).to_uppercase();
                        self.groups.push(Group::Function);
                        self.push(TokenKind::Function, TokenSubKind::Start, name);
                    }
                }
                ')' => {
                    self.flush_operand();
                    self.advance();
                    match self.groups.pop() {
                        Some(Group::Function) => {
                            self.push(TokenKind::Function, TokenSubKind::Stop, ")")
                        }
                        Some(Group::Subexpression) => {
                            self.push(TokenKind::Subexpression, TokenSubKind::Stop, ")")
                        }
                        None => self.push(TokenKind::Unknown, TokenSubKind::Nothing, ")"),
                    }
                }
                ',' => {
                    self.flush_operand();
                    self.advance();
                    if self.groups.last() == Some(&Group::Function) {
                        self.push(TokenKind::Argument, TokenSubKind::Nothing, ",");
                    } else {
                        self.push(TokenKind::OperatorInfix, TokenSubKind::Union, ",");
                    }
                }
                '+' | '-' => {
                    self.flush_operand();
                    self.advance();
                    if self.previous_ends_operand() {
                        self.push(TokenKind::OperatorInfix, TokenSubKind::Math, c.to_string());
                    } else if c == '-' {
                        self.push(TokenKind::OperatorPrefix, TokenSubKind::Nothing, "-");
                    }
                    // prefix '+' is the identity and produces no token
                }
                '*' | '/' | '^' => {
                    self.flush_operand();
                    self.advance();
                    self.push(TokenKind::OperatorInfix, TokenSubKind::Math, c.to_string());
                }
                '&' => {
                    self.flush_operand();
                    self.advance();
                    self.push(TokenKind::OperatorInfix, TokenSubKind::Concatenation, "&");
                }
                '=' | '<' | '>' => {
                    self.flush_operand();
                    self.advance();
                    let mut op = c.to_string();
                    if let Some(next) = self.peek_char() {
                        if (c == '<' && (next == '=' || next == '>')) || (c == '>' && next == '=') {
                            op.push(next);
                            self.advance();
                        }
                    }
                    self.push(TokenKind::OperatorInfix, TokenSubKind::Logical, op);
                }
                '%' => {
                    self.flush_operand();
                    self.advance();
                    self.push(TokenKind::OperatorPostfix, TokenSubKind::Nothing, "%");
                }
                '{' | '}' => {
                    self.flush_operand();
                    self.advance();
                    self.push(TokenKind::Unknown, TokenSubKind::Nothing, c.to_string());
                }
                _ => {
                    self.buffer.push(c);
                    self.advance();
                }
            }
        }

        self.flush_operand();
    }

    /// `"..."` with `""` as an escaped quote
    fn scan_string(&mut self) {
        self.advance(); // opening quote

        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            self.advance();
            if c == '"' {
                if self.peek_char() == Some('"') {
                    text.push('"');
                    self.advance();
                } else {
                    break;
                }
            } else {
                text.push(c);
            }
        }

        self.push(TokenKind::Operand, TokenSubKind::Text, text);
    }

    /// `'Sheet name'` copied verbatim, quotes included, into the operand buffer
    fn scan_quoted_sheet(&mut self) {
        self.buffer.push('\'');
        self.advance();

        while let Some(c) = self.peek_char() {
            self.buffer.push(c);
            self.advance();
            if c == '\'' {
                if self.peek_char() == Some('\'') {
                    self.buffer.push('\'');
                    self.advance();
                } else {
                    break;
                }
            }
        }
    }

    fn match_error_literal(&self) -> Option<&'static str> {
        let rest = &self.input[self.pos..];
        ERROR_LITERALS.iter().copied().find(|literal| {
            rest.get(..literal.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(literal))
        })
    }

    /// Whether a following `+`/`-` is binary
    fn previous_ends_operand(&self) -> bool {
        match self.tokens.last() {
            Some(token) => {
                token.kind == TokenKind::Operand
                    || token.kind == TokenKind::OperatorPostfix
                    || token.subkind == TokenSubKind::Stop
            }
            None => false,
        }
    }

    fn flush_operand(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        let subkind = operand_subkind(&text);
        self.push(TokenKind::Operand, subkind, text);
    }

    fn push<S: Into<String>>(&mut self, kind: TokenKind, subkind: TokenSubKind, value: S) {
        self.tokens.push(Token::new(kind, subkind, value));
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

fn operand_subkind(text: &str) -> TokenSubKind {
    if regex_is_match!(r"^([0-9]+\.?[0-9]*|\.[0-9]+)([Ee][+-]?[0-9]+)?$", text) {
        TokenSubKind::Number
    } else if text.eq_ignore_ascii_case("TRUE") || text.eq_ignore_ascii_case("FALSE") {
        TokenSubKind::Logical
    } else {
        TokenSubKind::Range
    }
}
