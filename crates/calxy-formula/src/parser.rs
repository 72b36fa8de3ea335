//! Formula parser
//!
//! A recursive descent parser that scans the formula text directly with one
//! or two characters of lookahead. There is no separate tokenizing pass.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! comparison := additive (("=" | "<>" | "<" | "<=" | ">" | ">=") additive)*
//! additive   := term (("+" | "-") term)*
//! term       := factor (("*" | "/") factor)*
//! factor     := "(" comparison ")" | string | number | identifier
//! identifier := NAME "(" [arg ("," arg)*] ")" | TRUE | FALSE | CELLREF | NAME
//! arg        := comparison [":" comparison]
//! ```
//!
//! The `:` range operator is only accepted inside argument lists, and only
//! between two cell references.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult, ParseError};
use calxy_core::{CellAddress, CellRange};
use lazy_regex::regex_captures;

/// Parse a cell's raw text into an AST
///
/// Returns `Ok(None)` when the text does not start with `=`; the caller
/// decides how to store literal text. Malformed formulas fail with
/// [`FormulaError::Parse`], which carries the full text and the root cause.
///
/// # Example
/// ```rust
/// use calxy_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// assert!(ast.is_some());
///
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// assert!(ast.is_some());
///
/// assert!(parse_formula("plain text").unwrap().is_none());
/// assert!(parse_formula("=1++2").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Option<FormulaExpr>> {
    let Some(body) = formula.strip_prefix('=') else {
        return Ok(None);
    };

    FormulaParser::new(body)
        .parse()
        .map(Some)
        .map_err(|source| FormulaError::Parse {
            formula: formula.to_string(),
            source,
        })
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> ParseResult<FormulaExpr> {
        let expr = self.parse_expression()?;

        // Make sure we consumed all input
        self.skip_whitespace();
        if let Some(ch) = self.peek_char() {
            return Err(ParseError::TrailingInput { ch, pos: self.pos });
        }

        Ok(expr)
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek_char() {
            Some(ch) => ParseError::UnexpectedChar { ch, pos: self.pos },
            None => ParseError::UnexpectedEnd,
        }
    }

    // === Expression parsing with precedence ===

    fn parse_expression(&mut self) -> ParseResult<FormulaExpr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<FormulaExpr> {
        let mut left = self.parse_additive()?;

        loop {
            self.skip_whitespace();

            // Longest match first: "<=", "<>" and ">=" before "<" and ">"
            let (op, width) = match (self.peek_char(), self.peek_char_at(1)) {
                (Some('<'), Some('=')) => (BinaryOperator::LessEqual, 2),
                (Some('<'), Some('>')) => (BinaryOperator::NotEqual, 2),
                (Some('<'), _) => (BinaryOperator::LessThan, 1),
                (Some('>'), Some('=')) => (BinaryOperator::GreaterEqual, 2),
                (Some('>'), _) => (BinaryOperator::GreaterThan, 1),
                (Some('='), _) => (BinaryOperator::Equal, 1),
                _ => break,
            };

            self.advance_by(width);
            let right = self.parse_additive()?;
            left = FormulaExpr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('+') => BinaryOperator::Add,
                Some('-') => BinaryOperator::Subtract,
                _ => break,
            };

            self.advance();
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<FormulaExpr> {
        let mut left = self.parse_factor()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('*') => BinaryOperator::Multiply,
                Some('/') => BinaryOperator::Divide,
                _ => break,
            };

            self.advance();
            let right = self.parse_factor()?;
            left = FormulaExpr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<FormulaExpr> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('"') => self.parse_string(),
            Some('(') => {
                self.advance();
                let expr = self.parse_expression()?;
                self.skip_whitespace();
                if self.peek_char() != Some(')') {
                    return Err(ParseError::MissingCloseParen { pos: self.pos });
                }
                self.advance();
                Ok(expr)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() => self.parse_identifier(),
            _ => Err(self.unexpected()),
        }
    }

    /// String literal: double-quoted, no escapes
    fn parse_string(&mut self) -> ParseResult<FormulaExpr> {
        self.advance(); // Skip opening quote

        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '"' {
                let s = self.input[start..self.pos].to_string();
                self.advance(); // Skip closing quote
                return Ok(FormulaExpr::String(s));
            }
            self.advance();
        }

        Err(ParseError::UnterminatedString)
    }

    /// Number literal: a run of digits and dots
    fn parse_number(&mut self) -> ParseResult<FormulaExpr> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_digit() || c == '.')
        {
            self.advance();
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map(FormulaExpr::Number)
            .map_err(|_| ParseError::InvalidNumber(num_str.to_string()))
    }

    fn parse_identifier(&mut self) -> ParseResult<FormulaExpr> {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_alphanumeric()) {
            self.advance();
        }
        let name = self.input[start..self.pos].to_uppercase();

        self.skip_whitespace();
        if self.peek_char() == Some('(') {
            return self.parse_function_call(name);
        }

        match name.as_str() {
            "TRUE" => Ok(FormulaExpr::Boolean(true)),
            "FALSE" => Ok(FormulaExpr::Boolean(false)),
            _ => match regex_captures!(r"^([A-Z]+)([1-9][0-9]*)$", name.as_str()) {
                Some((_, letters, digits)) => Self::cell_reference(&name, letters, digits),
                None => Ok(FormulaExpr::NameRef(name)),
            },
        }
    }

    fn cell_reference(name: &str, letters: &str, digits: &str) -> ParseResult<FormulaExpr> {
        let invalid = || ParseError::InvalidCellReference(name.to_string());
        let col = CellAddress::letters_to_column(letters).map_err(|_| invalid())?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        Ok(FormulaExpr::CellRef(CellAddress::new(row - 1, col)))
    }

    fn parse_function_call(&mut self, name: String) -> ParseResult<FormulaExpr> {
        self.advance(); // Skip '('

        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek_char() != Some(')') {
            loop {
                args.push(self.parse_range_expression()?);
                self.skip_whitespace();
                match self.peek_char() {
                    Some(')') => break,
                    Some(',') => self.advance(),
                    Some(ch) => return Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
                    None => return Err(ParseError::MissingCloseParen { pos: self.pos }),
                }
            }
        }

        self.advance(); // Skip ')'
        Ok(FormulaExpr::Function { name, args })
    }

    /// A function argument: an expression, or `CELLREF:CELLREF`
    fn parse_range_expression(&mut self) -> ParseResult<FormulaExpr> {
        let start = self.parse_expression()?;

        self.skip_whitespace();
        if self.peek_char() != Some(':') {
            return Ok(start);
        }

        self.advance(); // Skip ':'
        let end = self.parse_expression()?;
        match (start, end) {
            (FormulaExpr::CellRef(start), FormulaExpr::CellRef(end)) => {
                Ok(FormulaExpr::Range(CellRange::new(start, end)))
            }
            _ => Err(ParseError::InvalidRange),
        }
    }
}
