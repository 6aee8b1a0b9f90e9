//! The row-filter expression language.
//!
//! Expressions reference columns by name and combine comparisons with
//! `and`/`or`/`not` (symbolic forms `&&`, `||`, `!` are accepted). A query
//! string is tokenized and parsed once into an [`Expr`], identifiers are
//! bound against the table's columns, and the tree is then interpreted per
//! row.
//!
//! ```text
//! expr    := or
//! or      := and ( ("or" | "||") and )*
//! and     := unary ( ("and" | "&&") unary )*
//! unary   := ("not" | "!") unary | cmp
//! cmp     := primary ( ("==" | "!=" | "<" | "<=" | ">" | ">=") primary )?
//! primary := identifier | number | string | "true" | "false" | "(" expr ")"
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SiftError};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference, resolved against the row at evaluation time.
    Column(String),
    /// Literal value.
    Literal(Value),
    /// Comparison (left op right).
    Compare {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting conjunction/disjunction.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Boolean negation.
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if *self == LogicalOp::And { "and" } else { "or" })
    }
}

impl Expr {
    /// Check that every column reference names a column in `index`.
    ///
    /// Runs before any row is evaluated so an unknown identifier fails the
    /// whole query instead of surfacing mid-scan.
    pub fn validate(&self, index: &HashMap<String, usize>) -> Result<()> {
        match self {
            Expr::Column(name) => {
                if index.contains_key(name) {
                    Ok(())
                } else {
                    Err(SiftError::invalid_query(format!(
                        "unknown column `{}`",
                        name
                    )))
                }
            }
            Expr::Literal(_) => Ok(()),
            Expr::Compare { left, right, .. } | Expr::Logical { left, right, .. } => {
                left.validate(index)?;
                right.validate(index)
            }
            Expr::Not(inner) => inner.validate(index),
        }
    }

    /// Evaluate against one row. `index` maps column names to positions in
    /// `row`; [`validate`](Self::validate) must have accepted it first.
    pub fn eval(&self, row: &[Value], index: &HashMap<String, usize>) -> Result<Value> {
        match self {
            Expr::Column(name) => {
                let i = index.get(name).ok_or_else(|| {
                    SiftError::invalid_query(format!("unknown column `{}`", name))
                })?;
                row.get(*i).cloned().ok_or_else(|| {
                    SiftError::invalid_query(format!("row is missing a value for `{}`", name))
                })
            }
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Compare { op, left, right } => {
                let lhs = left.eval(row, index)?;
                let rhs = right.eval(row, index)?;
                compare(*op, &lhs, &rhs).map(Value::Boolean)
            }
            Expr::Logical { op, left, right } => {
                let lhs = expect_boolean(left.eval(row, index)?, *op)?;
                match (op, lhs) {
                    (LogicalOp::And, false) => Ok(Value::Boolean(false)),
                    (LogicalOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => {
                        let rhs = expect_boolean(right.eval(row, index)?, *op)?;
                        Ok(Value::Boolean(rhs))
                    }
                }
            }
            Expr::Not(inner) => match inner.eval(row, index)? {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(SiftError::invalid_query(format!(
                    "`not` expects a boolean operand, got {}",
                    other.data_type()
                ))),
            },
        }
    }
}

fn expect_boolean(value: Value, op: LogicalOp) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(SiftError::invalid_query(format!(
            "`{}` expects boolean operands, got {}",
            op,
            other.data_type()
        ))),
    }
}

/// Typed comparison. Numbers order numerically (mixed int/float widens to
/// f64), strings lexicographically. Booleans support `==`/`!=` only. Null
/// compares equal to nothing: `!=` is true, every other comparison false.
fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    use Value::*;

    if matches!(lhs, Null) || matches!(rhs, Null) {
        return Ok(op == CmpOp::Ne);
    }

    let ord = match (lhs, rhs) {
        (Int64(a), Int64(b)) => Some(a.cmp(b)),
        (Int64(a), Float64(b)) => (*a as f64).partial_cmp(b),
        (Float64(a), Int64(b)) => a.partial_cmp(&(*b as f64)),
        (Float64(a), Float64(b)) => a.partial_cmp(b),
        (String(a), String(b)) => Some(a.cmp(b)),
        (Boolean(a), Boolean(b)) => {
            return match op {
                CmpOp::Eq => Ok(a == b),
                CmpOp::Ne => Ok(a != b),
                _ => Err(SiftError::invalid_query(format!(
                    "cannot order boolean values with `{}`",
                    op
                ))),
            }
        }
        (l, r) => {
            return Err(SiftError::invalid_query(format!(
                "cannot compare {} with {}",
                l.data_type(),
                r.data_type()
            )))
        }
    };

    // NaN on either side: no ordering, same treatment as null.
    let Some(ord) = ord else {
        return Ok(op == CmpOp::Ne);
    };

    Ok(match op {
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "`{}`", s),
            Token::Int(i) => write!(f, "`{}`", i),
            Token::Float(x) => write!(f, "`{}`", x),
            Token::Str(s) => write!(f, "'{}'", s),
            Token::Bool(b) => write!(f, "`{}`", b),
            Token::And => write!(f, "`and`"),
            Token::Or => write!(f, "`or`"),
            Token::Not => write!(f, "`not`"),
            Token::Eq => write!(f, "`==`"),
            Token::Ne => write!(f, "`!=`"),
            Token::Lt => write!(f, "`<`"),
            Token::Le => write!(f, "`<=`"),
            Token::Gt => write!(f, "`>`"),
            Token::Ge => write!(f, "`>=`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'(' => {
                tokens.push((start, Token::LParen));
                i += 1;
            }
            b')' => {
                tokens.push((start, Token::RParen));
                i += 1;
            }
            b'=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Eq));
                    i += 2;
                } else {
                    return Err(SiftError::invalid_query(format!(
                        "unexpected `=` at position {} (use `==` for equality)",
                        start
                    )));
                }
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Ne));
                    i += 2;
                } else {
                    tokens.push((start, Token::Not));
                    i += 1;
                }
            }
            b'<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Le));
                    i += 2;
                } else {
                    tokens.push((start, Token::Lt));
                    i += 1;
                }
            }
            b'>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Ge));
                    i += 2;
                } else {
                    tokens.push((start, Token::Gt));
                    i += 1;
                }
            }
            b'&' => {
                tokens.push((start, Token::And));
                i += if bytes.get(i + 1) == Some(&b'&') { 2 } else { 1 };
            }
            b'|' => {
                tokens.push((start, Token::Or));
                i += if bytes.get(i + 1) == Some(&b'|') { 2 } else { 1 };
            }
            b'\'' | b'"' => {
                let (token, next) = lex_string(src, i, c as char)?;
                tokens.push((start, token));
                i = next;
            }
            b'0'..=b'9' | b'.' => {
                let (token, next) = lex_number(src, i)?;
                tokens.push((start, token));
                i = next;
            }
            b'-' | b'+' if matches!(bytes.get(i + 1), Some(b'0'..=b'9') | Some(b'.')) => {
                let (token, next) = lex_number(src, i)?;
                tokens.push((start, token));
                i = next;
            }
            _ if c == b'_' || (c as char).is_ascii_alphabetic() => {
                let mut end = i + 1;
                while end < bytes.len()
                    && (bytes[end] == b'_' || (bytes[end] as char).is_ascii_alphanumeric())
                {
                    end += 1;
                }
                let word = &src[i..end];
                let token = match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    _ => Token::Ident(word.to_string()),
                };
                tokens.push((start, token));
                i = end;
            }
            _ => {
                // Report the full character, not the leading byte.
                let ch = src[i..].chars().next().unwrap_or('?');
                return Err(SiftError::invalid_query(format!(
                    "unexpected character `{}` at position {}",
                    ch, start
                )));
            }
        }
    }

    Ok(tokens)
}

fn lex_string(src: &str, start: usize, quote: char) -> Result<(Token, usize)> {
    let mut out = String::new();
    let mut chars = src[start..].char_indices().skip(1);

    while let Some((off, c)) = chars.next() {
        if c == quote {
            return Ok((Token::Str(out), start + off + c.len_utf8()));
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) if escaped == quote || escaped == '\\' => out.push(escaped),
                Some((_, escaped)) => {
                    return Err(SiftError::invalid_query(format!(
                        "unsupported escape `\\{}` in string literal at position {}",
                        escaped, start
                    )))
                }
                None => break,
            }
        } else {
            out.push(c);
        }
    }

    Err(SiftError::invalid_query(format!(
        "unterminated string literal at position {}",
        start
    )))
}

fn lex_number(src: &str, start: usize) -> Result<(Token, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;

    if matches!(bytes.get(end), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'-') | Some(b'+')) {
            exp += 1;
        }
        if matches!(bytes.get(exp), Some(b) if b.is_ascii_digit()) {
            end = exp;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }

    let text = &src[start..end];
    if let Ok(i) = text.parse::<i64>() {
        return Ok((Token::Int(i), end));
    }
    match text.parse::<f64>() {
        Ok(f) => Ok((Token::Float(f), end)),
        Err(_) => Err(SiftError::invalid_query(format!(
            "invalid number literal `{}` at position {}",
            text, start
        ))),
    }
}

/// Parse a query string into an expression tree.
pub fn parse(src: &str) -> Result<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;

    if let Some((at, token)) = parser.peek_entry() {
        return Err(SiftError::invalid_query(format!(
            "unexpected {} at position {}",
            token, at
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek_entry(&self) -> Option<(usize, &Token)> {
        self.tokens.get(self.pos).map(|(at, t)| (*at, t))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let entry = self.tokens.get(self.pos).cloned();
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_primary()?;

        let op = match self.peek() {
            Some(Token::Eq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_primary()?;
        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some((_, Token::Ident(name))) => Ok(Expr::Column(name)),
            Some((_, Token::Int(i))) => Ok(Expr::Literal(Value::Int64(i))),
            Some((_, Token::Float(x))) => Ok(Expr::Literal(Value::Float64(x))),
            Some((_, Token::Str(s))) => Ok(Expr::Literal(Value::String(s))),
            Some((_, Token::Bool(b))) => Ok(Expr::Literal(Value::Boolean(b))),
            Some((_, Token::LParen)) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((at, token)) => Err(SiftError::invalid_query(format!(
                        "expected `)` at position {}, found {}",
                        at, token
                    ))),
                    None => Err(SiftError::invalid_query(
                        "expected `)` before end of expression",
                    )),
                }
            }
            Some((at, token)) => Err(SiftError::invalid_query(format!(
                "expected a value or column name at position {}, found {}",
                at, token
            ))),
            None => Err(SiftError::invalid_query("unexpected end of expression")),
        }
    }
}
