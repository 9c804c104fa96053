//! `${ ... }` interpolation
//!
//! Literal text is copied through. Each `${ expr }` is parsed, evaluated
//! against the variable bindings and replaced by the value's string form.
//! `$${` produces a literal `${`.
//!
//! Expression grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/" | "%") unary)*
//! unary   := "-" unary | primary
//! primary := INT | FLOAT | STRING | "true" | "false" | IDENT | "(" expr ")"
//! ```

use super::value::{Number, Value, Variables};
use super::{RenderError, Renderer};
use std::fmt;

/// The bundled [`Renderer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

impl Interpolator {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for Interpolator {
    fn render(&self, raw: &[u8], vars: &Variables) -> Result<String, RenderError> {
        let text = std::str::from_utf8(raw).map_err(|e| RenderError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        render_str(text, vars)
    }
}

/// Render template text against `vars`
pub fn render_str(text: &str, vars: &Variables) -> Result<String, RenderError> {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('$') {
        let at = pos + offset;
        out.push_str(&text[pos..at]);
        let tail = &text[at..];

        if tail.starts_with("$${") {
            out.push_str("${");
            pos = at + 3;
        } else if tail.starts_with("${") {
            let mut parser = Parser::new(text, at + 2);
            let expr = parser.interpolation()?;
            out.push_str(&eval(&expr, vars)?.to_string());
            pos = parser.pos;
        } else {
            out.push('$');
            pos = at + 1;
        }
    }

    out.push_str(&text[pos..]);
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    RBrace,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(i) => write!(f, "number {}", i),
            Token::Float(x) => write!(f, "number {}", x),
            Token::Str(_) => f.write_str("string literal"),
            Token::Bool(b) => write!(f, "'{}'", b),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::RBrace => f.write_str("'}'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    fn apply(self, lhs: Number, rhs: Number) -> Result<Number, RenderError> {
        match (lhs, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let out = match self {
                    BinOp::Add => a.checked_add(b),
                    BinOp::Sub => a.checked_sub(b),
                    BinOp::Mul => a.checked_mul(b),
                    BinOp::Div | BinOp::Rem if b == 0 => return Err(RenderError::DivisionByZero),
                    BinOp::Div => a.checked_div(b),
                    BinOp::Rem => a.checked_rem(b),
                };
                out.map(Number::Int).ok_or(RenderError::Overflow)
            }
            (lhs, rhs) => {
                let (a, b) = (lhs.as_f64(), rhs.as_f64());
                if matches!(self, BinOp::Div | BinOp::Rem) && b == 0.0 {
                    return Err(RenderError::DivisionByZero);
                }
                Ok(Number::Float(match self {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Rem => a % b,
                }))
            }
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

fn eval(expr: &Expr, vars: &Variables) -> Result<Value, RenderError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Var(name) => vars
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::UndefinedVariable { name: name.clone() }),
        Expr::Neg(inner) => {
            let value = eval(inner, vars)?;
            match value.as_number() {
                Some(Number::Int(i)) => i.checked_neg().map(Value::Int).ok_or(RenderError::Overflow),
                Some(Number::Float(x)) => Ok(Value::Float(-x)),
                None => Err(RenderError::TypeMismatch(format!(
                    "cannot negate {}",
                    value.type_name()
                ))),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, vars)?;
            let rhs = eval(rhs, vars)?;
            match (lhs.as_number(), rhs.as_number()) {
                (Some(a), Some(b)) => op.apply(a, b).map(Value::from),
                _ => Err(RenderError::TypeMismatch(format!(
                    "cannot apply '{}' to {} and {}",
                    op,
                    lhs.type_name(),
                    rhs.type_name()
                ))),
            }
        }
    }
}

/// Maximum nesting of parentheses and unary minus inside one interpolation
const MAX_NESTING_DEPTH: usize = 64;

/// Maximum binary operators inside one interpolation. Bounds the depth of the
/// left-leaning tree that `eval` recurses over.
const MAX_OPERATORS: usize = 256;

/// Recursive-descent parser over one interpolation, starting just after `${`
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    peeked: Option<(usize, Token)>,
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            pos,
            peeked: None,
            depth: 0,
            operators: 0,
        }
    }

    fn enter(&mut self, at: usize) -> Result<(), RenderError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error(at, "expression nested too deeply"));
        }
        Ok(())
    }

    fn count_operator(&mut self, at: usize) -> Result<(), RenderError> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(self.error(at, "expression has too many operators"));
        }
        Ok(())
    }

    /// Parse `expr }`, leaving `pos` just past the closing brace
    fn interpolation(&mut self) -> Result<Expr, RenderError> {
        let opening = self.pos - 2;
        if let (at, Token::RBrace) = self.peek()? {
            return Err(self.error(at, "empty interpolation"));
        }
        let expr = self.expr()?;
        match self.next()? {
            (_, Token::RBrace) => Ok(expr),
            (_, Token::Eof) => Err(self.error(opening, "unterminated interpolation, expected '}'")),
            (at, token) => Err(self.error(at, format!("unexpected {}, expected '}}'", token))),
        }
    }

    fn expr(&mut self) -> Result<Expr, RenderError> {
        let mut lhs = self.term()?;
        loop {
            let (at, op) = match self.peek()? {
                (at, Token::Plus) => (at, BinOp::Add),
                (at, Token::Minus) => (at, BinOp::Sub),
                _ => return Ok(lhs),
            };
            self.next()?;
            self.count_operator(at)?;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, RenderError> {
        let mut lhs = self.unary()?;
        loop {
            let (at, op) = match self.peek()? {
                (at, Token::Star) => (at, BinOp::Mul),
                (at, Token::Slash) => (at, BinOp::Div),
                (at, Token::Percent) => (at, BinOp::Rem),
                _ => return Ok(lhs),
            };
            self.next()?;
            self.count_operator(at)?;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, RenderError> {
        if let (at, Token::Minus) = self.peek()? {
            self.next()?;
            self.enter(at)?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, RenderError> {
        match self.next()? {
            (_, Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            (_, Token::Float(x)) => Ok(Expr::Literal(Value::Float(x))),
            (_, Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            (_, Token::Bool(b)) => Ok(Expr::Literal(Value::Bool(b))),
            (_, Token::Ident(name)) => Ok(Expr::Var(name)),
            (at, Token::LParen) => {
                self.enter(at)?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next()? {
                    (_, Token::RParen) => Ok(inner),
                    (at, token) => Err(self.error(at, format!("expected ')', found {}", token))),
                }
            }
            (at, token) => Err(self.error(at, format!("expected an expression, found {}", token))),
        }
    }

    fn peek(&mut self) -> Result<(usize, Token), RenderError> {
        match &self.peeked {
            Some(token) => Ok(token.clone()),
            None => {
                let token = self.lex()?;
                self.peeked = Some(token.clone());
                Ok(token)
            }
        }
    }

    fn next(&mut self) -> Result<(usize, Token), RenderError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lex(),
        }
    }

    fn lex(&mut self) -> Result<(usize, Token), RenderError> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        let start = self.pos;
        let Some(&b) = bytes.get(start) else {
            return Ok((start, Token::Eof));
        };

        let single = match b {
            b'+' => Some(Token::Plus),
            b'-' => Some(Token::Minus),
            b'*' => Some(Token::Star),
            b'/' => Some(Token::Slash),
            b'%' => Some(Token::Percent),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b'}' => Some(Token::RBrace),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok((start, token));
        }

        if b.is_ascii_digit() {
            return self.number(start);
        }
        if b == b'"' {
            return self.string(start);
        }
        if b.is_ascii_alphabetic() || b == b'_' {
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            let token = match &self.src[start..self.pos] {
                "true" => Token::Bool(true),
                "false" => Token::Bool(false),
                name => Token::Ident(name.to_string()),
            };
            return Ok((start, token));
        }

        let ch = self.src[start..].chars().next().unwrap_or_default();
        Err(self.error(start, format!("unexpected character {:?}", ch)))
    }

    fn number(&mut self, start: usize) -> Result<(usize, Token), RenderError> {
        let bytes = self.src.as_bytes();
        let digits = |pos: &mut usize| {
            while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
                *pos += 1;
            }
        };

        digits(&mut self.pos);
        let is_float = bytes.get(self.pos) == Some(&b'.')
            && bytes.get(self.pos + 1).is_some_and(|b| b.is_ascii_digit());
        if is_float {
            self.pos += 1;
            digits(&mut self.pos);
        }

        let literal = &self.src[start..self.pos];
        let token = if is_float {
            literal
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|e| self.error(start, e.to_string()))?
        } else {
            literal
                .parse::<i64>()
                .map(Token::Int)
                .map_err(|_| RenderError::Overflow)?
        };
        Ok((start, token))
    }

    fn string(&mut self, start: usize) -> Result<(usize, Token), RenderError> {
        let body = start + 1;
        let mut out = String::new();
        let mut chars = self.src[body..].char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos = body + i + 1;
                    return Ok((start, Token::Str(out)));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, '"')) => out.push('"'),
                    Some((_, '\\')) => out.push('\\'),
                    Some((j, other)) => {
                        return Err(self.error(
                            body + j - 1,
                            format!("unknown escape sequence \\{}", other),
                        ))
                    }
                    None => break,
                },
                _ => out.push(c),
            }
        }

        Err(self.error(start, "unterminated string literal"))
    }

    fn error(&self, at: usize, message: impl Into<String>) -> RenderError {
        let before = &self.src[..at];
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().unwrap_or("").chars().count() + 1;
        RenderError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}
