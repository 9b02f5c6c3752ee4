//! Formula tokenizer and recursive-descent parser.
//!
//! Formulas are plain arithmetic over numbers and cell references:
//!
//! ```text
//! expr    ::= term   ( ( "+" | "-" ) term )*
//! term    ::= unary  ( ( "*" | "/" ) unary )*
//! unary   ::= ( "+" | "-" ) unary | primary
//! primary ::= NUMBER | CELLREF | "(" expr ")"
//! ```
//!
//! The leading `=` marker is not part of the grammar; callers strip it.

use super::cell_ref::CellRef;
use super::eval::FormulaError;

/// Parentheses and unary operators nest at most this deep.
const MAX_NESTING: usize = 256;

/// Most tokens a formula may have. Binary operators chain in loops rather
/// than recursion, so this bounds the depth of the tree they build.
const MAX_TOKENS: usize = 8192;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ref(CellRef),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed formula expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Ref(CellRef),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Every cell reference in the expression, in source order (may repeat).
    pub fn references(&self) -> Vec<CellRef> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Number(_) => {}
                Expr::Ref(cell) => out.push(*cell),
                Expr::Neg(inner) => stack.push(inner),
                Expr::Binary { lhs, rhs, .. } => {
                    stack.push(rhs);
                    stack.push(lhs);
                }
            }
        }
        out
    }
}

/// Parse a formula body (without the leading `=`).
pub fn parse_formula(source: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(FormulaError::Syntax(format!("unexpected token {:?}", tok)));
    }
    Ok(expr)
}

fn tokenize(source: &str) -> Result<Vec<Token>, FormulaError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if tokens.len() >= MAX_TOKENS {
            return Err(FormulaError::Syntax(format!(
                "more than {} tokens",
                MAX_TOKENS
            )));
        }
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let (number, next) = lex_number(source, i)?;
                tokens.push(Token::Number(number));
                i = next;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let text = &source[start..i];
                let cell = CellRef::parse(text)
                    .map_err(|_| FormulaError::Syntax(format!("unknown name {:?}", text)))?;
                tokens.push(Token::Ref(cell));
            }
            _ => {
                let ch = source[i..].chars().next().unwrap_or('?');
                return Err(FormulaError::Syntax(format!(
                    "unexpected character {:?} at {}",
                    ch, i
                )));
            }
        }
    }

    Ok(tokens)
}

/// Lex `digits [. digits] [e [+-] digits]` starting at `start`.
fn lex_number(source: &str, start: usize) -> Result<(f64, usize), FormulaError> {
    let bytes = source.as_bytes();
    let mut i = start;
    let digits = |i: &mut usize| {
        let from = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - from
    };

    let mut mantissa = digits(&mut i);
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return Err(FormulaError::Syntax(format!("malformed number at {}", start)));
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if digits(&mut j) > 0 {
            i = j;
        }
    }

    let text = &source[start..i];
    text.parse::<f64>()
        .map(|n| (n, i))
        .map_err(|_| FormulaError::Syntax(format!("malformed number {:?}", text)))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn enter(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(FormulaError::Syntax("expression nested too deeply".into()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ref(cell)) => Ok(Expr::Ref(cell)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FormulaError::Syntax("missing closing parenthesis".into())),
                }
            }
            Some(tok) => Err(FormulaError::Syntax(format!("unexpected token {:?}", tok))),
            None => Err(FormulaError::Syntax("unexpected end of formula".into())),
        }
    }
}
