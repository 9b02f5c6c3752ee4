//! Formula evaluation.
//!
//! Evaluation walks a parsed [`Expr`] and asks a [`CellValues`] source for the
//! numeric value of every referenced cell. Failures never escape a cell: they
//! become a [`FormulaError`] whose [`marker`](FormulaError::marker) is stored
//! as the cell's display value.

use thiserror::Error;

use super::cell_ref::CellRef;
use super::format::format_number;
use super::parser::{BinaryOp, Expr, parse_formula};

/// Reasons a formula cannot produce a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("division by zero")]
    DivByZero,

    #[error("circular reference")]
    Circular,

    #[error("formula is {len} bytes long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("dependency chain deeper than {max}")]
    TooDeep { max: usize },

    #[error("result is not a finite number")]
    NotFinite,
}

impl FormulaError {
    /// Display marker stored in the cell.
    pub fn marker(&self) -> &'static str {
        match self {
            FormulaError::DivByZero => "#DIV0",
            FormulaError::Circular => "#CIRCULAR",
            FormulaError::Syntax(_)
            | FormulaError::TooLong { .. }
            | FormulaError::TooDeep { .. }
            | FormulaError::NotFinite => "#ERROR",
        }
    }
}

/// Read access to the numeric value of cells during evaluation.
pub trait CellValues {
    /// Numeric value of a cell; empty and non-numeric cells read as 0.
    fn number_at(&self, cell: &CellRef) -> f64;
}

/// Evaluate a parsed expression.
///
/// Walks the tree with an explicit stack, so long operator chains cost heap
/// rather than call depth. Operands are evaluated left to right.
pub fn evaluate(expr: &Expr, values: &impl CellValues) -> Result<f64, FormulaError> {
    enum Step<'a> {
        Visit(&'a Expr),
        Negate,
        Apply(BinaryOp),
    }

    let mut steps = vec![Step::Visit(expr)];
    let mut operands: Vec<f64> = Vec::new();
    while let Some(step) = steps.pop() {
        let n = match step {
            Step::Visit(Expr::Number(n)) => *n,
            Step::Visit(Expr::Ref(cell)) => values.number_at(cell),
            Step::Visit(Expr::Neg(inner)) => {
                steps.push(Step::Negate);
                steps.push(Step::Visit(inner));
                continue;
            }
            Step::Visit(Expr::Binary { op, lhs, rhs }) => {
                steps.push(Step::Apply(*op));
                steps.push(Step::Visit(rhs));
                steps.push(Step::Visit(lhs));
                continue;
            }
            Step::Negate => -pop(&mut operands)?,
            Step::Apply(op) => {
                let b = pop(&mut operands)?;
                let a = pop(&mut operands)?;
                apply(op, a, b)?
            }
        };
        if !n.is_finite() {
            return Err(FormulaError::NotFinite);
        }
        operands.push(n);
    }
    pop(&mut operands)
}

fn pop(operands: &mut Vec<f64>) -> Result<f64, FormulaError> {
    operands
        .pop()
        .ok_or_else(|| FormulaError::Syntax("malformed expression".into()))
}

fn apply(op: BinaryOp, a: f64, b: f64) -> Result<f64, FormulaError> {
    Ok(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(FormulaError::DivByZero);
            }
            a / b
        }
    })
}

/// Parse and evaluate a formula body, producing its display string.
///
/// `max_len` bounds the accepted formula size in bytes.
pub fn eval_formula(source: &str, values: &impl CellValues, max_len: usize) -> String {
    match try_eval_formula(source, values, max_len) {
        Ok(n) => format_number(n),
        Err(e) => e.marker().to_string(),
    }
}

pub fn try_eval_formula(
    source: &str,
    values: &impl CellValues,
    max_len: usize,
) -> Result<f64, FormulaError> {
    if source.len() > max_len {
        return Err(FormulaError::TooLong {
            len: source.len(),
            max: max_len,
        });
    }
    let expr = parse_formula(source)?;
    evaluate(&expr, values)
}
