use std::convert::Infallible;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use anyhow::{Context, Result};
use inlinable_string::InlinableString;
use tracing::debug;

use crate::diff::differentiate;
use crate::eval::evaluate;
use crate::parse::tokenize;
use crate::term::{Expression, Term};

/// A single-variable function, `f(x)`, built from text like `3x^2+5x-7`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    expr: Expression,
}

impl Function {
    pub fn new(text: &str) -> Self {
        Function { expr: tokenize(text) }
    }

    pub fn from_expression(expr: Expression) -> Self {
        Function { expr }
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    pub fn into_expression(self) -> Expression {
        self.expr
    }

    pub fn terms(&self) -> &[Term] {
        &self.expr
    }

    pub fn get(&self, index: usize) -> Option<&Term> {
        self.expr.get(index)
    }

    pub fn len(&self) -> usize {
        self.expr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }

    /// The symbol this function is written in: the first variable to appear, or `x` if there are none.
    /// Every variable factor is treated as this variable when solving.
    pub fn variable(&self) -> char {
        self.expr.iter()
            .flat_map(|term| term.variables.first())
            .map(|v| v.symbol)
            .next()
            .unwrap_or('x')
    }

    pub fn render(&self) -> InlinableString {
        self.expr.render_to_string()
    }

    pub fn derivative(&self) -> Function {
        Function { expr: differentiate(self.expr.clone()) }
    }

    /// Value of the function at `x`. Non-finite `x` gives 0 rather than propagating NaN or infinity.
    pub fn solve(&self, x: f64) -> f64 {
        if !x.is_finite() {
            debug!(x, "non-finite argument, solving to 0");
            return 0.0;
        }
        self.expr.evaluate(x)
    }

    /// The function written out as plain arithmetic with `x` substituted for the variable,
    /// in the form `eval::evaluate` accepts.
    pub fn arithmetic_text(&self, x: f64) -> String {
        let mut out = String::new();
        // writing to a String can't fail
        let _ = self.expr.render_arithmetic(&mut out, x);
        out
    }

    /// Like `solve`, but goes through the text evaluator instead of the term tree.
    pub fn solve_textual(&self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Ok(0.0);
        }
        let text = self.arithmetic_text(x);
        debug!(%text, "evaluating substituted text");
        evaluate(&text).with_context(|| format!("evaluating {} at {} as {:?}", self, x, text))
    }
}

impl FromStr for Function {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(Function::new(s))
    }
}

impl From<Expression> for Function {
    fn from(expr: Expression) -> Self {
        Function::from_expression(expr)
    }
}

impl Index<usize> for Function {
    type Output = Term;

    fn index(&self, index: usize) -> &Term {
        &self.expr[index]
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
