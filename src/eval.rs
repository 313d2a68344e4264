//! Infix arithmetic evaluation with an operator stack and a value stack.
//!
//! Accepts digits (with at most one `.` per number), `+ - * / ^`, brackets, and `_` written directly
//! before a number to negate it. A `-` with only one operand available in the current bracket is
//! treated as negation, so `-2+3` works but `2*-3` does not: write `2*_3` instead.
//!
//! All binary operators are left-associative, `^` included: `2^3^2` is `(2^3)^2`.

use thiserror::Error;
use tracing::trace;

use crate::util::Cursor;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unmatched closing bracket")]
    StackUnderflow,
    #[error("unclosed bracket at end of input")]
    UnbalancedBracket,
    #[error("operator {0} is missing an operand")]
    MissingOperand(char),
    #[error("expression has no value")]
    EmptyResult,
    #[error("{0} values left over, expected one")]
    TrailingValues(usize),
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

// static table of precedence for each operator
pub fn precedence(c: char) -> Option<usize> {
    match c {
        '+' | '-' => Some(1),
        '*' | '/' => Some(2),
        '^' => Some(3),
        _ => None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StackOp {
    // An open bracket, remembering how many values were on the value stack when it was pushed
    Bracket(usize),
    Operator(char),
}

// Whether `prev`, on top of the stack, has to be applied before `op` can be pushed
fn causes_evaluation(prev: StackOp, op: char) -> bool {
    match prev {
        StackOp::Bracket(_) => false,
        StackOp::Operator(prev) => precedence(prev) >= precedence(op),
    }
}

fn apply_binary(op: char, left: f64, right: f64) -> f64 {
    match op {
        '+' => left + right,
        '-' => left - right,
        '*' => left * right,
        '/' => left / right,
        '^' => left.powf(right),
        _ => unreachable!("only operators with a precedence are pushed")
    }
}

#[derive(Debug, Default)]
struct Evaluator {
    ops: Vec<StackOp>,
    values: Vec<f64>,
}

impl Evaluator {
    fn open_bracket(&mut self) {
        self.ops.push(StackOp::Bracket(self.values.len()));
    }

    // Values below this belong to an enclosing bracket and can't be used as operands
    fn frame_base(&self) -> usize {
        self.ops.iter().rev().find_map(|op| match op {
            StackOp::Bracket(base) => Some(*base),
            StackOp::Operator(_) => None,
        }).unwrap_or(0)
    }

    fn apply(&mut self, op: char) -> Result<(), EvalError> {
        let available = self.values.len().saturating_sub(self.frame_base());
        match (available, self.values.pop()) {
            (0, Some(v)) => self.values.push(v),
            (0, None) => (),
            (1, Some(v)) if op == '-' => {
                trace!(operand = v, "negate");
                self.values.push(-v)
            },
            (1, Some(_)) => return Err(EvalError::MissingOperand(op)),
            (_, Some(right)) => {
                let left = self.values.pop().ok_or(EvalError::MissingOperand(op))?;
                let result = apply_binary(op, left, right);
                trace!(%op, left, right, result, "apply");
                self.values.push(result)
            },
            (_, None) => (),
        }
        Ok(())
    }

    fn push_operator(&mut self, op: char) -> Result<(), EvalError> {
        while let Some(&prev) = self.ops.last() {
            if !causes_evaluation(prev, op) { break }
            self.ops.pop();
            if let StackOp::Operator(prev) = prev {
                self.apply(prev)?;
            }
        }
        self.ops.push(StackOp::Operator(op));
        Ok(())
    }

    // Apply operators until the innermost open bracket has been popped
    fn reduce_to_bracket(&mut self) -> Result<(), EvalError> {
        loop {
            match self.ops.pop() {
                Some(StackOp::Operator(op)) => self.apply(op)?,
                Some(StackOp::Bracket(_)) => return Ok(()),
                None => return Err(EvalError::StackUnderflow),
            }
        }
    }

    fn finish(self) -> Result<f64, EvalError> {
        if !self.ops.is_empty() {
            return Err(EvalError::UnbalancedBracket);
        }
        match self.values.as_slice() {
            [] => Err(EvalError::EmptyResult),
            [value] => Ok(*value),
            values => Err(EvalError::TrailingValues(values.len())),
        }
    }
}

fn scan_number(cursor: &mut Cursor) -> Result<f64, EvalError> {
    let mut seen_point = false;
    let run = cursor.take_while(|c| match c {
        '.' if !seen_point => {
            seen_point = true;
            true
        },
        c => c.is_ascii_digit(),
    });
    run.parse().map_err(|_| EvalError::InvalidNumber(run.to_string()))
}

/// Evaluates an arithmetic expression. Division by zero gives an infinity or NaN rather than an error.
pub fn evaluate(input: &str) -> Result<f64, EvalError> {
    let mut evaluator = Evaluator::default();
    // sentinel, closed by the end of input
    evaluator.open_bracket();
    let mut cursor = Cursor::new(input);
    let mut negative = false;
    loop {
        match cursor.peek() {
            None => {
                evaluator.reduce_to_bracket()?;
                break
            },
            Some(c) if c.is_whitespace() => {
                cursor.advance();
            },
            Some('_') => {
                cursor.advance();
                match cursor.peek() {
                    Some(c) if c.is_ascii_digit() || c == '.' => negative = true,
                    _ => return Err(EvalError::UnexpectedCharacter('_')),
                }
            },
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let magnitude = scan_number(&mut cursor)?;
                evaluator.values.push(if negative { -magnitude } else { magnitude });
                negative = false;
            },
            Some('(') => {
                cursor.advance();
                evaluator.open_bracket();
            },
            Some(')') => {
                cursor.advance();
                evaluator.reduce_to_bracket()?;
            },
            Some(c) if precedence(c).is_some() => {
                cursor.advance();
                evaluator.push_operator(c)?;
            },
            Some(c) => return Err(EvalError::UnexpectedCharacter(c)),
        }
    }
    evaluator.finish()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let test_cases = [
            ("2+3*4", 14.0),
            ("(2+3)*4", 20.0),
            ("2*3+4", 10.0),
            ("10-4-3", 3.0),
            ("64/4/2", 8.0),
            ("2^3*2", 16.0),
            ("2*3^2", 18.0),
            ("2^3^2", 64.0),
            ("2^3^0", 1.0),
            ("_5+3", -2.0),
            ("3*_2", -6.0),
            ("_2^2", 4.0),
            ("-2^2", -4.0),
            ("-5+3", -2.0),
            ("1+(-2)", -1.0),
            ("((7))", 7.0),
            (" 1.5 * 4 ", 6.0),
            ("2^_1", 0.5),
            (".5+5.", 5.5),
            ("3*(2+(4-1)*2)", 24.0),
        ];
        for (input, expected) in test_cases {
            let result = evaluate(input).unwrap();
            println!("{} evaluated to {}; expected {}", input, result, expected);
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        assert_eq!(evaluate("10/0"), Ok(f64::INFINITY));
        assert_eq!(evaluate("_10/0"), Ok(f64::NEG_INFINITY));
        assert!(evaluate("0/0").unwrap().is_nan());
    }

    #[test]
    fn errors() {
        let error_cases = [
            ("", EvalError::EmptyResult),
            ("()", EvalError::EmptyResult),
            ("2)", EvalError::StackUnderflow),
            ("(2+3", EvalError::UnbalancedBracket),
            ("2*-3", EvalError::MissingOperand('*')),
            ("2 3", EvalError::TrailingValues(2)),
            ("2+x", EvalError::UnexpectedCharacter('x')),
            ("_(2)", EvalError::UnexpectedCharacter('_')),
            (".", EvalError::InvalidNumber(".".to_string())),
        ];
        for (input, expected) in error_cases {
            let result = evaluate(input);
            println!("{} produced {:?}", input, result);
            assert_eq!(result, Err(expected));
        }
    }

    #[test]
    fn second_point_ends_number() {
        // "1.2" then ".3"
        assert_eq!(evaluate("1.2.3"), Err(EvalError::TrailingValues(2)));
    }

    #[test]
    fn precedence_tiers() {
        assert!(causes_evaluation(StackOp::Operator('*'), '+'));
        assert!(causes_evaluation(StackOp::Operator('^'), '*'));
        assert!(causes_evaluation(StackOp::Operator('^'), '^'));
        assert!(!causes_evaluation(StackOp::Operator('+'), '*'));
        assert!(!causes_evaluation(StackOp::Operator('*'), '^'));
        assert!(!causes_evaluation(StackOp::Bracket(0), '+'));
        assert_eq!(precedence('('), None);
    }
}
