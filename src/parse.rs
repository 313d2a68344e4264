use inlinable_string::{InlinableString, StringExt};
use tracing::{debug, trace};

use crate::term::{ConstantFactor, Exponent, Expression, Sign, Term, VariableFactor};
use crate::util::{char_to_string, saturating_digits, Cursor};

// Which kind of factor an exponent run is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactorKind {
    Constant,
    Variable,
}

// Scanner state. Constant/Variable carry the run currently being read;
// Exponent carries the digits after a `^` and the kind of factor they raise.
#[derive(Debug)]
enum Mode {
    Sign,
    Constant(InlinableString),
    Variable(InlinableString),
    Exponent(FactorKind, InlinableString),
}

impl Mode {
    // Leaving a mode flushes whatever it was reading into the term
    fn commit(self, term: &mut Term) {
        match self {
            Mode::Sign => (),
            Mode::Constant(digits) => {
                if digits.is_empty() { return }
                let factor = ConstantFactor::new(saturating_digits(&digits));
                trace!(value = factor.value, "constant factor");
                term.constants.push(factor);
            },
            // Symbols are single characters; the rest of a run of letters is dropped
            Mode::Variable(letters) => {
                if let Some(symbol) = letters.chars().next() {
                    if letters.len() > 1 {
                        debug!(run = %letters, %symbol, "multi-letter variable truncated");
                    }
                    trace!(%symbol, "variable factor");
                    term.variables.push(VariableFactor::new(symbol));
                }
            },
            Mode::Exponent(kind, digits) => {
                if digits.is_empty() { return }
                let exponent: Exponent = saturating_digits(&digits);
                trace!(?kind, exponent, "exponent");
                match kind {
                    FactorKind::Constant => if let Some(c) = term.constants.last_mut() { c.exponent = exponent },
                    FactorKind::Variable => if let Some(v) = term.variables.last_mut() { v.exponent = exponent },
                }
            }
        }
    }
}

/// Splits text like `3x^2+5x-7` into signed terms of constant and variable factors.
///
/// This never fails: anything it doesn't recognise is skipped, and input with no structure at all
/// yields a single empty term.
pub fn tokenize(input: &str) -> Expression {
    let mut terms = vec![];
    let mut current = Term::default();
    let mut state = Mode::Sign;
    let mut cursor = Cursor::new(input);

    while let Some(char) = cursor.advance() {
        if char.is_whitespace() { continue }
        state = match (char, state) {
            // digits extend an exponent or constant, or start a new constant
            ('0'..='9', Mode::Exponent(kind, mut digits)) => {
                digits.push(char);
                Mode::Exponent(kind, digits)
            },
            ('0'..='9', Mode::Constant(mut digits)) => {
                digits.push(char);
                Mode::Constant(digits)
            },
            ('0'..='9', state) => {
                state.commit(&mut current);
                Mode::Constant(char_to_string(char))
            },
            (c, Mode::Variable(mut letters)) if c.is_ascii_alphabetic() => {
                letters.push(c);
                Mode::Variable(letters)
            },
            (c, state) if c.is_ascii_alphabetic() => {
                state.commit(&mut current);
                Mode::Variable(char_to_string(c))
            },
            // ^ raises whichever factor was just read
            ('^', Mode::Constant(digits)) => {
                Mode::Constant(digits).commit(&mut current);
                Mode::Exponent(FactorKind::Constant, InlinableString::new())
            },
            ('^', Mode::Variable(letters)) => {
                Mode::Variable(letters).commit(&mut current);
                Mode::Exponent(FactorKind::Variable, InlinableString::new())
            },
            // nothing to raise
            ('^', state) => state,
            (c @ ('+' | '-'), state) => {
                state.commit(&mut current);
                let sign = Sign::from_char(c).unwrap_or_default();
                // signs before the first factor all belong to the first term; the last one wins
                if terms.is_empty() && current.is_empty() {
                    current.sign = sign;
                } else {
                    debug!(position = cursor.position(), term = terms.len(), "term committed");
                    terms.push(std::mem::replace(&mut current, Term::with_sign(sign)));
                }
                Mode::Sign
            },
            // anything else separates factors without starting a new term
            (c, state) => {
                trace!(char = %c, position = cursor.position(), "ignored");
                state.commit(&mut current);
                Mode::Sign
            }
        };
    }
    // commit last thing
    state.commit(&mut current);
    terms.push(current);
    Expression::new(terms)
}

#[cfg(test)]
mod test {
    use super::*;

    fn constants(expr: &Expression, term: usize) -> Vec<(i64, i32)> {
        expr[term].constants.iter().map(|c| (c.value, c.exponent)).collect()
    }

    fn variables(expr: &Expression, term: usize) -> Vec<(char, i32)> {
        expr[term].variables.iter().map(|v| (v.symbol, v.exponent)).collect()
    }

    #[test]
    fn splits_terms() {
        let expr = tokenize("3x^2+5x-7");
        assert_eq!(expr.len(), 3);
        assert_eq!(expr[0].sign, Sign::Plus);
        assert_eq!(constants(&expr, 0), vec![(3, 1)]);
        assert_eq!(variables(&expr, 0), vec![('x', 2)]);
        assert_eq!(expr[1].sign, Sign::Plus);
        assert_eq!(constants(&expr, 1), vec![(5, 1)]);
        assert_eq!(variables(&expr, 1), vec![('x', 1)]);
        assert_eq!(expr[2].sign, Sign::Minus);
        assert_eq!(constants(&expr, 2), vec![(7, 1)]);
        assert!(expr[2].variables.is_empty());
    }

    #[test]
    fn leading_sign() {
        let expr = tokenize("-x");
        assert_eq!(expr.len(), 1);
        assert_eq!(expr[0].sign, Sign::Minus);
        assert_eq!(variables(&expr, 0), vec![('x', 1)]);

        let expr = tokenize("  +4");
        assert_eq!(expr.len(), 1);
        assert_eq!(expr[0].sign, Sign::Plus);
        assert_eq!(constants(&expr, 0), vec![(4, 1)]);

        // anything before the first factor doesn't open an empty term
        let test_cases = [
            ("+-x", 1, Sign::Minus, "-x"),
            ("-+x", 1, Sign::Plus, "x"),
            ("(-x+1)", 2, Sign::Minus, "-x+1"),
            ("*-3x", 1, Sign::Minus, "-3x"),
            ("( + 2", 1, Sign::Plus, "2"),
        ];
        for (input, len, sign, rendered) in test_cases {
            let expr = tokenize(input);
            assert_eq!(expr.len(), len, "input {:?}", input);
            assert_eq!(expr[0].sign, sign, "input {:?}", input);
            assert_eq!(expr.to_string(), rendered);
            assert_eq!(tokenize(&expr.to_string()), expr);
        }

        // once a factor has been read, a sign starts a new term even if it follows another sign
        let expr = tokenize("3+-x");
        assert_eq!(expr.len(), 3);
        assert!(expr[1].is_empty());
        assert_eq!(tokenize(&expr.to_string()), expr);
    }

    #[test]
    fn degenerate_input() {
        for input in ["", "   ", "*", "^", "^^2"] {
            let expr = tokenize(input);
            assert_eq!(expr.len(), 1, "input {:?}", input);
        }
        assert!(tokenize("").iter().all(Term::is_empty));
        assert!(tokenize("  ").iter().all(Term::is_empty));
        // a trailing sign opens an empty term
        let expr = tokenize("3+");
        assert_eq!(expr.len(), 2);
        assert!(expr[1].is_empty());
    }

    #[test]
    fn exponents() {
        let expr = tokenize("2^3x^10");
        assert_eq!(constants(&expr, 0), vec![(2, 3)]);
        assert_eq!(variables(&expr, 0), vec![('x', 10)]);

        // the exponent run ends at the first non-digit
        let expr = tokenize("x^2y");
        assert_eq!(variables(&expr, 0), vec![('x', 2), ('y', 1)]);

        // ^ with nothing before it is ignored
        let expr = tokenize("+^x");
        assert_eq!(variables(&expr, 0), vec![('x', 1)]);

        // ^ without digits leaves the default exponent
        let expr = tokenize("x^+1");
        assert_eq!(variables(&expr, 0), vec![('x', 1)]);
        assert_eq!(constants(&expr, 1), vec![(1, 1)]);
    }

    #[test]
    fn whitespace_and_separators() {
        let expr = tokenize(" 3 x ^ 2 - 1 ");
        assert_eq!(expr.len(), 2);
        assert_eq!(constants(&expr, 0), vec![(3, 1)]);
        assert_eq!(variables(&expr, 0), vec![('x', 2)]);
        assert_eq!(expr[1].sign, Sign::Minus);

        let expr = tokenize("3*4*x");
        assert_eq!(constants(&expr, 0), vec![(3, 1), (4, 1)]);
        assert_eq!(variables(&expr, 0), vec![('x', 1)]);
    }

    #[test]
    fn multi_letter_runs_keep_first_symbol() {
        let expr = tokenize("5xyz^3");
        assert_eq!(variables(&expr, 0), vec![('x', 3)]);
    }

    #[test]
    fn huge_numbers_saturate() {
        let expr = tokenize("99999999999999999999999x^99999999999");
        assert_eq!(constants(&expr, 0), vec![(i64::MAX, 1)]);
        assert_eq!(variables(&expr, 0), vec![('x', i32::MAX)]);
    }
}
