//! Derivatives and values of single-variable polynomial-like functions written as text, such as `3x^2+5x-7`.
//!
//! Text is split into signed terms by [`tokenize`], differentiated with the power rule by
//! [`differentiate`] and written back out by [`Expression::render_to_string`]. [`Function`] ties these
//! together and can be solved at a point. [`evaluate`] is a separate general arithmetic evaluator.

#[cfg(target_family="wasm")]
use wasm_bindgen::prelude::*;

#[cfg(target_family="wasm")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

mod util;
pub mod term;
pub mod parse;
pub mod diff;
pub mod eval;
pub mod function;


pub use term::{ConstantFactor, VariableFactor, Sign, Term, Expression, Exponent};
pub use parse::tokenize;
pub use diff::{differentiate, differentiate_n};
pub use eval::{evaluate, EvalError};
pub use function::Function;

/// Text of the derivative of the function written in `text`, `"0"` if it is constant.
pub fn derivative_of(text: &str) -> String {
    differentiate(tokenize(text)).to_string()
}

#[cfg(target_family="wasm")]
#[wasm_bindgen(js_name = derivative)]
pub fn wasm_derivative(text: &str) -> String {
    derivative_of(text)
}

#[cfg(target_family="wasm")]
#[wasm_bindgen(js_name = solve)]
pub fn wasm_solve(text: &str, x: f64) -> f64 {
    Function::new(text).solve(x)
}

#[cfg(target_family="wasm")]
#[wasm_bindgen(js_name = evaluate)]
pub fn wasm_evaluate(text: &str) -> String {
    match evaluate(text) {
        Ok(value) => value.to_string(),
        Err(e) => format!("Error: {}", e)
    }
}

#[cfg(test)]
mod test {
    use crate::{derivative_of, evaluate, tokenize, Function};

    #[test]
    fn end_to_end_tests() {
        let test_cases = [
            ("3x^2+5x-7", "6x+5"),
            ("x^2", "2x"),
            ("7", "0"),
            ("", "0"),
            ("x", "1"),
            ("-2x^5 + x^3 - x", "-10x^4+3x^2-1"),
            ("10t^4-t", "40t^3-1"),
        ];
        for (input, expected_result) in test_cases {
            let result = derivative_of(input);
            println!("{} differentiated to {}; expected {}", input, result, expected_result);
            assert_eq!(result, expected_result);
        }
        println!("All tests passed.")
    }

    #[test]
    fn round_trips() {
        let test_cases = [
            ("3x^2+5x-7", "3x^2+5x-7"),
            ("x", "x"),
            ("", "0"),
            ("- x + 2", "-x+2"),
            ("4 * x ^ 3", "4x^3"),
        ];
        for (input, expected) in test_cases {
            assert_eq!(tokenize(input).to_string(), expected);
        }
    }

    #[test]
    fn solving_agrees_with_evaluating() {
        let f = Function::new("2x^3-4x^2+x-1");
        for x in [-3.0, -0.5, 0.0, 1.0, 2.5] {
            let direct = f.solve(x);
            let text = f.arithmetic_text(x);
            let evaluated = evaluate(&text).unwrap();
            assert!((direct - evaluated).abs() < 1e-9, "{} vs {} for {}", direct, evaluated, text);
        }
    }
}
