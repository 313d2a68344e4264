use tracing::trace;

use crate::term::{ConstantFactor, Expression, Term};

// Power rule on a single term. Only the first variable factor is differentiated;
// products of several variables are not handled.
// Returns None for terms whose derivative is zero.
fn differentiate_term(mut term: Term) -> Option<Term> {
    if term.variables.is_empty() {
        // a bare constant goes to zero; a term with no factors at all is kept as it is
        return if term.constants.is_empty() { Some(term) } else { None };
    }
    let var = &mut term.variables[0];
    let exponent = var.exponent;
    match term.constants.first_mut() {
        Some(c) => c.value = c.value.saturating_mul(i64::from(exponent)),
        None if exponent > 0 => term.constants.push(ConstantFactor::new(i64::from(exponent))),
        // x^0 (or below) with no coefficient is constant
        None => return None,
    }
    var.exponent = exponent.saturating_sub(1);
    if var.exponent == 0 {
        term.variables.remove(0);
    }
    Some(term)
}

/// Differentiates every term with the power rule, dropping terms that become zero.
pub fn differentiate(expr: Expression) -> Expression {
    expr.into_terms()
        .into_iter()
        .filter_map(|term| {
            let result = differentiate_term(term);
            if result.is_none() {
                trace!("term differentiated to zero");
            }
            result
        })
        .collect()
}

pub fn differentiate_n(expr: Expression, order: usize) -> Expression {
    (0..order).fold(expr, |expr, _| differentiate(expr))
}
