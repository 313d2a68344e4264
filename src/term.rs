use std::fmt;
use std::ops::{Deref, DerefMut};
use itertools::{interleave, Itertools};
use inlinable_string::{InlinableString, StringExt};

pub type Exponent = i32;

/// A numeric literal factor, `value^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantFactor {
    pub value: i64,
    pub exponent: Exponent,
}

impl Default for ConstantFactor {
    fn default() -> Self {
        ConstantFactor { value: 1, exponent: 1 }
    }
}

impl ConstantFactor {
    pub fn new(value: i64) -> Self {
        ConstantFactor { value, exponent: 1 }
    }

    // Integer value of the factor, as it is rendered.
    // Negative exponents go through floating point and are truncated, which is what an integer cast would give.
    pub fn as_integer(&self) -> i64 {
        match u32::try_from(self.exponent) {
            Ok(e) => self.value.saturating_pow(e),
            Err(_) => self.fraction() as i64,
        }
    }

    // Value used when solving. Agrees with the rendered integer, saturation included,
    // except for negative exponents where the fraction is kept.
    pub fn magnitude(&self) -> f64 {
        match u32::try_from(self.exponent) {
            Ok(e) => self.value.saturating_pow(e) as f64,
            Err(_) => self.fraction(),
        }
    }

    fn fraction(&self) -> f64 {
        (self.value as f64).powi(self.exponent)
    }
}

/// A variable raised to an integer power, `symbol^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableFactor {
    pub symbol: char,
    pub exponent: Exponent,
}

impl Default for VariableFactor {
    fn default() -> Self {
        VariableFactor { symbol: 'x', exponent: 1 }
    }
}

impl VariableFactor {
    pub fn new(symbol: char) -> Self {
        VariableFactor { symbol, exponent: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn from_char(c: char) -> Option<Sign> {
        match c {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            _ => None
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Sign::Plus => x,
            Sign::Minus => -x,
        }
    }
}

impl Default for Sign {
    fn default() -> Self { Sign::Plus }
}

/// A signed additive unit: the product of its constant and variable factors.
/// Factor values are never negative; negativity is carried by `sign` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Term {
    pub sign: Sign,
    pub constants: Vec<ConstantFactor>,
    pub variables: Vec<VariableFactor>,
}

// Either kind of factor, in the order they are written out
enum Factor<'a> {
    Constant(&'a ConstantFactor),
    Variable(&'a VariableFactor),
}

impl Term {
    pub fn with_sign(sign: Sign) -> Self {
        Term { sign, ..Term::default() }
    }

    // A term with no factors at all, left behind by empty or degenerate input
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.variables.is_empty()
    }

    // Constants and variables alternate, starting with a constant, until both run out
    fn factors(&self) -> impl Iterator<Item=Factor<'_>> {
        interleave(
            self.constants.iter().map(Factor::Constant),
            self.variables.iter().map(Factor::Variable),
        )
    }

    // Numeric value of this term with every variable bound to `x`, sign included.
    // An empty term contributes nothing, consistent with it rendering as nothing.
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.is_empty() { return 0.0 }
        let constants: f64 = self.constants.iter().map(ConstantFactor::magnitude).product();
        let variables: f64 = self.variables.iter().map(|v| x.powi(v.exponent)).product();
        self.sign.apply(constants * variables)
    }

    // Writes the factors (not the sign) of this term
    fn render_factors<W: fmt::Write>(&self, f: &mut W) -> fmt::Result {
        for factor in self.factors() {
            match factor {
                Factor::Constant(c) => write!(f, "{}", c.as_integer())?,
                Factor::Variable(v) if v.exponent == 1 => f.write_char(v.symbol)?,
                Factor::Variable(v) => write!(f, "{}^{}", v.symbol, v.exponent)?,
            }
        }
        Ok(())
    }

    // Writes this term as text the arithmetic evaluator accepts, with `x` spliced in for each variable.
    // Negative numbers use the `_` escape, since the evaluator has no other way to tell them from subtraction.
    fn render_arithmetic<W: fmt::Write>(&self, f: &mut W, x: f64) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('0');
        }
        let factors = self.factors().map(|factor| {
            let mut out = String::new();
            // writing to a String can't fail
            let _ = match factor {
                Factor::Constant(c) => write_power(&mut out, c.value as f64, c.exponent),
                Factor::Variable(v) => write_power(&mut out, x, v.exponent),
            };
            out
        });
        write!(f, "{}", factors.format("*"))
    }
}

fn write_number<W: fmt::Write>(f: &mut W, n: f64) -> fmt::Result {
    if n.is_sign_negative() && n != 0.0 {
        write!(f, "_{}", -n)
    } else {
        write!(f, "{}", n.abs())
    }
}

fn write_power<W: fmt::Write>(f: &mut W, base: f64, exponent: Exponent) -> fmt::Result {
    write_number(f, base)?;
    if exponent != 1 {
        f.write_char('^')?;
        write_number(f, f64::from(exponent))?;
    }
    Ok(())
}

/// An ordered sequence of terms. Order matters for rendering but not for the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expression(pub Vec<Term>);

impl Expression {
    pub fn new(terms: Vec<Term>) -> Self {
        Expression(terms)
    }

    pub fn into_terms(self) -> Vec<Term> {
        self.0
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.0.iter().map(|term| term.evaluate(x)).sum()
    }

    // The first term only shows its sign when it is negative; later terms always do
    pub fn render<W: fmt::Write>(&self, f: &mut W) -> fmt::Result {
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 || term.sign == Sign::Minus {
                f.write_char(term.sign.as_char())?;
            }
            term.render_factors(f)?;
        }
        Ok(())
    }

    // Rendering as a string; an expression which renders to nothing at all is "0"
    pub fn render_to_string(&self) -> InlinableString {
        let mut out = InlinableString::new();
        // InlinableString's fmt::Write never fails
        let _ = self.render(&mut out);
        if out.is_empty() {
            out = InlinableString::from("0");
        }
        out
    }

    pub fn render_arithmetic<W: fmt::Write>(&self, f: &mut W, x: f64) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_char('0');
        }
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 || term.sign == Sign::Minus {
                f.write_char(term.sign.as_char())?;
            }
            term.render_arithmetic(f, x)?;
        }
        Ok(())
    }
}

impl Deref for Expression {
    type Target = Vec<Term>;
    fn deref(&self) -> &Vec<Term> { &self.0 }
}

impl DerefMut for Expression {
    fn deref_mut(&mut self) -> &mut Vec<Term> { &mut self.0 }
}

impl FromIterator<Term> for Expression {
    fn from_iter<I: IntoIterator<Item=Term>>(iter: I) -> Self {
        Expression(iter.into_iter().collect())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_to_string())
    }
}
