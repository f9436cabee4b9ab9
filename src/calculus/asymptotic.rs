//! Dominant-term analysis as a variable tends to `+oo`.
//!
//! Every expression is reduced to a single scale
//! `coeff * t^power * log(t)^log_power * exp(growth)`, where `coeff` does not
//! depend on `t` and `growth` collects the unbounded part of exponents. Bounded
//! oscillating factors such as `sin(t)` are tracked with a flag instead.

use std::cmp::Ordering;

use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use tracing::trace;

use crate::calculus::limit::LimitError;
use crate::expr::{Expr, Rational, one, zero};
use crate::simplify::{
    add_terms, conjugate, expand, mul_factors, simplify, simplify_abs, simplify_add,
    simplify_atan, simplify_cos, simplify_exp, simplify_log, simplify_mul, simplify_pow,
    simplify_sin, simplify_sub, simplify_tan, split_coeff, transpose,
};

pub type AsymptoticResult<T> = std::result::Result<T, LimitError>;

/// Leading behaviour of an expression as `t -> +oo`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dominant {
    pub coeff: Expr,
    pub power: Rational,
    pub log_power: Rational,
    pub growth: Expr,
    pub oscillating: bool,
}

impl Dominant {
    pub fn constant(coeff: Expr) -> Self {
        Self {
            coeff,
            power: Rational::zero(),
            log_power: Rational::zero(),
            growth: zero(),
            oscillating: false,
        }
    }

    fn variable() -> Self {
        Self {
            power: Rational::one(),
            ..Self::constant(one())
        }
    }

    fn bounded_oscillation() -> Self {
        Self {
            oscillating: true,
            ..Self::constant(one())
        }
    }

    /// True when the scale is `1`: the expression tends to `coeff`, or
    /// oscillates boundedly when the flag is set.
    pub fn is_constant_scale(&self) -> bool {
        self.power.is_zero() && self.log_power.is_zero() && self.growth.is_zero()
    }

    fn times(self, other: Dominant) -> Self {
        Self {
            coeff: simplify_mul(self.coeff, other.coeff),
            power: self.power + other.power,
            log_power: self.log_power + other.log_power,
            growth: simplify_add(self.growth, other.growth),
            oscillating: self.oscillating || other.oscillating,
        }
    }

    fn powi(self, r: &Rational) -> Self {
        Self {
            coeff: simplify_pow(self.coeff, Expr::Constant(r.clone())),
            power: self.power * r,
            log_power: self.log_power * r,
            growth: simplify_mul(Expr::Constant(r.clone()), self.growth),
            oscillating: self.oscillating,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tendency {
    Vanishing,
    Bounded,
    Unbounded,
}

enum Merged {
    Leading(Option<Dominant>),
    Cancelled,
}

/// Dominant-term engine for one variable.
pub struct Asymptotics<'a> {
    var: &'a str,
    max_depth: usize,
}

impl<'a> Asymptotics<'a> {
    pub fn new(var: &'a str, max_depth: usize) -> Self {
        Self { var, max_depth }
    }

    /// `Ok(None)` means the expression is identically zero.
    pub fn dominant(&self, expr: &Expr) -> AsymptoticResult<Option<Dominant>> {
        self.dominant_at(&simplify(expr.clone()), 0)
    }

    pub fn tendency(&self, dominant: &Dominant) -> AsymptoticResult<Tendency> {
        self.tendency_at(dominant, 0)
    }

    fn dominant_at(&self, expr: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        if depth > self.max_depth {
            return Err(LimitError::DepthExceeded(self.max_depth));
        }

        if !expr.has(self.var) {
            return match expr {
                Expr::NaN | Expr::Infinity => {
                    Err(LimitError::Unsupported(format!("non-finite value {expr}")))
                }
                e if e.is_zero() => Ok(None),
                e if e.contains_order() => {
                    Err(LimitError::Unsupported(format!("order term in {e}")))
                }
                e => Ok(Some(Dominant::constant(e.clone()))),
            };
        }

        let depth = depth + 1;
        match expr {
            Expr::Variable(_) => Ok(Some(Dominant::variable())),
            Expr::Add(..) | Expr::Sub(..) => self.sum(expr, depth),
            Expr::Mul(..) | Expr::Neg(_) => self.product(expr, depth),
            Expr::Div(a, b) => {
                let rewritten = simplify(Expr::Div(a.clone(), b.clone()));
                self.dominant_at(&rewritten, depth)
            }
            Expr::Pow(base, exp) => self.power(base, exp, depth),
            Expr::Exp(arg) => self.exponential(arg, depth).map(Some),
            Expr::Log(arg) => self.logarithm(arg, depth),
            Expr::Sin(arg) => self.periodic(arg, depth, simplify_sin, false),
            Expr::Cos(arg) => self.periodic(arg, depth, simplify_cos, true),
            Expr::Tan(arg) => self.tangent(arg, depth),
            Expr::Atan(arg) => self.arctangent(arg, depth),
            Expr::Abs(arg) => Ok(self.dominant_at(arg, depth)?.map(|d| Dominant {
                coeff: simplify_abs(d.coeff),
                ..d
            })),
            Expr::Conjugate(arg) => match conjugate(arg) {
                Some(value) => self.dominant_at(&simplify(value), depth),
                None => Err(LimitError::Unsupported(format!("conjugate of {arg}"))),
            },
            Expr::Transpose(arg) => match transpose(arg) {
                Some(value) => self.dominant_at(&simplify(value), depth),
                None => Err(LimitError::Unsupported(format!("transpose of {arg}"))),
            },
            Expr::Order(_) => Err(LimitError::Unsupported(format!("order term {expr}"))),
            Expr::Constant(_) | Expr::Infinity | Expr::NaN => {
                Err(LimitError::Unsupported(format!("unexpected atom {expr}")))
            }
        }
    }

    fn sum(&self, expr: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        let mut parts = Vec::new();
        for term in add_terms(expr) {
            if let Some(d) = self.dominant_at(&term, depth)? {
                parts.push(d);
            }
        }

        match self.leading_of(parts, depth)? {
            Merged::Leading(leading) => Ok(leading),
            Merged::Cancelled => {
                let expanded = expand(expr);
                if expanded != *expr {
                    trace!(expr = %expr, "leading terms cancel, retrying expanded");
                    self.dominant_at(&expanded, depth)
                } else {
                    Err(LimitError::Unsupported(format!(
                        "leading terms of {expr} cancel"
                    )))
                }
            }
        }
    }

    fn leading_of(&self, parts: Vec<Dominant>, depth: usize) -> AsymptoticResult<Merged> {
        let mut best: Option<Dominant> = None;
        for d in parts {
            best = match best {
                None => Some(d),
                Some(current) => match self.compare(&current, &d, depth)? {
                    Ordering::Greater => Some(current),
                    Ordering::Less => Some(d),
                    Ordering::Equal if current.oscillating || d.oscillating => Some(Dominant {
                        coeff: one(),
                        oscillating: true,
                        ..current
                    }),
                    Ordering::Equal => {
                        let coeff = simplify_add(current.coeff.clone(), d.coeff);
                        if coeff.is_zero() {
                            return Ok(Merged::Cancelled);
                        }
                        Some(Dominant { coeff, ..current })
                    }
                },
            };
        }
        Ok(Merged::Leading(best))
    }

    /// Orders two scales by growth rate.
    fn compare(&self, a: &Dominant, b: &Dominant, depth: usize) -> AsymptoticResult<Ordering> {
        let diff = simplify_sub(a.growth.clone(), b.growth.clone());
        if !diff.is_zero() {
            if let Some(d) = self.dominant_at(&diff, depth + 1)? {
                match self.tendency_at(&d, depth + 1)? {
                    Tendency::Unbounded if !d.oscillating => {
                        return match sign_of(&d.coeff) {
                            Some(Ordering::Equal) | None => Err(LimitError::Unsupported(
                                format!("sign of {} is unknown", d.coeff),
                            )),
                            Some(sign) => Ok(sign),
                        };
                    }
                    Tendency::Vanishing => {}
                    _ => {
                        return Err(LimitError::Unsupported(format!(
                            "exponential growths {} and {} are not comparable",
                            a.growth, b.growth
                        )));
                    }
                }
            }
        }

        Ok(a.power
            .cmp(&b.power)
            .then_with(|| a.log_power.cmp(&b.log_power)))
    }

    fn tendency_at(&self, d: &Dominant, depth: usize) -> AsymptoticResult<Tendency> {
        if depth > self.max_depth {
            return Err(LimitError::DepthExceeded(self.max_depth));
        }

        if !d.growth.is_zero() {
            if let Some(g) = self.dominant_at(&d.growth, depth + 1)? {
                if self.tendency_at(&g, depth + 1)? == Tendency::Unbounded {
                    return match sign_of(&g.coeff) {
                        Some(Ordering::Greater) => Ok(Tendency::Unbounded),
                        Some(Ordering::Less) => Ok(Tendency::Vanishing),
                        _ => Err(LimitError::Unsupported(format!(
                            "sign of exponent {} is unknown",
                            d.growth
                        ))),
                    };
                }
            }
        }

        let scale = match d.power.cmp(&Rational::zero()) {
            Ordering::Equal => d.log_power.cmp(&Rational::zero()),
            other => other,
        };
        Ok(match scale {
            Ordering::Greater => Tendency::Unbounded,
            Ordering::Less => Tendency::Vanishing,
            Ordering::Equal => Tendency::Bounded,
        })
    }

    fn product(&self, expr: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        let mut acc = Dominant::constant(one());
        for factor in mul_factors(expr) {
            match self.dominant_at(&factor, depth)? {
                Some(d) => acc = acc.times(d),
                None => return Ok(None),
            }
        }
        Ok(Some(acc))
    }

    fn power(&self, base: &Expr, exp: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        if exp.has(self.var) {
            let rewritten = simplify_exp(simplify_mul(exp.clone(), simplify_log(base.clone())));
            return self.dominant_at(&rewritten, depth);
        }

        let Some(d) = self.dominant_at(base, depth)? else {
            return match exp {
                Expr::Constant(r) if r.is_positive() => Ok(None),
                _ => Err(LimitError::Pole(format!("{base} vanishes under {exp}"))),
            };
        };

        match exp {
            Expr::Constant(r) => {
                if d.oscillating && r.is_negative() {
                    return Err(LimitError::Pole(format!(
                        "reciprocal of oscillating {base}"
                    )));
                }
                Ok(Some(d.powi(r)))
            }
            _ if d.is_constant_scale() && !d.oscillating => Ok(Some(Dominant::constant(
                simplify_pow(d.coeff, exp.clone()),
            ))),
            _ => Err(LimitError::Unsupported(format!(
                "symbolic power {exp} of {base}"
            ))),
        }
    }

    fn exponential(&self, arg: &Expr, depth: usize) -> AsymptoticResult<Dominant> {
        let mut result = Dominant::constant(one());

        for term in add_terms(&expand(arg)) {
            if !term.has(self.var) {
                result.coeff = simplify_mul(result.coeff, simplify_exp(term));
                continue;
            }
            if let Some(c) = self.log_coefficient(&term) {
                result.power += c;
                continue;
            }
            if let Some(c) = self.log_log_coefficient(&term) {
                result.log_power += c;
                continue;
            }

            let Some(d) = self.dominant_at(&term, depth)? else {
                continue;
            };
            match self.tendency_at(&d, depth)? {
                Tendency::Unbounded if d.oscillating => {
                    return Err(LimitError::Unsupported(format!(
                        "oscillating exponent {term}"
                    )));
                }
                Tendency::Unbounded => result.growth = simplify_add(result.growth, term),
                Tendency::Vanishing => {}
                Tendency::Bounded if d.oscillating => result.oscillating = true,
                Tendency::Bounded => {
                    result.coeff = simplify_mul(result.coeff, simplify_exp(d.coeff));
                }
            }
        }

        Ok(result)
    }

    /// `c` for a term `c*log(t)`.
    fn log_coefficient(&self, term: &Expr) -> Option<Rational> {
        let (c, factors) = split_coeff(term);
        match factors.as_slice() {
            [Expr::Log(inner)] if inner.as_variable() == Some(self.var) => Some(c),
            _ => None,
        }
    }

    /// `c` for a term `c*log(log(t))`.
    fn log_log_coefficient(&self, term: &Expr) -> Option<Rational> {
        let (c, factors) = split_coeff(term);
        match factors.as_slice() {
            [Expr::Log(inner)] => self.log_coefficient(inner).filter(|k| k.is_one()).map(|_| c),
            _ => None,
        }
    }

    fn logarithm(&self, arg: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        let Some(d) = self.dominant_at(arg, depth)? else {
            return Err(LimitError::Pole(format!("log of {arg}, which vanishes")));
        };
        if d.oscillating {
            return Err(LimitError::Unsupported(format!("log of oscillating {arg}")));
        }

        let mut parts = Vec::new();
        if !d.growth.is_zero() {
            if let Some(g) = self.dominant_at(&d.growth, depth)? {
                parts.push(g);
            }
        }
        if !d.power.is_zero() {
            parts.push(Dominant {
                log_power: Rational::one(),
                ..Dominant::constant(Expr::Constant(d.power.clone()))
            });
        }

        if parts.is_empty() {
            if !d.log_power.is_zero() {
                return Err(LimitError::Unsupported(format!(
                    "iterated logarithm in log({arg})"
                )));
            }
            if d.coeff.is_one() {
                let shifted = simplify_sub(arg.clone(), one());
                return self.dominant_at(&shifted, depth);
            }
            return Ok(Some(Dominant::constant(simplify_log(d.coeff))));
        }

        match self.leading_of(parts, depth)? {
            Merged::Leading(leading) => Ok(leading),
            Merged::Cancelled => Err(LimitError::Unsupported(format!(
                "leading terms of log({arg}) cancel"
            ))),
        }
    }

    fn periodic(
        &self,
        arg: &Expr,
        depth: usize,
        eval: fn(Expr) -> Expr,
        even: bool,
    ) -> AsymptoticResult<Option<Dominant>> {
        let Some(d) = self.dominant_at(arg, depth)? else {
            let value = eval(zero());
            return Ok((!value.is_zero()).then(|| Dominant::constant(value)));
        };
        match self.tendency_at(&d, depth)? {
            Tendency::Vanishing if even => Ok(Some(Dominant::constant(one()))),
            Tendency::Vanishing => Ok(Some(d)),
            Tendency::Bounded if d.oscillating => Ok(Some(Dominant::bounded_oscillation())),
            Tendency::Bounded => Ok(Some(Dominant::constant(eval(d.coeff)))),
            Tendency::Unbounded => Ok(Some(Dominant::bounded_oscillation())),
        }
    }

    fn tangent(&self, arg: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        let Some(d) = self.dominant_at(arg, depth)? else {
            return Ok(None);
        };
        match self.tendency_at(&d, depth)? {
            Tendency::Vanishing => Ok(Some(d)),
            Tendency::Bounded if !d.oscillating => {
                Ok(Some(Dominant::constant(simplify_tan(d.coeff))))
            }
            _ => Err(LimitError::Pole(format!("tan({arg}) crosses its poles"))),
        }
    }

    fn arctangent(&self, arg: &Expr, depth: usize) -> AsymptoticResult<Option<Dominant>> {
        let Some(d) = self.dominant_at(arg, depth)? else {
            return Ok(None);
        };
        match self.tendency_at(&d, depth)? {
            Tendency::Vanishing => Ok(Some(d)),
            Tendency::Bounded if !d.oscillating => {
                Ok(Some(Dominant::constant(simplify_atan(d.coeff))))
            }
            _ => Err(LimitError::Unsupported(format!("arctan({arg}) at infinity"))),
        }
    }
}

/// Sign of an expression that does not depend on the limit variable, when it
/// can be read off structurally.
pub fn sign_of(expr: &Expr) -> Option<Ordering> {
    match expr {
        Expr::Constant(c) => Some(c.cmp(&Rational::zero())),
        Expr::Neg(inner) => sign_of(inner).map(Ordering::reverse),
        Expr::Mul(..) => mul_factors(expr)
            .iter()
            .try_fold(Ordering::Greater, |acc, f| Some(combine_signs(acc, sign_of(f)?))),
        Expr::Exp(_) | Expr::Abs(_) => Some(Ordering::Greater),
        Expr::Atan(inner) => sign_of(inner),
        Expr::Log(inner) => match &**inner {
            Expr::Constant(c) if c.is_positive() => Some(c.cmp(&Rational::one())),
            _ => None,
        },
        Expr::Pow(base, exp) => match (sign_of(base)?, &**exp) {
            (Ordering::Greater, _) => Some(Ordering::Greater),
            (Ordering::Less, Expr::Constant(e)) if e.is_integer() => {
                if e.to_integer().is_odd() {
                    Some(Ordering::Less)
                } else {
                    Some(Ordering::Greater)
                }
            }
            _ => None,
        },
        Expr::Add(..) => {
            let signs: Option<Vec<Ordering>> = add_terms(expr).iter().map(sign_of).collect();
            let signs = signs?;
            let first = *signs.first()?;
            signs.iter().all(|s| *s == first).then_some(first)
        }
        _ => None,
    }
}

fn combine_signs(a: Ordering, b: Ordering) -> Ordering {
    match (a, b) {
        (Ordering::Equal, _) | (_, Ordering::Equal) => Ordering::Equal,
        (x, y) if x == y => Ordering::Greater,
        _ => Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn dominant(input: &str) -> Dominant {
        let expr = parse_expr(input).expect("parse input");
        Asymptotics::new("t", 64)
            .dominant(&expr)
            .expect("dominant term")
            .expect("non-zero expression")
    }

    #[test]
    fn polynomial_keeps_highest_power() {
        let d = dominant("3*t^2 + t + 7");
        assert_eq!(d.coeff, Expr::integer(3));
        assert_eq!(d.power, Rational::from_integer(2.into()));
    }

    #[test]
    fn logarithms_rank_below_powers() {
        let d = dominant("log(t) + t^(1/3)");
        assert_eq!(d.power, Rational::new(1.into(), 3.into()));
        assert!(d.log_power.is_zero());

        let d = dominant("log(t^2) + 5");
        assert_eq!(d.coeff, Expr::integer(2));
        assert_eq!(d.log_power, Rational::one());
    }

    #[test]
    fn exponentials_dominate_powers() {
        let d = dominant("exp(t) + t^10");
        assert_eq!(d.growth, Expr::var("t"));
        assert!(d.power.is_zero());
    }

    #[test]
    fn cancellation_retries_after_expansion() {
        let d = dominant("(t + 1)^2 - t^2");
        assert_eq!(d.coeff, Expr::integer(2));
        assert_eq!(d.power, Rational::one());
    }

    #[test]
    fn sine_at_infinity_oscillates() {
        let d = dominant("sin(t)");
        assert!(d.oscillating);
        assert!(d.is_constant_scale());
    }

    #[test]
    fn structural_signs() {
        assert_eq!(sign_of(&parse_expr("-2*exp(y)").unwrap()), Some(Ordering::Less));
        assert_eq!(sign_of(&parse_expr("y").unwrap()), None);
    }
}
