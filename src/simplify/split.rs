//! Structural splits of products: variable dependence and numerator/denominator.

use num_traits::Signed;

use crate::expr::{Expr, Rational, one};
use crate::simplify::rules::{add_terms, simplify, simplify_mul, simplify_neg, simplify_pow, split_coeff};

/// Split the factors of `expr` into `(independent, dependent)` with respect to `vars`.
///
/// The rational coefficient always lands on the independent side. A sum is
/// treated as a single factor.
pub fn as_independent<S: AsRef<str>>(expr: &Expr, vars: &[S]) -> (Expr, Expr) {
    let (coeff, factors) = split_coeff(expr);
    let (dependent, independent): (Vec<Expr>, Vec<Expr>) =
        factors.into_iter().partition(|f| f.has_any(vars));

    let independent = independent
        .into_iter()
        .fold(Expr::Constant(coeff), simplify_mul);
    let dependent = dependent.into_iter().fold(one(), simplify_mul);
    (independent, dependent)
}

/// Bring `expr` over a common denominator, returning `(numerator, denominator)`.
pub fn numer_denom(expr: &Expr) -> (Expr, Expr) {
    let expr = simplify(expr.clone());
    match &expr {
        Expr::Add(..) => add_terms(&expr)
            .iter()
            .map(numer_denom)
            .fold((Expr::integer(0), one()), |(n1, d1), (n2, d2)| {
                if d1 == d2 {
                    (simplify(Expr::Add(n1.boxed(), n2.boxed())), d1)
                } else {
                    let numer = Expr::Add(
                        Expr::Mul(n1.boxed(), d2.clone().boxed()).boxed(),
                        Expr::Mul(n2.boxed(), d1.clone().boxed()).boxed(),
                    );
                    (simplify(numer), simplify_mul(d1, d2))
                }
            }),
        Expr::Constant(c) => (
            Expr::Constant(Rational::from_integer(c.numer().clone())),
            Expr::Constant(Rational::from_integer(c.denom().clone())),
        ),
        Expr::Mul(..) | Expr::Neg(_) | Expr::Pow(..) => {
            let (coeff, factors) = split_coeff(&expr);
            let mut numer = Expr::Constant(Rational::from_integer(coeff.numer().clone()));
            let mut denom = Expr::Constant(Rational::from_integer(coeff.denom().clone()));
            for factor in factors {
                match negated_exponent(&factor) {
                    Some(positive) => denom = simplify_mul(denom, positive),
                    None => numer = simplify_mul(numer, factor),
                }
            }
            (numer, denom)
        }
        _ => (expr.clone(), one()),
    }
}

/// For `b^e` with a negative coefficient on `e`, the reciprocal `b^-e`.
fn negated_exponent(factor: &Expr) -> Option<Expr> {
    let Expr::Pow(base, exp) = factor else {
        return None;
    };
    let (coeff, _) = split_coeff(exp);
    if coeff.is_negative() {
        Some(simplify_pow((**base).clone(), simplify_neg((**exp).clone())))
    } else {
        None
    }
}
