//! Complex conjugation and transposition of scalar expressions.
//!
//! Symbols are real-valued scalars, so both operations mostly reduce to the
//! identity. They return `None` where no closed result is known.

use crate::expr::Expr;

pub fn conjugate(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) | Expr::Infinity | Expr::NaN => Some(expr.clone()),
        Expr::Pow(base, exp) => {
            let integer_exp = matches!(&**exp, Expr::Constant(e) if e.is_integer());
            if integer_exp {
                Some(Expr::Pow(conjugate(base)?.boxed(), exp.clone()))
            } else {
                None
            }
        }
        Expr::Log(_) | Expr::Order(_) => None,
        Expr::Conjugate(inner) => Some(*inner.clone()),
        Expr::Abs(inner) => Some(Expr::Abs(inner.clone())),
        other => other.try_map_children(|child| conjugate(child).ok_or(())).ok(),
    }
}

pub fn transpose(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::NaN | Expr::Order(_) => None,
        Expr::Transpose(inner) => Some(*inner.clone()),
        other => Some(other.clone()),
    }
}
