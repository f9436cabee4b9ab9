//! One-sided limits at `0+` and `+oo`.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::calculus::asymptotic::{Asymptotics, Tendency, sign_of};
use crate::expr::{Expr, pow, zero};
use crate::simplify::{simplify, substitute};

pub const DEFAULT_LIMIT_DEPTH: usize = 64;

/// The two points an order term may be taken at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Point {
    /// `x -> 0+`
    Zero,
    /// `x -> +oo`
    Infinity,
}

impl Point {
    pub fn is_zero(self) -> bool {
        self == Point::Zero
    }

    pub fn to_expr(self) -> Expr {
        match self {
            Point::Zero => zero(),
            Point::Infinity => Expr::Infinity,
        }
    }

    /// `Some` only for the literal values `0` and `oo`.
    pub fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Infinity => Some(Point::Infinity),
            e if e.is_zero() => Some(Point::Zero),
            _ => None,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Zero => write!(f, "0"),
            Point::Infinity => write!(f, "oo"),
        }
    }
}

/// The result of a limit computation.
#[derive(Clone, Debug, PartialEq)]
pub enum LimitResult {
    /// A finite limit value.
    Finite(Expr),
    /// The limit is `+oo`.
    PosInfinity,
    /// The limit is `-oo`.
    NegInfinity,
    /// Grows without bound, with an unknown or oscillating sign.
    Unbounded,
    /// Oscillates without settling.
    DoesNotExist,
}

impl LimitResult {
    pub fn is_zero(&self) -> bool {
        matches!(self, LimitResult::Finite(value) if value.is_zero())
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, LimitResult::Finite(_))
    }
}

/// Errors that can occur during limit computation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("pole: {0}")]
    Pole(String),
    #[error("cannot compute limit: {0}")]
    Unsupported(String),
    #[error("limit recursion exceeded depth {0}")]
    DepthExceeded(usize),
}

/// `lim expr` as `var` approaches `point` (from the right at zero).
pub fn limit(expr: &Expr, var: &str, point: Point) -> Result<LimitResult, LimitError> {
    limit_with_depth(expr, var, point, DEFAULT_LIMIT_DEPTH)
}

pub fn limit_with_depth(
    expr: &Expr,
    var: &str,
    point: Point,
    max_depth: usize,
) -> Result<LimitResult, LimitError> {
    let at_infinity = match point {
        Point::Infinity => simplify(expr.clone()),
        Point::Zero => simplify(substitute(expr, var, &pow(Expr::var(var), Expr::integer(-1)))),
    };

    let engine = Asymptotics::new(var, max_depth);
    let Some(d) = engine.dominant(&at_infinity)? else {
        return Ok(LimitResult::Finite(zero()));
    };

    let result = match engine.tendency(&d)? {
        Tendency::Vanishing => LimitResult::Finite(zero()),
        Tendency::Bounded if d.oscillating => LimitResult::DoesNotExist,
        Tendency::Bounded => LimitResult::Finite(d.coeff),
        Tendency::Unbounded if d.oscillating => LimitResult::Unbounded,
        Tendency::Unbounded => match sign_of(&d.coeff) {
            Some(Ordering::Greater) => LimitResult::PosInfinity,
            Some(Ordering::Less) => LimitResult::NegInfinity,
            _ => LimitResult::Unbounded,
        },
    };
    trace!(expr = %expr, var, point = %point, result = ?result, "limit");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn lim(input: &str, point: Point) -> LimitResult {
        limit(&parse_expr(input).expect("parse input"), "x", point).expect("limit")
    }

    #[test]
    fn points_round_trip_through_expressions() {
        assert_eq!(Point::from_expr(&Point::Infinity.to_expr()), Some(Point::Infinity));
        assert_eq!(Point::from_expr(&Expr::integer(1)), None);
    }

    #[test]
    fn ratio_of_powers() {
        assert_eq!(lim("x/x^2", Point::Zero), LimitResult::PosInfinity);
        assert!(lim("x^2/x", Point::Zero).is_zero());
        assert!(lim("x/x^2", Point::Infinity).is_zero());
    }

    #[test]
    fn pole_in_tangent() {
        let err = limit(&parse_expr("tan(x)").unwrap(), "x", Point::Infinity).unwrap_err();
        assert!(matches!(err, LimitError::Pole(_)));
    }
}
