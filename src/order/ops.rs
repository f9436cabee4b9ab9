//! Operators on a single order term.

use num_traits::Signed;

use crate::calculus::{LimitResult, Point, differentiate};
use crate::error::{CasError, Result};
use crate::expr::{Expr, fresh_symbol, pow};
use crate::order::{Order, OrderArgs, OrderContext};
use crate::simplify::{conjugate, numer_denom, simplify, simplify_pow, substitute, transpose};

impl OrderContext {
    /// `O(f)^e` for a non-negative rational `e`; `None` leaves the power unevaluated.
    pub fn pow(&self, order: &Order, exp: &Expr) -> Result<Option<Expr>> {
        match exp {
            Expr::Constant(e) if !e.is_negative() => {
                let raised = simplify_pow(order.expr().clone(), exp.clone());
                self.rebuild(&raised, order.args()).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// `d/dvar O(f) = O(df/dvar)`, or the term itself when the derivative vanishes.
    pub fn diff(&self, order: &Order, var: &str) -> Result<Expr> {
        let derivative = differentiate(var, order.expr());
        let rebuilt = self.rebuild(&derivative, order.args())?;
        if rebuilt.is_zero() {
            Ok(order.to_expr())
        } else {
            Ok(rebuilt)
        }
    }

    pub fn conjugate(&self, order: &Order) -> Result<Option<Expr>> {
        match conjugate(order.expr()) {
            Some(expr) => self.rebuild(&simplify(expr), order.args()).map(Some),
            None => Ok(None),
        }
    }

    pub fn transpose(&self, order: &Order) -> Result<Option<Expr>> {
        match transpose(order.expr()) {
            Some(expr) => self.rebuild(&simplify(expr), order.args()).map(Some),
            None => Ok(None),
        }
    }

    /// Substitutes `new` for the variable `old`.
    ///
    /// Replacing an order variable re-derives the variable set and the point:
    /// a symbol renames the variable in place, anything else takes the free
    /// symbols of the result, moving the point to `0^p` or `oo^p` where `p` is
    /// `-1` when `new` has a symbolic denominator.
    pub fn subs(&self, order: &Order, old: &str, new: &Expr) -> Result<Expr> {
        let replaced = simplify(substitute(order.expr(), old, new));
        let Some(index) = order.args().iter().position(|(var, _)| var == old) else {
            return self.rebuild(&replaced, order.args());
        };

        if let Expr::Variable(name) = new {
            let mut args = order.args().to_vec();
            args[index].0 = name.clone();
            return self.rebuild(&replaced, &args);
        }

        let mut vars: Vec<String> = replaced.free_symbols().into_iter().collect();
        for (i, (var, _)) in order.args().iter().enumerate() {
            if i != index && !vars.contains(var) {
                vars.push(var.clone());
            }
        }

        let (_, denom) = numer_denom(new);
        let exponent = if denom.is_number() { 1 } else { -1 };
        let point = order.args()[index].1;
        let moved = moved_point(self, point, exponent)?;

        let pairs = vars
            .into_iter()
            .map(|var| (Expr::Variable(var), moved.to_expr()))
            .collect();
        self.order(&replaced, OrderArgs::Points(pairs))
    }
}

/// `point^exponent`, falling back to a one-sided limit when the power does
/// not evaluate to `0` or `oo` directly.
fn moved_point(ctx: &OrderContext, point: Point, exponent: i64) -> Result<Point> {
    let direct = simplify_pow(point.to_expr(), Expr::integer(exponent));
    if let Some(moved) = Point::from_expr(&direct) {
        return Ok(moved);
    }

    let t = fresh_symbol("t");
    let Expr::Variable(name) = &t else {
        return Err(CasError::Unsupported("placeholder is not a symbol".into()));
    };
    match ctx.limit(&pow(t.clone(), Expr::integer(exponent)), name, point)? {
        LimitResult::PosInfinity => Ok(Point::Infinity),
        value if value.is_zero() => Ok(Point::Zero),
        value => Err(CasError::UnsupportedPoint(format!("{value:?}"))),
    }
}
