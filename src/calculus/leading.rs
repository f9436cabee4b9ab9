use num_traits::Zero;
use tracing::trace;

use crate::calculus::asymptotic::Asymptotics;
use crate::calculus::limit::LimitError;
use crate::expr::{Expr, neg, pow, zero};
use crate::simplify::{simplify, simplify_mul, substitute};

/// Leading term of `expr` as every variable in `vars` tends to `0+`, taken one
/// variable at a time in the given order.
pub fn leading_term<S: AsRef<str>>(
    expr: &Expr,
    vars: &[S],
    max_depth: usize,
) -> Result<Expr, LimitError> {
    vars.iter().try_fold(simplify(expr.clone()), |acc, var| {
        leading_term_in(&acc, var.as_ref(), max_depth)
    })
}

fn leading_term_in(expr: &Expr, var: &str, max_depth: usize) -> Result<Expr, LimitError> {
    if !expr.has(var) {
        return Ok(expr.clone());
    }

    let x = Expr::var(var);
    let reciprocal = pow(x.clone(), Expr::integer(-1));
    let flipped = simplify(substitute(expr, var, &reciprocal));

    let Some(d) = Asymptotics::new(var, max_depth).dominant(&flipped)? else {
        return Ok(zero());
    };
    if d.oscillating {
        return Err(LimitError::Unsupported(format!(
            "{expr} oscillates as {var} -> 0"
        )));
    }

    // t = 1/x, so t^p = x^-p and log(t) = -log(x).
    let mut term = simplify_mul(
        d.coeff,
        pow(x.clone(), Expr::Constant(-d.power.clone())),
    );
    if !d.log_power.is_zero() {
        term = simplify_mul(
            term,
            pow(neg(Expr::Log(x.boxed())), Expr::Constant(d.log_power.clone())),
        );
    }
    if !d.growth.is_zero() {
        term = simplify_mul(term, Expr::Exp(substitute(&d.growth, var, &reciprocal).boxed()));
    }

    let term = simplify(term);
    trace!(expr = %expr, var, leading = %term, "leading term");
    Ok(term)
}
