//! Canonicalization of new order terms.

use tracing::debug;

use crate::calculus::{Point, leading_term};
use crate::error::{CasError, Result};
use crate::expr::{Expr, one, zero};
use crate::order::{Containment, Order, OrderArgs, OrderContext, Signature};
use crate::simplify::{
    add_terms, as_independent, expand_log, expand_power_base, find_unexpanded_power, mul_factors,
    simplify, simplify_add, simplify_mul, simplify_pow,
};

impl OrderContext {
    /// `O(expr)` over `args`. Returns an `Expr::Order`, or zero / NaN when the
    /// term collapses.
    pub fn order(&self, expr: &Expr, args: OrderArgs) -> Result<Expr> {
        let signature = Signature {
            expr: expr.clone(),
            args: args.clone(),
        };
        self.cache
            .lookup_or_insert(signature, &mut || self.construct(expr, &args))
    }

    fn construct(&self, expr: &Expr, args: &OrderArgs) -> Result<Expr> {
        let mut pairs = resolve_args(expr, args)?;

        let nested = if let Expr::Order(inner) = expr {
            let mut merged: Vec<(String, Expr)> = inner
                .args()
                .iter()
                .map(|(var, point)| (var.clone(), point.to_expr()))
                .collect();
            for (var, point) in pairs {
                match merged.iter().find(|(v, _)| *v == var) {
                    Some((_, existing)) if *existing != point => {
                        return Err(CasError::MixedPoints(format!(
                            "{var} is taken at {existing} and at {point}"
                        )));
                    }
                    Some(_) => {}
                    None => merged.push((var, point)),
                }
            }
            if merged.len() == inner.args().len() {
                return Ok(expr.clone());
            }
            pairs = merged;
            true
        } else {
            false
        };

        if expr.is_nan() {
            return Ok(Expr::NaN);
        }

        let mut args = Vec::with_capacity(pairs.len());
        for (var, point) in pairs {
            let point = Point::from_expr(&point)
                .ok_or_else(|| CasError::UnsupportedPoint(point.to_string()))?;
            args.push((var, point));
        }
        if let Some((_, first)) = args.first() {
            if args.iter().any(|(_, point)| point != first) {
                return Err(CasError::MixedPoints(
                    "all variables must share one point".into(),
                ));
            }
        }

        let vars: Vec<String> = args.iter().map(|(var, _)| var.clone()).collect();
        let mut expr = simplify(expr.clone());
        if !vars.is_empty() && !nested {
            expr = self.reduce(expr, &args)?;
        }

        if expr.is_zero() {
            return Ok(zero());
        }
        if let Expr::Order(inner) = expr {
            expr = inner.expr().clone();
        }
        if !expr.has_any(&vars) {
            expr = one();
        }

        args.sort();
        Ok(Expr::Order(Box::new(Order::from_parts(expr, args))))
    }

    /// The growth-equivalent representative of `expr`.
    fn reduce(&self, expr: Expr, args: &[(String, Point)]) -> Result<Expr> {
        let vars: Vec<&str> = args.iter().map(|(var, _)| var.as_str()).collect();
        let expr = if vars.len() > 1 {
            let expanded = simplify(self.expand(&expr));
            if let Some(power) = find_unexpanded_power(&expanded, &vars) {
                return Err(CasError::Unsupported(format!(
                    "{power} is above the expansion limit of {}",
                    self.config.expand_power_limit
                )));
            }
            expanded
        } else {
            expr
        };

        if matches!(expr, Expr::Add(..)) {
            let leading = self.extract_leading_order(&expr, args)?;
            return Ok(leading
                .into_iter()
                .map(|(_, order)| match order {
                    Expr::Order(o) => o.expr().clone(),
                    other => other,
                })
                .fold(zero(), simplify_add));
        }
        if expr.is_zero() {
            return Ok(expr);
        }

        let mut expr = expr;
        if args.first().is_some_and(|(_, point)| point.is_zero()) {
            expr = match leading_term(&expr, &vars, self.config.limit_depth) {
                Ok(term) => term,
                Err(err) => {
                    debug!(expr = %expr, error = %err, "no leading term, keeping expression");
                    expr
                }
            };
        }
        let (_, dependent) = as_independent(&expr, &vars);
        let expr = expand_log(&expand_power_base(&dependent));

        Ok(match vars.as_slice() {
            [x] => fold_powers(&expr, x),
            _ => expr,
        })
    }

    /// Splits a sum into `(term, O(term))` pairs, keeping only the terms whose
    /// order is not strictly contained in another's. Equal orders are kept once.
    pub fn extract_leading_order(
        &self,
        expr: &Expr,
        args: &[(String, Point)],
    ) -> Result<Vec<(Expr, Expr)>> {
        let order_args = OrderArgs::from_pairs(args);
        let mut kept: Vec<(Expr, Expr)> = Vec::new();

        for term in add_terms(expr) {
            let of = self.order(&term, order_args.clone())?;
            if of.is_zero() {
                continue;
            }

            let mut absorbed = false;
            for (_, existing) in &kept {
                if *existing == of || self.dominates(existing, &of)? {
                    absorbed = true;
                    break;
                }
            }
            if absorbed {
                continue;
            }

            let mut next = vec![(term, of.clone())];
            for (other_term, other) in kept {
                if !self.dominates(&of, &other)? {
                    next.push((other_term, other));
                }
            }
            kept = next;
        }
        Ok(kept)
    }

    fn dominates(&self, order: &Expr, other: &Expr) -> Result<bool> {
        match order {
            Expr::Order(o) => Ok(self.contains(o, other)? == Containment::Dominates),
            _ => Ok(false),
        }
    }
}

fn resolve_args(expr: &Expr, args: &OrderArgs) -> Result<Vec<(String, Expr)>> {
    let raw: Vec<(Expr, Expr)> = match args {
        OrderArgs::Auto => match expr {
            Expr::Order(inner) => inner
                .args()
                .iter()
                .map(|(var, point)| (Expr::var(var.clone()), point.to_expr()))
                .collect(),
            _ => expr
                .free_symbols()
                .into_iter()
                .map(|var| (Expr::Variable(var), zero()))
                .collect(),
        },
        OrderArgs::Symbols(vars) => vars.iter().map(|v| (v.clone(), zero())).collect(),
        OrderArgs::Points(pairs) => pairs.clone(),
    };

    let mut pairs: Vec<(String, Expr)> = Vec::with_capacity(raw.len());
    for (var, point) in &raw {
        let Expr::Variable(name) = var else {
            return Err(CasError::InvalidVariable(var.to_string()));
        };
        pairs.push((name.clone(), point.clone()));
    }
    for (i, (name, _)) in pairs.iter().enumerate() {
        if pairs[..i].iter().any(|(other, _)| other == name) {
            return Err(CasError::DuplicateVariable(name.clone()));
        }
    }
    Ok(pairs)
}

/// Rewrites top-level factors `x^q`, `(-x)^q`, `(x^r)^q` and `(-(x^r))^q` as a
/// plain power of `x`; the sign of the base does not change the growth rate.
fn fold_powers(expr: &Expr, x: &str) -> Expr {
    let (_, dependent) = as_independent(expr, &[x]);
    mul_factors(&dependent)
        .into_iter()
        .map(|factor| fold_factor(factor, x))
        .fold(one(), simplify_mul)
}

fn fold_factor(factor: Expr, x: &str) -> Expr {
    let Expr::Pow(base, q) = &factor else {
        return factor;
    };
    if q.has(x) {
        return factor;
    }

    let var = Expr::var(x);
    if is_signed_var(base, x) && q.is_real() {
        return simplify_pow(var, (**q).clone());
    }

    let inner = match &**base {
        Expr::Neg(inner) => &**inner,
        other => other,
    };
    match inner {
        Expr::Pow(b, r) if !r.has(x) && is_signed_var(b, x) && r.is_real() => {
            simplify_pow(var, simplify_mul((**r).clone(), (**q).clone()))
        }
        _ => factor,
    }
}

fn is_signed_var(expr: &Expr, x: &str) -> bool {
    match expr {
        Expr::Variable(name) => name == x,
        Expr::Neg(inner) => matches!(&**inner, Expr::Variable(name) if name == x),
        _ => false,
    }
}
