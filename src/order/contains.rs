//! Growth comparison between order terms.

use tracing::debug;

use crate::calculus::{LimitError, Point};
use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::order::{Containment, Order, OrderArgs, OrderContext};
use crate::simplify::{add_terms, normalize, simplify_div};

impl OrderContext {
    /// Whether `order` dominates `other` (`other ∈ order`).
    pub fn contains(&self, order: &Order, other: &Expr) -> Result<Containment> {
        match other {
            e if e.is_zero() => Ok(Containment::Dominates),
            Expr::NaN => Ok(Containment::DoesNotDominate),
            Expr::Order(o) => self.contains_order(order, o),
            _ => match self.order(other, OrderArgs::from_pairs(order.args()))? {
                Expr::Order(o) => self.contains_order(order, &o),
                wrapped => self.contains(order, &wrapped),
            },
        }
    }

    /// Like [`contains`](Self::contains), but an undecidable answer is an error.
    pub fn is_member(&self, order: &Order, other: &Expr) -> Result<bool> {
        self.contains(order, other)?
            .as_bool()
            .ok_or_else(|| CasError::IndeterminateMembership(other.to_string()))
    }

    fn contains_order(&self, order: &Order, other: &Order) -> Result<Containment> {
        let point = match (order.point(), other.point()) {
            (Some(ours), Some(theirs)) if ours != theirs => {
                return Err(CasError::MixedPoints(format!(
                    "cannot compare {order} and {other}"
                )));
            }
            (Some(point), _) | (None, Some(point)) => point,
            (None, None) => Point::Zero,
        };

        if order.expr() == other.expr() {
            let covered = other.args().iter().all(|arg| order.args().contains(arg));
            return Ok(Containment::from_bool(covered));
        }

        if matches!(other.expr(), Expr::Add(..)) {
            for term in add_terms(other.expr()) {
                if self.contains(order, &term)? != Containment::Dominates {
                    return Ok(Containment::DoesNotDominate);
                }
            }
            return Ok(Containment::Dominates);
        }

        if matches!(order.expr(), Expr::Add(..)) {
            let wrapped = other.to_expr();
            for term in add_terms(order.expr()) {
                if let Expr::Order(part) = self.rebuild(&term, order.args())? {
                    if self.contains(&part, &wrapped)? == Containment::Dominates {
                        return Ok(Containment::Dominates);
                    }
                }
            }
            return Ok(Containment::DoesNotDominate);
        }

        let ours = order.variables();
        let theirs = other.variables();
        let common: Vec<&str> = match (ours.is_empty(), theirs.is_empty()) {
            (false, false) => ours.into_iter().filter(|v| theirs.contains(v)).collect(),
            (false, true) => ours,
            (true, _) => theirs,
        };
        if common.is_empty() {
            return Ok(Containment::Unknown);
        }

        let ratio = normalize(simplify_div(order.expr().clone(), other.expr().clone()));
        let mut verdict: Option<bool> = None;
        for var in common {
            let axis = match self.limit(&ratio, var, point) {
                Ok(value) => Some(!value.is_zero()),
                Err(LimitError::Pole(reason)) => {
                    debug!(ratio = %ratio, var, reason = %reason, "pole while comparing orders");
                    None
                }
                Err(err) => return Err(err.into()),
            };
            match (verdict, axis) {
                (Some(a), Some(b)) if a != b => return Ok(Containment::Unknown),
                (None, Some(b)) => verdict = Some(b),
                _ => {}
            }
        }

        Ok(verdict.map_or(Containment::Unknown, Containment::from_bool))
    }
}
