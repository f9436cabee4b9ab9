//! Asymptotic order terms, `O(f)`, at `0+` or `+oo`.
//!
//! Order terms are only ever built through an [`OrderContext`], which owns the
//! construction cache and the limit settings used to compare growth rates.

mod arith;
mod cache;
mod construct;
mod contains;
mod context;
mod ops;

use std::collections::BTreeSet;
use std::fmt;

use crate::calculus::Point;
use crate::error::{CasError, Result};
use crate::expr::{Expr, zero};

pub use arith::{get_o, remove_o};
pub use cache::{BoundedCache, ConstructionCache, NoCache, Signature, UnboundedCache};
pub use context::OrderContext;

/// A canonical order term: a representative expression plus its sorted,
/// duplicate-free `(variable, point)` pairs.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order {
    expr: Expr,
    args: Vec<(String, Point)>,
}

impl Order {
    pub(crate) fn from_parts(expr: Expr, args: Vec<(String, Point)>) -> Self {
        Self { expr, args }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn args(&self) -> &[(String, Point)] {
        &self.args
    }

    pub fn variables(&self) -> Vec<&str> {
        self.args.iter().map(|(var, _)| var.as_str()).collect()
    }

    /// The common point of all variables, `None` for a term without variables.
    pub fn point(&self) -> Option<Point> {
        self.args.first().map(|(_, point)| *point)
    }

    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = self.expr.free_symbols();
        symbols.extend(self.args.iter().map(|(var, _)| var.clone()));
        symbols
    }

    pub fn remove_o(&self) -> Expr {
        zero()
    }

    pub fn get_o(&self) -> Expr {
        self.to_expr()
    }

    pub fn to_expr(&self) -> Expr {
        Expr::Order(Box::new(self.clone()))
    }

    /// Folds this term's variables into `order_symbols`, the running set of a
    /// product, and returns the representative with the merged set.
    pub fn as_expr_variables(
        &self,
        order_symbols: Option<&[(String, Point)]>,
    ) -> Result<(Expr, Vec<(String, Point)>)> {
        let Some(symbols) = order_symbols else {
            return Ok((self.expr.clone(), self.args.clone()));
        };

        let mut merged = symbols.to_vec();
        if let (Some((_, theirs)), Some(ours)) = (symbols.first(), self.point()) {
            if *theirs != ours {
                return Err(CasError::MixedPoints(format!(
                    "cannot multiply order terms at {theirs} and {ours}"
                )));
            }
        }
        for (var, point) in &self.args {
            if !merged.iter().any(|(v, _)| v == var) {
                merged.push((var.clone(), *point));
            }
        }
        merged.sort();
        Ok((self.expr.clone(), merged))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty_order(self))
    }
}

/// How the variables of a new order term are given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderArgs {
    /// Reuse the variables of an order term, or take every free symbol at zero.
    #[default]
    Auto,
    /// Symbols, all at zero.
    Symbols(Vec<Expr>),
    /// Explicit `(symbol, point)` pairs.
    Points(Vec<(Expr, Expr)>),
}

impl OrderArgs {
    pub fn symbols(names: &[&str]) -> Self {
        OrderArgs::Symbols(names.iter().map(|name| Expr::var(*name)).collect())
    }

    pub fn at(names: &[&str], point: Point) -> Self {
        OrderArgs::Points(
            names
                .iter()
                .map(|name| (Expr::var(*name), point.to_expr()))
                .collect(),
        )
    }

    /// The arguments of an existing term; an empty set falls back to `Auto`.
    pub fn from_pairs(pairs: &[(String, Point)]) -> Self {
        if pairs.is_empty() {
            return OrderArgs::Auto;
        }
        OrderArgs::Points(
            pairs
                .iter()
                .map(|(var, point)| (Expr::var(var.clone()), point.to_expr()))
                .collect(),
        )
    }
}

/// Outcome of a containment check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    Dominates,
    DoesNotDominate,
    Unknown,
}

impl Containment {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Containment::Dominates
        } else {
            Containment::DoesNotDominate
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Containment::Dominates => Some(true),
            Containment::DoesNotDominate => Some(false),
            Containment::Unknown => None,
        }
    }
}
