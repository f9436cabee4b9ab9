//! Sums and products of expressions that carry order terms.

use crate::calculus::{Point, differentiate};
use crate::error::Result;
use crate::expr::{Expr, one, zero};
use crate::order::{Containment, Order, OrderArgs, OrderContext};
use crate::simplify::{add_terms, mul_factors, simplify, simplify_add, simplify_mul, substitute};

impl OrderContext {
    pub fn add(&self, a: &Expr, b: &Expr) -> Result<Expr> {
        self.sum(&[a.clone(), b.clone()])
    }

    pub fn mul(&self, a: &Expr, b: &Expr) -> Result<Expr> {
        self.product(&[a.clone(), b.clone()])
    }

    /// Adds `terms`, dropping order terms contained in other order terms and
    /// ordinary terms any order term contains.
    pub fn sum(&self, terms: &[Expr]) -> Result<Expr> {
        let combined = terms
            .iter()
            .map(|term| simplify(term.clone()))
            .fold(zero(), simplify_add);
        if !combined.contains_order() {
            return Ok(combined);
        }

        let mut incoming: Vec<Order> = Vec::new();
        let mut regular: Vec<Expr> = Vec::new();
        for term in add_terms(&combined) {
            match term {
                Expr::Order(o) => incoming.push(*o),
                t if t.contains_order() => match self.absorb(&t)? {
                    Expr::Order(o) => incoming.push(*o),
                    other => regular.push(other),
                },
                t => regular.push(t),
            }
        }

        let mut orders: Vec<Order> = Vec::new();
        'incoming: for o in incoming {
            for existing in &orders {
                if self.contains(existing, &o.to_expr())? == Containment::Dominates {
                    continue 'incoming;
                }
            }
            let mut next = vec![o.clone()];
            for existing in orders {
                if self.contains(&o, &existing.to_expr())? != Containment::Dominates {
                    next.push(existing);
                }
            }
            orders = next;
        }

        let mut kept = Vec::with_capacity(regular.len());
        'regular: for term in regular {
            for o in &orders {
                if self.contains(o, &term)? == Containment::Dominates {
                    continue 'regular;
                }
            }
            kept.push(term);
        }

        Ok(kept
            .into_iter()
            .chain(orders.into_iter().map(|o| o.to_expr()))
            .fold(zero(), simplify_add))
    }

    /// Multiplies `factors`. Order factors contribute their representative and
    /// merge their variables; sums holding order terms are distributed first.
    pub fn product(&self, factors: &[Expr]) -> Result<Expr> {
        let factors: Vec<Expr> = factors.iter().map(|f| simplify(f.clone())).collect();
        let split = factors
            .iter()
            .position(|f| matches!(f, Expr::Add(..) | Expr::Sub(..)) && f.contains_order());
        if let Some(index) = split {
            let rest: Vec<Expr> = factors
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, f)| f.clone())
                .collect();
            let parts = add_terms(&factors[index])
                .into_iter()
                .map(|term| {
                    let mut all = rest.clone();
                    all.push(term);
                    self.product(&all)
                })
                .collect::<Result<Vec<_>>>()?;
            return self.sum(&parts);
        }

        let mut order_symbols: Option<Vec<(String, Point)>> = None;
        let mut plain = one();
        for factor in &factors {
            for part in mul_factors(factor) {
                let part = match part {
                    Expr::Pow(base, exp) => match *base {
                        Expr::Order(o) => match self.pow(&o, &exp)? {
                            Some(raised) => raised,
                            None => Expr::Pow(Box::new(Expr::Order(o)), exp),
                        },
                        base => Expr::Pow(Box::new(base), exp),
                    },
                    other => other,
                };
                let part = match part {
                    Expr::Order(o) => {
                        let (expr, symbols) = o.as_expr_variables(order_symbols.as_deref())?;
                        order_symbols = Some(symbols);
                        expr
                    }
                    other => other,
                };
                plain = simplify_mul(plain, part);
            }
        }

        match order_symbols {
            Some(symbols) => self.order(&plain, OrderArgs::from_pairs(&symbols)),
            None => Ok(plain),
        }
    }

    /// Simplifies `expr`, then lets every order term absorb what it dominates.
    pub fn simplify(&self, expr: &Expr) -> Result<Expr> {
        let plain = simplify(expr.clone());
        if !plain.contains_order() {
            return Ok(plain);
        }
        self.absorb(&plain)
    }

    fn absorb(&self, expr: &Expr) -> Result<Expr> {
        match expr {
            Expr::Add(..) | Expr::Sub(..) => {
                let terms = add_terms(expr)
                    .iter()
                    .map(|t| self.absorb(t))
                    .collect::<Result<Vec<_>>>()?;
                self.sum(&terms)
            }
            Expr::Mul(..) | Expr::Neg(_) | Expr::Div(..) => {
                let factors = mul_factors(expr)
                    .iter()
                    .map(|f| self.absorb(f))
                    .collect::<Result<Vec<_>>>()?;
                self.product(&factors)
            }
            Expr::Pow(base, exp) => match &**base {
                Expr::Order(o) => Ok(self.pow(o, exp)?.unwrap_or_else(|| expr.clone())),
                _ => Ok(expr.clone()),
            },
            other => Ok(other.clone()),
        }
    }

    /// Differentiates a whole expression, rebuilding every order summand.
    pub fn diff_expr(&self, expr: &Expr, var: &str) -> Result<Expr> {
        let expr = self.simplify(expr)?;
        let parts = add_terms(&expr)
            .into_iter()
            .map(|term| match term {
                Expr::Order(o) => self.diff(&o, var),
                other => Ok(differentiate(var, &other)),
            })
            .collect::<Result<Vec<_>>>()?;
        self.sum(&parts)
    }

    /// Substitutes into a whole expression, rebuilding every order summand.
    pub fn subs_expr(&self, expr: &Expr, old: &str, new: &Expr) -> Result<Expr> {
        let expr = self.simplify(expr)?;
        let parts = add_terms(&expr)
            .into_iter()
            .map(|term| match term {
                Expr::Order(o) => self.subs(&o, old, new),
                other => Ok(simplify(substitute(&other, old, new))),
            })
            .collect::<Result<Vec<_>>>()?;
        self.sum(&parts)
    }
}

/// `expr` without its order summands.
pub fn remove_o(expr: &Expr) -> Expr {
    add_terms(expr)
        .into_iter()
        .filter(|term| !matches!(term, Expr::Order(_)))
        .fold(zero(), simplify_add)
}

/// The order summands of `expr`, if it has any.
pub fn get_o(expr: &Expr) -> Option<Expr> {
    let orders: Vec<Expr> = add_terms(expr)
        .into_iter()
        .filter(|term| matches!(term, Expr::Order(_)))
        .collect();
    if orders.is_empty() {
        None
    } else {
        Some(orders.into_iter().fold(zero(), simplify_add))
    }
}
