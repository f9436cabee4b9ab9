//! Expression tree definitions and helpers.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::order::Order;

pub type Rational = BigRational;

static FRESH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A symbolic expression.
///
/// The derived `Ord` is the canonical total order of the library: sums and
/// products are sorted with it and order-term variables are listed in it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Expr {
    Variable(String),
    Constant(Rational),
    /// Positive infinity, `oo`.
    Infinity,
    NaN,
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Atan(Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Abs(Box<Expr>),
    Conjugate(Box<Expr>),
    Transpose(Box<Expr>),
    Order(Box<Order>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn constant(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::new(num.into(), den.into()))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::from_integer(value.into()))
    }

    pub fn rational(value: Rational) -> Self {
        Expr::Constant(value)
    }

    pub fn negate(self) -> Self {
        match self {
            Expr::Constant(r) => Expr::Constant(-r),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_one())
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Expr::NaN)
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn as_order(&self) -> Option<&Order> {
        if let Expr::Order(order) = self {
            Some(order)
        } else {
            None
        }
    }

    pub fn as_constant(&self) -> Option<&Rational> {
        if let Expr::Constant(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Direct sub-expressions. Order terms expose their representative only.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Variable(_) | Expr::Constant(_) | Expr::Infinity | Expr::NaN => Vec::new(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => vec![a, b],
            Expr::Neg(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Atan(a)
            | Expr::Exp(a)
            | Expr::Log(a)
            | Expr::Abs(a)
            | Expr::Conjugate(a)
            | Expr::Transpose(a) => vec![a],
            Expr::Order(order) => vec![order.expr()],
        }
    }

    /// Rebuilds the node with `f` applied to every direct child.
    ///
    /// Order terms are returned as they are: their representative can only be
    /// rebuilt through the order context.
    pub fn map_children<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match self.try_map_children(|child| Ok::<Expr, std::convert::Infallible>(f(child))) {
            Ok(expr) => expr,
            Err(never) => match never {},
        }
    }

    pub fn try_map_children<F, E>(&self, mut f: F) -> Result<Expr, E>
    where
        F: FnMut(&Expr) -> Result<Expr, E>,
    {
        Ok(match self {
            Expr::Variable(_)
            | Expr::Constant(_)
            | Expr::Infinity
            | Expr::NaN
            | Expr::Order(_) => self.clone(),
            Expr::Add(a, b) => Expr::Add(f(a)?.boxed(), f(b)?.boxed()),
            Expr::Sub(a, b) => Expr::Sub(f(a)?.boxed(), f(b)?.boxed()),
            Expr::Mul(a, b) => Expr::Mul(f(a)?.boxed(), f(b)?.boxed()),
            Expr::Div(a, b) => Expr::Div(f(a)?.boxed(), f(b)?.boxed()),
            Expr::Pow(a, b) => Expr::Pow(f(a)?.boxed(), f(b)?.boxed()),
            Expr::Neg(a) => Expr::Neg(f(a)?.boxed()),
            Expr::Sin(a) => Expr::Sin(f(a)?.boxed()),
            Expr::Cos(a) => Expr::Cos(f(a)?.boxed()),
            Expr::Tan(a) => Expr::Tan(f(a)?.boxed()),
            Expr::Atan(a) => Expr::Atan(f(a)?.boxed()),
            Expr::Exp(a) => Expr::Exp(f(a)?.boxed()),
            Expr::Log(a) => Expr::Log(f(a)?.boxed()),
            Expr::Abs(a) => Expr::Abs(f(a)?.boxed()),
            Expr::Conjugate(a) => Expr::Conjugate(f(a)?.boxed()),
            Expr::Transpose(a) => Expr::Transpose(f(a)?.boxed()),
        })
    }

    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Variable(name) => {
                out.insert(name.clone());
            }
            Expr::Order(order) => out.extend(order.free_symbols()),
            other => {
                for child in other.children() {
                    child.collect_symbols(out);
                }
            }
        }
    }

    pub fn has(&self, var: &str) -> bool {
        match self {
            Expr::Variable(name) => name == var,
            Expr::Order(order) => order.free_symbols().contains(var),
            other => other.children().into_iter().any(|child| child.has(var)),
        }
    }

    pub fn has_any<S: AsRef<str>>(&self, vars: &[S]) -> bool {
        vars.iter().any(|v| self.has(v.as_ref()))
    }

    pub fn contains_order(&self) -> bool {
        match self {
            Expr::Order(_) => true,
            other => other.children().into_iter().any(Expr::contains_order),
        }
    }

    /// True when the expression has no free symbols and carries no order term.
    pub fn is_number(&self) -> bool {
        self.free_symbols().is_empty() && !self.contains_order()
    }

    /// Conservative realness test. Symbols are treated as real-valued.
    pub fn is_real(&self) -> bool {
        match self {
            Expr::Variable(_) | Expr::Constant(_) => true,
            Expr::Infinity | Expr::NaN | Expr::Order(_) => false,
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.is_real() && b.is_real()
            }
            Expr::Pow(base, exp) => {
                let integer_exp = matches!(&**exp, Expr::Constant(e) if e.is_integer());
                integer_exp && base.is_real()
            }
            Expr::Neg(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Atan(a)
            | Expr::Exp(a)
            | Expr::Abs(a)
            | Expr::Conjugate(a)
            | Expr::Transpose(a) => a.is_real(),
            Expr::Tan(_) | Expr::Log(_) => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

/// A placeholder symbol. The leading underscore keeps it out of reach of the
/// parser, so it never clashes with user variables.
pub fn fresh_symbol(prefix: &str) -> Expr {
    let id = FRESH_COUNTER.fetch_add(1, Ordering::Relaxed);
    Expr::Variable(format!("_{prefix}{id}"))
}

pub fn zero() -> Expr {
    Expr::Constant(Rational::zero())
}

pub fn one() -> Expr {
    Expr::Constant(Rational::one())
}

pub fn rational(num: i64, den: i64) -> Rational {
    Rational::new(num.into(), den.into())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}
