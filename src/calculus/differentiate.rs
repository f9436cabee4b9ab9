use crate::expr::{Expr, Rational, one};
use crate::simplify::{simplify, simplify_add, simplify_sub};
use num_traits::{One, Zero};

/// Derivative of `expr` with respect to `var`.
///
/// Order terms are returned as they are; `OrderContext::diff` rebuilds them.
pub fn differentiate(var: &str, expr: &Expr) -> Expr {
    Differentiator { var }.derive(expr)
}

struct Differentiator<'a> {
    var: &'a str,
}

impl<'a> Differentiator<'a> {
    fn derive(&self, expr: &Expr) -> Expr {
        if !expr.has(self.var) {
            return match expr {
                Expr::NaN => Expr::NaN,
                Expr::Order(_) => expr.clone(),
                _ => Expr::Constant(Rational::zero()),
            };
        }

        match expr {
            Expr::Variable(_) => Expr::Constant(Rational::one()),
            Expr::Constant(_) | Expr::Infinity => Expr::Constant(Rational::zero()),
            Expr::NaN => Expr::NaN,
            Expr::Order(_) => expr.clone(),

            Expr::Add(a, b) => simplify_add(self.derive(a), self.derive(b)),
            Expr::Sub(a, b) => simplify_sub(self.derive(a), self.derive(b)),
            Expr::Mul(a, b) => self.product_rule(a, b),
            Expr::Div(a, b) => self.quotient_rule(a, b),
            Expr::Pow(a, b) => self.power_rule(a, b),
            Expr::Neg(a) => simplify(Expr::Neg(self.derive(a).boxed())),

            Expr::Sin(a) => self.chain_rule(a, |inner| Expr::Cos(inner.boxed())),
            Expr::Cos(a) => simplify(Expr::Neg(
                self.chain_rule(a, |inner| Expr::Sin(inner.boxed())).boxed(),
            )),
            Expr::Tan(a) => self.chain_rule(a, |inner| {
                Expr::Pow(
                    Expr::Cos(inner.boxed()).boxed(),
                    Expr::Constant(Rational::from_integer((-2).into())).boxed(),
                )
            }),
            Expr::Atan(a) => self.chain_rule(a, |inner| {
                Expr::Pow(
                    Expr::Add(
                        one().boxed(),
                        Expr::Pow(
                            inner.boxed(),
                            Expr::Constant(Rational::from_integer(2.into())).boxed(),
                        )
                        .boxed(),
                    )
                    .boxed(),
                    Expr::Constant(Rational::from_integer((-1).into())).boxed(),
                )
            }),

            Expr::Exp(a) => simplify(Expr::Mul(
                self.derive(a).boxed(),
                Expr::Exp(a.clone()).boxed(),
            )),
            Expr::Log(a) => simplify(Expr::Div(self.derive(a).boxed(), a.clone().boxed())),
            Expr::Abs(a) => self.chain_rule(a, |inner| {
                Expr::Div(inner.clone().boxed(), Expr::Abs(inner.boxed()).boxed())
            }),
            Expr::Conjugate(a) => simplify(Expr::Conjugate(self.derive(a).boxed())),
            Expr::Transpose(a) => simplify(Expr::Transpose(self.derive(a).boxed())),
        }
    }

    fn product_rule(&self, a: &Expr, b: &Expr) -> Expr {
        let da = self.derive(a);
        let db = self.derive(b);
        simplify(Expr::Add(
            Expr::Mul(da.boxed(), b.clone().boxed()).boxed(),
            Expr::Mul(a.clone().boxed(), db.boxed()).boxed(),
        ))
    }

    fn quotient_rule(&self, a: &Expr, b: &Expr) -> Expr {
        simplify(Expr::Div(
            Expr::Sub(
                Expr::Mul(self.derive(a).boxed(), b.clone().boxed()).boxed(),
                Expr::Mul(a.clone().boxed(), self.derive(b).boxed()).boxed(),
            )
            .boxed(),
            Expr::Pow(
                b.clone().boxed(),
                Expr::Constant(Rational::from_integer(2.into())).boxed(),
            )
            .boxed(),
        ))
    }

    fn power_rule(&self, base: &Expr, exp: &Expr) -> Expr {
        if !exp.has(self.var) {
            let db = self.derive(base);
            let lowered = simplify(Expr::Sub(exp.clone().boxed(), one().boxed()));
            return simplify(Expr::Mul(
                Expr::Mul(
                    exp.clone().boxed(),
                    Expr::Pow(base.clone().boxed(), lowered.boxed()).boxed(),
                )
                .boxed(),
                db.boxed(),
            ));
        }

        let f = Expr::Pow(base.clone().boxed(), exp.clone().boxed());
        let da = self.derive(base);
        let db = self.derive(exp);
        simplify(Expr::Mul(
            f.boxed(),
            Expr::Add(
                Expr::Mul(db.boxed(), Expr::Log(base.clone().boxed()).boxed()).boxed(),
                Expr::Div(
                    Expr::Mul(exp.clone().boxed(), da.boxed()).boxed(),
                    base.clone().boxed(),
                )
                .boxed(),
            )
            .boxed(),
        ))
    }

    fn chain_rule<F>(&self, arg: &Expr, outer: F) -> Expr
    where
        F: Fn(Expr) -> Expr,
    {
        let da = self.derive(arg);
        simplify(Expr::Mul(da.boxed(), outer(arg.clone()).boxed()))
    }
}
