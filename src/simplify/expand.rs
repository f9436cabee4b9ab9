//! Expansion passes: products and powers of sums, power bases and logarithms.

use num_traits::{Signed, ToPrimitive};

use crate::expr::{Expr, Rational};
use crate::simplify::rules::{
    add_terms, mul_factors, simplify, simplify_add, simplify_log, simplify_mul, simplify_pow,
    split_coeff,
};

pub const DEFAULT_EXPAND_POWER_LIMIT: u32 = 16;

/// Fully multiply out products of sums and positive integer powers of sums.
pub fn expand(expr: &Expr) -> Expr {
    expand_with_limit(expr, DEFAULT_EXPAND_POWER_LIMIT)
}

/// Like [`expand`], leaving powers of sums above `power_limit` unexpanded.
pub fn expand_with_limit(expr: &Expr, power_limit: u32) -> Expr {
    Expander { power_limit }.expand(&simplify(expr.clone()))
}

/// A positive integer power of a sum over any of `vars`, as left behind by
/// [`expand_with_limit`] when the exponent is above its limit.
pub fn find_unexpanded_power<'a, S: AsRef<str>>(expr: &'a Expr, vars: &[S]) -> Option<&'a Expr> {
    if let Expr::Pow(base, exp) = expr {
        let sum = matches!(&**base, Expr::Add(..) | Expr::Sub(..));
        let positive_integer = matches!(&**exp, Expr::Constant(e) if e.is_integer() && e.is_positive());
        if sum && positive_integer && base.has_any(vars) {
            return Some(expr);
        }
    }
    if matches!(expr, Expr::Order(_)) {
        return None;
    }
    expr.children()
        .into_iter()
        .find_map(|child| find_unexpanded_power(child, vars))
}

struct Expander {
    power_limit: u32,
}

impl Expander {
    fn expand(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Add(..) | Expr::Sub(..) => add_terms(expr)
                .iter()
                .map(|term| self.expand(term))
                .fold(Expr::integer(0), simplify_add),
            Expr::Mul(..) | Expr::Neg(_) => mul_factors(expr)
                .iter()
                .map(|factor| self.expand(factor))
                .fold(Expr::integer(1), |acc, factor| self.distribute(&acc, &factor)),
            Expr::Pow(base, exp) => {
                let base = self.expand(base);
                let exp = self.expand(exp);
                if let Some(n) = self.small_power(&base, &exp) {
                    let mut acc = Expr::integer(1);
                    for _ in 0..n {
                        acc = self.distribute(&acc, &base);
                    }
                    return acc;
                }
                match simplify_pow(base, exp) {
                    product @ Expr::Mul(..) => self.expand(&product),
                    other => other,
                }
            }
            Expr::Order(_) => expr.clone(),
            other => simplify(other.map_children(|child| self.expand(child))),
        }
    }

    fn small_power(&self, base: &Expr, exp: &Expr) -> Option<u32> {
        if !matches!(base, Expr::Add(..)) {
            return None;
        }
        match exp {
            Expr::Constant(e) if e.is_integer() && e.is_positive() => e
                .to_integer()
                .to_u32()
                .filter(|n| *n <= self.power_limit),
            _ => None,
        }
    }

    fn distribute(&self, a: &Expr, b: &Expr) -> Expr {
        let rhs = add_terms(b);
        add_terms(a)
            .iter()
            .flat_map(|ta| rhs.iter().map(move |tb| simplify_mul(ta.clone(), tb.clone())))
            .fold(Expr::integer(0), simplify_add)
    }
}

/// `(a*b)^e -> a^e * b^e`. A negative coefficient stays attached to the first
/// factor, so `(-2*x)^e` becomes `2^e * (-x)^e`.
pub fn expand_power_base(expr: &Expr) -> Expr {
    let rebuilt = match expr {
        Expr::Pow(base, exp) => {
            let base = expand_power_base(base);
            let exp = expand_power_base(exp);
            match base {
                Expr::Mul(..) | Expr::Neg(_) => split_power(&base, &exp),
                base => Expr::Pow(base.boxed(), exp.boxed()),
            }
        }
        Expr::Order(_) => expr.clone(),
        other => other.map_children(expand_power_base),
    };
    simplify(rebuilt)
}

fn split_power(base: &Expr, exp: &Expr) -> Expr {
    let (coeff, mut factors) = split_coeff(base);
    if coeff.is_negative() {
        match factors.first_mut() {
            Some(first) => *first = Expr::Neg(first.clone().boxed()),
            None => return Expr::Pow(base.clone().boxed(), exp.clone().boxed()),
        }
    }
    let magnitude = Expr::Constant(coeff.abs());
    std::iter::once(magnitude)
        .chain(factors)
        .map(|f| Expr::Pow(f.boxed(), exp.clone().boxed()))
        .fold(Expr::integer(1), |acc, f| Expr::Mul(acc.boxed(), f.boxed()))
}

/// `log(a*b) -> log(a) + log(b)` and `log(a^e) -> e*log(a)`, treating every
/// symbol as positive.
pub fn expand_log(expr: &Expr) -> Expr {
    let rebuilt = match expr {
        Expr::Log(arg) => split_log(&simplify(expand_log(arg))),
        Expr::Order(_) => expr.clone(),
        other => other.map_children(expand_log),
    };
    simplify(rebuilt)
}

fn split_log(arg: &Expr) -> Expr {
    match arg {
        Expr::Mul(..) | Expr::Neg(_) => {
            let (coeff, factors) = split_coeff(arg);
            if coeff.is_negative() {
                return simplify_log(arg.clone());
            }
            let logs = factors.iter().map(split_log);
            let constant = if coeff == Rational::from_integer(1.into()) {
                Expr::integer(0)
            } else {
                simplify_log(Expr::Constant(coeff))
            };
            logs.fold(constant, simplify_add)
        }
        Expr::Pow(base, exp) => simplify_mul((**exp).clone(), split_log(base)),
        other => simplify_log(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn parsed(input: &str) -> Expr {
        simplify(parse_expr(input).expect("parse input"))
    }

    #[test]
    fn expands_powers_of_sums() {
        let got = expand(&parse_expr("(x + 1)^2").unwrap());
        assert_eq!(got, parsed("x^2 + 2*x + 1"));
    }

    #[test]
    fn expands_nested_products() {
        let got = expand(&parse_expr("x*(x + y)*(1 + y)").unwrap());
        assert_eq!(got, parsed("x^2 + x*y + x^2*y + x*y^2"));
    }

    #[test]
    fn power_base_keeps_sign_with_first_factor() {
        let got = expand_power_base(&parse_expr("(-2*x)^(1/2)").unwrap());
        assert_eq!(got, parsed("2^(1/2)*(-x)^(1/2)"));
    }

    #[test]
    fn powers_above_the_limit_stay_unexpanded() {
        let got = expand_with_limit(&parse_expr("x*(x + y)^3").unwrap(), 2);
        assert_eq!(find_unexpanded_power(&got, &["x"]), Some(&parsed("(x + y)^3")));
        assert_eq!(find_unexpanded_power(&got, &["z"]), None);

        let full = expand_with_limit(&parse_expr("x*(x + y)^3").unwrap(), 3);
        assert_eq!(find_unexpanded_power(&full, &["x", "y"]), None);
    }

    #[test]
    fn log_of_products_and_powers() {
        let got = expand_log(&parse_expr("log(x^2*y)").unwrap());
        assert_eq!(got, parsed("2*log(x) + log(y)"));
    }
}
