use crate::expr::Expr;
use crate::order::Order;
use num_rational::BigRational;
use num_traits::Signed;

pub fn pretty(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Constant(r) => bracket_negative(ctx, r),
            Expr::Infinity => "oo".to_string(),
            Expr::NaN => "nan".to_string(),

            Expr::Add(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "-" } else { "+" });
                bracket(ctx, 1, body)
            }

            Expr::Sub(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "+" } else { "-" });
                bracket(ctx, 1, body)
            }

            Expr::Mul(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = if a_inner.is_one() {
                    pp(2, &b_inner)
                } else {
                    format!("{}*{}", pp(2, &a_inner), pp(2, &b_inner))
                };
                if na ^ nb {
                    bracket(ctx, 2, format!("-{body}"))
                } else {
                    bracket(ctx, 2, body)
                }
            }

            Expr::Div(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = format!("{}/{}", pp(2, &a_inner), pp(3, &b_inner));
                if na ^ nb {
                    bracket(ctx, 2, format!("-{body}"))
                } else {
                    bracket(ctx, 2, body)
                }
            }

            Expr::Pow(a, b) => bracket(ctx, 3, format!("{}^{}", pp(4, a), pp(4, b))),

            Expr::Neg(a) => {
                let (is_neg, inner) = split_neg(a);
                if is_neg {
                    pp(ctx, &inner)
                } else {
                    bracket(ctx, 2, format!("-{}", pp(3, &inner)))
                }
            }

            Expr::Sin(a) => format!("sin({})", pp(0, a)),
            Expr::Cos(a) => format!("cos({})", pp(0, a)),
            Expr::Tan(a) => format!("tan({})", pp(0, a)),
            Expr::Atan(a) => format!("arctan({})", pp(0, a)),
            Expr::Exp(a) => format!("exp({})", pp(0, a)),
            Expr::Log(a) => format!("log({})", pp(0, a)),
            Expr::Abs(a) => format!("abs({})", pp(0, a)),
            Expr::Conjugate(a) => format!("conjugate({})", pp(0, a)),
            Expr::Transpose(a) => format!("transpose({})", pp(0, a)),
            Expr::Order(order) => pretty_order(order),
        }
    }

    pp(0, expr)
}

/// `O(x)` when every point is zero and there is at most one variable,
/// `O(1, x, y)` for several variables at zero, and the explicit
/// `O(x^2, (x, oo))` form otherwise.
pub fn pretty_order(order: &Order) -> String {
    let inner = pretty(order.expr());
    let args = order.args();
    let all_zero = args.iter().all(|(_, point)| point.is_zero());

    if all_zero && args.len() <= 1 {
        return format!("O({inner})");
    }

    let rendered: Vec<String> = if all_zero {
        args.iter().map(|(var, _)| var.clone()).collect()
    } else {
        args.iter()
            .map(|(var, point)| format!("({var}, {point})"))
            .collect()
    };
    format!("O({inner}, {})", rendered.join(", "))
}

fn split_neg(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Neg(inner) => (true, *inner.clone()),
        Expr::Constant(r) if r.is_negative() => (true, Expr::Constant(-r)),
        Expr::Mul(a, b) => match &**a {
            Expr::Constant(r) if r.is_negative() => {
                (true, Expr::Mul(Expr::Constant(-r).boxed(), b.clone()))
            }
            _ => (false, expr.clone()),
        },
        other => (false, other.clone()),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn bracket_negative(ctx: u8, r: &BigRational) -> String {
    let shown = show_rational(r);
    let compound = r.is_negative() || !r.is_integer();
    if compound && ctx >= 3 {
        format!("({shown})")
    } else {
        shown
    }
}

fn show_rational(r: &BigRational) -> String {
    let n = r.numer().clone();
    let d = r.denom().clone();
    if d == 1.into() {
        format!("{n}")
    } else if n < 0.into() {
        format!("-{}/{}", -n, d)
    } else {
        format!("{}/{}", n, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use crate::simplify::simplify;

    fn show(input: &str) -> String {
        pretty(&simplify(parse_expr(input).expect("parse input")))
    }

    #[test]
    fn sums_print_with_signs() {
        assert_eq!(show("x - 2*y"), "x - 2*y");
        assert_eq!(show("x^2 - x"), "-x + x^2");
    }

    #[test]
    fn rational_exponents_are_bracketed() {
        assert_eq!(show("x^(1/2)"), "x^(1/2)");
        assert_eq!(show("x^(-1)"), "x^(-1)");
    }
}
