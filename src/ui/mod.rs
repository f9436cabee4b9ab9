//! String-based helpers for quick usage and rendering.

use std::sync::OnceLock;

use crate::calculus::{LimitResult, Point, differentiate as differentiate_expr, limit_with_depth};
use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::format::{pretty, pretty_limit_result};
use crate::order::{OrderArgs, OrderContext};
use crate::parser::parse_expr;
use crate::simplify::{normalize as normalize_expr, simplify_fully};

fn context() -> &'static OrderContext {
    static CONTEXT: OnceLock<OrderContext> = OnceLock::new();
    CONTEXT.get_or_init(OrderContext::new)
}

fn parse_point(input: &str) -> Result<Point> {
    Point::from_expr(&parse_expr(input)?)
        .ok_or_else(|| CasError::UnsupportedPoint(input.to_string()))
}

pub fn parse(input: &str) -> Result<Expr> {
    parse_expr(input)
}

pub fn differentiate(input: &str, var: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(differentiate_expr(var, &expr)))
}

pub fn diff(input: &str, var: &str) -> Result<String> {
    Ok(pretty(&differentiate(input, var)?))
}

pub fn simplify(input: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(expr))
}

pub fn simp(input: &str) -> Result<String> {
    Ok(pretty(&simplify(input)?))
}

pub fn normalize(input: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(normalize_expr(expr))
}

pub fn norm(input: &str) -> Result<String> {
    Ok(pretty(&normalize(input)?))
}

/// `lim input` as `var` tends to `point`, which must read `0` or `oo`.
pub fn limit(input: &str, var: &str, point: &str) -> Result<LimitResult> {
    let expr = parse_expr(input)?;
    let depth = context().config().limit_depth;
    Ok(limit_with_depth(&expr, var, parse_point(point)?, depth)?)
}

pub fn lim(input: &str, var: &str, point: &str) -> Result<String> {
    Ok(pretty_limit_result(&limit(input, var, point)?))
}

/// `O(input)` over `vars` at zero; an empty `vars` takes every free symbol.
pub fn order(input: &str, vars: &[&str]) -> Result<Expr> {
    let expr = parse_expr(input)?;
    let args = if vars.is_empty() {
        OrderArgs::Auto
    } else {
        OrderArgs::symbols(vars)
    };
    context().order(&expr, args)
}

/// `O(input)` with every variable in `vars` at `point`.
pub fn order_at(input: &str, vars: &[&str], point: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    context().order(&expr, OrderArgs::at(vars, parse_point(point)?))
}

pub fn ord(input: &str, vars: &[&str]) -> Result<String> {
    Ok(pretty(&order(input, vars)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_helpers_render() {
        assert_eq!(diff("x^2", "x").unwrap(), "2*x");
        assert_eq!(ord("x + x^2", &["x"]).unwrap(), "O(x)");
        assert_eq!(lim("1/x", "x", "oo").unwrap(), "0");
    }

    #[test]
    fn limits_at_both_points() {
        assert_eq!(lim("x/(1 + x)", "x", "oo").unwrap(), "1");
        assert_eq!(lim("x^2/2", "x", "0").unwrap(), "0");
        assert!(matches!(limit("x", "x", "oo").unwrap(), LimitResult::PosInfinity));
    }

    #[test]
    fn points_must_be_zero_or_infinity() {
        assert!(matches!(
            order_at("x", &["x"], "1"),
            Err(CasError::UnsupportedPoint(_))
        ));
    }
}
