use crate::expr::{Expr, zero};
use crate::simplify::rules::{
    simplify, simplify_add, simplify_exp, simplify_fully, simplify_mul, split_coeff,
};

const NORMALIZE_SIZE_LIMIT: usize = 160;

/// Power combination: equal bases merge (through `simplify`) and every
/// exponential factor of a product folds into one, `exp(a)*exp(b) = exp(a + b)`.
pub fn normalize(expr: Expr) -> Expr {
    normalize_with_limit(expr, NORMALIZE_SIZE_LIMIT)
}

pub fn normalize_with_limit(expr: Expr, size_limit: usize) -> Expr {
    let simplified = simplify_fully(expr);
    normalize_once(simplified, size_limit)
}

fn normalize_once(expr: Expr, size_limit: usize) -> Expr {
    if expr_size(&expr) > size_limit {
        return expr;
    }

    match expr {
        Expr::Mul(..) | Expr::Neg(_) => normalize_product(&expr, size_limit),
        Expr::Order(_) => expr,
        other => simplify(other.map_children(|child| normalize_once(child.clone(), size_limit))),
    }
}

fn normalize_product(expr: &Expr, size_limit: usize) -> Expr {
    let (coeff, factors) = split_coeff(expr);
    let mut exponent = zero();
    let mut rest = Vec::new();

    for factor in factors {
        match normalize_once(factor, size_limit) {
            Expr::Exp(arg) => exponent = simplify_add(exponent, *arg),
            other => rest.push(other),
        }
    }

    rest.into_iter()
        .chain(std::iter::once(simplify_exp(exponent)))
        .fold(Expr::Constant(coeff), simplify_mul)
}

fn expr_size(expr: &Expr) -> usize {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) | Expr::Infinity | Expr::NaN => 1,
        Expr::Order(order) => 1 + expr_size(order.expr()),
        other => 1 + other.children().into_iter().map(expr_size).sum::<usize>(),
    }
}
