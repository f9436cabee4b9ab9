use std::collections::{BTreeMap, HashMap};

use crate::expr::{Expr, Rational, one, zero};
use crate::simplify::conjugate::{conjugate, transpose};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;
const ROOT_DEGREE_LIMIT: u32 = 64;

#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct CanonKey(Vec<Expr>);

pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),

        Expr::Sin(a) => simplify_sin(simplify_cached(*a, cache)),
        Expr::Cos(a) => simplify_cos(simplify_cached(*a, cache)),
        Expr::Tan(a) => simplify_tan(simplify_cached(*a, cache)),
        Expr::Atan(a) => simplify_atan(simplify_cached(*a, cache)),
        Expr::Exp(a) => simplify_exp(simplify_cached(*a, cache)),
        Expr::Log(a) => simplify_log(simplify_cached(*a, cache)),
        Expr::Abs(a) => simplify_abs(simplify_cached(*a, cache)),

        Expr::Conjugate(a) => {
            let inner = simplify_cached(*a, cache);
            match conjugate(&inner) {
                Some(value) => simplify_cached(value, cache),
                None => Expr::Conjugate(inner.boxed()),
            }
        }
        Expr::Transpose(a) => {
            let inner = simplify_cached(*a, cache);
            match transpose(&inner) {
                Some(value) => simplify_cached(value, cache),
                None => Expr::Transpose(inner.boxed()),
            }
        }

        e => e,
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, 64)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_cached(current.clone(), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    sum_of(flatten_sum(&x).into_iter().chain(flatten_sum(&y)).collect())
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

/// Summands of `expr`, with subtraction and negation pushed into the terms.
pub fn add_terms(expr: &Expr) -> Vec<Expr> {
    flatten_sum(expr)
}

/// Factors of `expr`, with a rational coefficient other than one listed first.
pub fn mul_factors(expr: &Expr) -> Vec<Expr> {
    let (coeff, mut factors) = split_coeff(expr);
    if !coeff.is_one() {
        factors.insert(0, Expr::Constant(coeff));
    }
    factors
}

/// Splits a product into its rational coefficient and its sorted non-constant factors.
pub fn split_coeff(expr: &Expr) -> (Rational, Vec<Expr>) {
    let mut coeff = Rational::one();
    let mut factors = Vec::new();
    collect_factors(expr, &mut coeff, &mut factors);
    factors.sort();
    (coeff, factors)
}

fn collect_factors(expr: &Expr, coeff: &mut Rational, out: &mut Vec<Expr>) {
    match expr {
        Expr::Constant(c) => *coeff *= c,
        Expr::Neg(e) => {
            *coeff = -coeff.clone();
            collect_factors(e, coeff, out);
        }
        Expr::Mul(a, b) => {
            collect_factors(a, coeff, out);
            collect_factors(b, coeff, out);
        }
        other => out.push(other.clone()),
    }
}

fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(simplify_neg));
            out
        }
        Expr::Neg(a) if matches!(**a, Expr::Add(..) | Expr::Sub(..)) => {
            flatten_sum(a).into_iter().map(simplify_neg).collect()
        }
        other => vec![other.clone()],
    }
}

fn count_sum_terms(expr: &Expr) -> usize {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) => count_sum_terms(a) + count_sum_terms(b),
        Expr::Neg(inner) => count_sum_terms(inner),
        _ => 1,
    }
}

fn mul_from_sorted_factors(factors: &[Expr]) -> Expr {
    let mut iter = factors.iter().cloned();
    match iter.next() {
        Some(first) => iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed())),
        None => one(),
    }
}

fn collect_sum<I>(terms: I) -> BTreeMap<CanonKey, Rational>
where
    I: IntoIterator<Item = Expr>,
{
    let mut map = BTreeMap::new();
    for term in terms {
        let (c, factors) = split_coeff(&term);
        if c.is_zero() {
            continue;
        }
        map.entry(CanonKey(factors))
            .and_modify(|acc| *acc += &c)
            .or_insert(c);
    }
    map
}

fn sum_of(terms: Vec<Expr>) -> Expr {
    if terms.iter().any(Expr::is_nan) {
        return Expr::NaN;
    }

    // Order summands are opaque: equal ones collapse, nothing else merges into them.
    let (mut orders, regular): (Vec<Expr>, Vec<Expr>) =
        terms.into_iter().partition(Expr::contains_order);
    orders.sort();
    orders.dedup();

    let mut map = collect_sum(regular);
    let const_term = map
        .remove(&CanonKey(Vec::new()))
        .unwrap_or_else(Rational::zero);

    let mut items: Vec<Expr> = map
        .into_iter()
        .filter(|(_, coef)| !coef.is_zero())
        .map(|(CanonKey(factors), coef)| term_from(&coef, mul_from_sorted_factors(&factors)))
        .collect();

    if !const_term.is_zero() {
        items.push(Expr::Constant(const_term));
    }
    items.extend(orders);

    mk_add_list(items)
}

fn term_from(coef: &Rational, base: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }

    if base.is_one() {
        return Expr::Constant(coef.clone());
    }

    if coef.is_one() {
        return base;
    }

    if coef == &-Rational::one() {
        return Expr::Neg(base.boxed());
    }

    Expr::Mul(Expr::Constant(coef.clone()).boxed(), base.boxed())
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    product_of(vec![x, y])
}

fn product_of(items: Vec<Expr>) -> Expr {
    let mut coeff = Rational::one();
    let mut bases: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
    let mut opaque: Vec<Expr> = Vec::new();
    let mut pending = items;

    while let Some(item) = pending.pop() {
        match item {
            Expr::NaN => return Expr::NaN,
            Expr::Constant(c) => coeff *= c,
            Expr::Neg(inner) => {
                coeff = -coeff;
                pending.push(*inner);
            }
            Expr::Mul(a, b) => {
                pending.push(*a);
                pending.push(*b);
            }
            Expr::Div(a, b) => {
                pending.push(*a);
                pending.push(simplify_pow(*b, Expr::integer(-1)));
            }
            order @ Expr::Order(_) => opaque.push(order),
            Expr::Pow(base, exp) => bases.entry(*base).or_default().push(*exp),
            other => bases.entry(other).or_default().push(one()),
        }
    }

    if coeff.is_zero() {
        return zero();
    }

    let mut factors = Vec::new();
    let mut reflatten = false;
    for (base, exps) in bases {
        let exp = exps.into_iter().reduce(simplify_add).unwrap_or_else(one);
        match simplify_pow(base, exp) {
            Expr::Constant(c) => coeff *= c,
            Expr::NaN => return Expr::NaN,
            powered @ (Expr::Mul(..) | Expr::Neg(..)) => {
                reflatten = true;
                factors.push(powered);
            }
            powered => factors.push(powered),
        }
    }

    if coeff.is_zero() {
        return zero();
    }

    factors.extend(opaque);

    if reflatten {
        factors.push(Expr::Constant(coeff));
        return product_of(factors);
    }

    if let Some(pos) = factors.iter().position(|f| matches!(f, Expr::Add(..))) {
        let sum = factors.remove(pos);
        factors.sort();
        let rest = term_from(&coeff, mul_from_sorted_factors(&factors));
        if count_sum_terms(&sum) * count_sum_terms(&rest) <= DISTRIBUTE_TERM_LIMIT {
            return sum_of(
                flatten_sum(&sum)
                    .into_iter()
                    .map(|term| simplify_mul(term, rest.clone()))
                    .collect(),
            );
        }
        factors.push(sum);
    }

    factors.sort();
    term_from(&coeff, mul_from_sorted_factors(&factors))
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    simplify_mul(x, simplify_pow(y, Expr::integer(-1)))
}

pub fn simplify_pow(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::NaN, _) | (_, Expr::NaN) => Expr::NaN,
        (_, Expr::Constant(e)) if e.is_zero() => one(),
        (base, Expr::Constant(e)) if e.is_one() => base,
        (base, _) if base.is_one() => one(),
        (Expr::Constant(b), Expr::Constant(e)) => constant_power(b, e),
        (Expr::Infinity, Expr::Constant(e)) if e.is_positive() => Expr::Infinity,
        (Expr::Infinity, Expr::Constant(_)) => zero(),
        (Expr::Pow(base, inner), Expr::Constant(e)) if e.is_integer() => {
            simplify_pow(*base, simplify_mul(*inner, Expr::Constant(e)))
        }
        (Expr::Exp(arg), e @ Expr::Constant(_)) => simplify_exp(simplify_mul(*arg, e)),
        (Expr::Mul(a, b), Expr::Constant(e)) if e.is_integer() => product_of(
            mul_factors(&Expr::Mul(a, b))
                .into_iter()
                .map(|f| simplify_pow(f, Expr::Constant(e.clone())))
                .collect(),
        ),
        (Expr::Neg(a), Expr::Constant(e)) if e.is_integer() => {
            let powered = simplify_pow(*a, Expr::Constant(e.clone()));
            if e.to_integer().is_even() {
                powered
            } else {
                simplify_neg(powered)
            }
        }
        (x, y) => Expr::Pow(x.boxed(), y.boxed()),
    }
}

fn constant_power(b: Rational, e: Rational) -> Expr {
    if b.is_zero() {
        return if e.is_positive() {
            zero()
        } else {
            Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed())
        };
    }

    if e.is_integer() {
        let k: BigInt = e.to_integer();
        if let Some(power) = k.abs().to_u32() {
            let (num, den) = if k >= BigInt::zero() {
                (b.numer().pow(power), b.denom().pow(power))
            } else {
                (b.denom().pow(power), b.numer().pow(power))
            };
            return Expr::Constant(Rational::new(num, den));
        }
    } else if b.is_positive() {
        if let Some(root) = exact_root(&b, e.denom()) {
            return constant_power(root, Rational::from_integer(e.numer().clone()));
        }
    }

    Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed())
}

fn exact_root(b: &Rational, degree: &BigInt) -> Option<Rational> {
    let n = degree.to_u32().filter(|n| *n <= ROOT_DEGREE_LIMIT)?;
    let num = b.numer().nth_root(n);
    let den = b.denom().nth_root(n);
    if num.pow(n) == *b.numer() && den.pow(n) == *b.denom() {
        Some(Rational::new(num, den))
    } else {
        None
    }
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(x) => Expr::Constant(-x),
        Expr::Neg(x) => *x,
        Expr::NaN => Expr::NaN,
        sum @ (Expr::Add(..) | Expr::Sub(..)) => {
            sum_of(flatten_sum(&sum).into_iter().map(simplify_neg).collect())
        }
        other => {
            let (c, factors) = split_coeff(&other);
            term_from(&-c, mul_from_sorted_factors(&factors))
        }
    }
}

/// The negation of `expr` when its leading coefficient is negative.
fn strip_negative(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Constant(c) if c.is_negative() => Some(Expr::Constant(-c)),
        Expr::Neg(inner) => Some(*inner.clone()),
        Expr::Mul(a, _) if matches!(&**a, Expr::Constant(c) if c.is_negative()) => {
            Some(simplify_neg(expr.clone()))
        }
        _ => None,
    }
}

pub fn simplify_sin(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_zero() => zero(),
        x => match strip_negative(&x) {
            Some(positive) => simplify_neg(Expr::Sin(positive.boxed())),
            None => Expr::Sin(x.boxed()),
        },
    }
}

pub fn simplify_cos(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_zero() => one(),
        x => match strip_negative(&x) {
            Some(positive) => Expr::Cos(positive.boxed()),
            None => Expr::Cos(x.boxed()),
        },
    }
}

pub fn simplify_tan(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_zero() => zero(),
        x => match strip_negative(&x) {
            Some(positive) => simplify_neg(Expr::Tan(positive.boxed())),
            None => Expr::Tan(x.boxed()),
        },
    }
}

pub fn simplify_atan(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_zero() => zero(),
        x => match strip_negative(&x) {
            Some(positive) => simplify_neg(Expr::Atan(positive.boxed())),
            None => Expr::Atan(x.boxed()),
        },
    }
}

pub fn simplify_exp(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_zero() => one(),
        Expr::Log(inner) => *inner,
        x => Expr::Exp(x.boxed()),
    }
}

pub fn simplify_log(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        x if x.is_one() => zero(),
        Expr::Exp(inner) => *inner,
        x => Expr::Log(x.boxed()),
    }
}

pub fn simplify_abs(x: Expr) -> Expr {
    match x {
        Expr::NaN => Expr::NaN,
        Expr::Constant(c) => Expr::Constant(c.abs()),
        abs @ Expr::Abs(_) => abs,
        exp @ Expr::Exp(_) => exp,
        x => match strip_negative(&x) {
            Some(positive) => simplify_abs(positive),
            None => Expr::Abs(x.boxed()),
        },
    }
}

fn mk_add_list(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed())),
        None => zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn simp(input: &str) -> Expr {
        simplify(parse_expr(input).expect("parse input"))
    }

    #[test]
    fn like_terms_collect() {
        assert_eq!(simp("x + x"), simp("2*x"));
        assert_eq!(simp("x - x"), zero());
        assert_eq!(simp("x*y - y*x"), zero());
    }

    #[test]
    fn powers_of_equal_bases_merge() {
        assert_eq!(simp("x*x^2"), simp("x^3"));
        assert_eq!(simp("x^a*x"), simp("x^(a + 1)"));
        assert_eq!(simp("x/x"), one());
    }

    #[test]
    fn exact_rational_roots() {
        assert_eq!(simp("4^(1/2)"), Expr::integer(2));
        assert_eq!(simp("(8/27)^(2/3)"), Expr::constant(4, 9));
        assert!(matches!(simp("2^(1/2)"), Expr::Pow(_, _)));
    }

    #[test]
    fn nan_absorbs() {
        assert_eq!(simp("x + nan"), Expr::NaN);
        assert_eq!(simp("x*nan"), Expr::NaN);
    }

    #[test]
    fn odd_functions_pull_out_signs() {
        assert_eq!(simp("sin(-x)"), simp("-sin(x)"));
        assert_eq!(simp("cos(-2*x)"), simp("cos(2*x)"));
    }
}
