use bigo::calculus::{LimitError, LimitResult, Point, leading_term, limit};
use bigo::{Expr, parse_expr, simplify};

fn lim(input: &str, point: Point) -> LimitResult {
    let expr = parse_expr(input).expect("parse input");
    limit(&expr, "x", point).unwrap_or_else(|err| panic!("limit of {input}: {err}"))
}

fn finite(value: i64) -> LimitResult {
    LimitResult::Finite(Expr::integer(value))
}

#[test]
fn powers_at_both_ends() {
    assert_eq!(lim("1/x", Point::Infinity), finite(0));
    assert_eq!(lim("1/x", Point::Zero), LimitResult::PosInfinity);
    assert_eq!(lim("x^2 - x", Point::Infinity), LimitResult::PosInfinity);
    assert_eq!(lim("-3*x^3 + x", Point::Infinity), LimitResult::NegInfinity);
    assert_eq!(lim("(2*x^2 + 1)/x^2", Point::Infinity), finite(2));
}

#[test]
fn exponentials_beat_powers() {
    assert_eq!(lim("x*exp(-x)", Point::Infinity), finite(0));
    assert_eq!(lim("exp(x)/x^5", Point::Infinity), LimitResult::PosInfinity);
    assert_eq!(lim("exp(-x)", Point::Infinity), finite(0));
}

#[test]
fn logarithms_lose_to_powers() {
    assert_eq!(lim("log(x)/x", Point::Infinity), finite(0));
    assert_eq!(lim("x*log(x)", Point::Zero), finite(0));
    assert_eq!(lim("log(x)", Point::Infinity), LimitResult::PosInfinity);
}

#[test]
fn bounded_functions() {
    assert_eq!(lim("sin(x)/x", Point::Zero), finite(1));
    assert_eq!(lim("sin(x)", Point::Infinity), LimitResult::DoesNotExist);
    assert_eq!(lim("x*sin(x)", Point::Infinity), LimitResult::Unbounded);
    assert_eq!(lim("sin(x)/x", Point::Infinity), finite(0));
}

#[test]
fn other_variables_are_constants() {
    let expr = parse_expr("y/x").unwrap();
    assert_eq!(limit(&expr, "x", Point::Infinity).unwrap(), finite(0));
    assert_eq!(limit(&expr, "y", Point::Zero).unwrap(), finite(0));
}

#[test]
fn tangent_poles_are_reported() {
    let err = limit(&parse_expr("tan(x)").unwrap(), "x", Point::Infinity).unwrap_err();
    assert!(matches!(err, LimitError::Pole(_)));
}

#[test]
fn leading_terms_at_zero() {
    let lead = |input: &str, vars: &[&str]| {
        leading_term(&parse_expr(input).unwrap(), vars, 64).expect("leading term")
    };
    let parsed = |input: &str| simplify(parse_expr(input).unwrap());

    assert_eq!(lead("x + x^2", &["x"]), parsed("x"));
    assert_eq!(lead("3 + x", &["x"]), parsed("3"));
    assert_eq!(lead("x^2*y + y", &["x"]), parsed("y"));
    assert_eq!(lead("sin(2*x)", &["x"]), parsed("2*x"));
}

#[test]
fn leading_term_rejects_oscillation() {
    let err = leading_term(&parse_expr("sin(1/x)").unwrap(), &["x"], 64).unwrap_err();
    assert!(matches!(err, LimitError::Unsupported(_)));
}
