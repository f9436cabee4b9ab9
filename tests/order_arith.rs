use bigo::{
    CasError, Expr, OrderArgs, OrderConfig, OrderContext, Point, get_o, parse_expr, remove_o,
    simplify,
};
use proptest::prelude::*;

fn parsed(input: &str) -> Expr {
    parse_expr(input).expect("parse input")
}

fn o(ctx: &OrderContext, input: &str) -> Expr {
    ctx.order(&parsed(input), OrderArgs::Auto)
        .unwrap_or_else(|err| panic!("O({input}): {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn order_terms_absorb_smaller_summands() {
    init_tracing();
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");

    assert_eq!(ctx.add(&parsed("x"), &x).unwrap(), x);
    assert_eq!(ctx.add(&x, &x).unwrap(), x);
    assert_eq!(ctx.add(&x, &o(&ctx, "x^2")).unwrap(), x);
    assert_eq!(ctx.add(&parsed("x^3"), &x).unwrap(), x);

    let one = o(&ctx, "1");
    assert_eq!(ctx.add(&parsed("1"), &one).unwrap(), one);
}

#[test]
fn larger_summands_survive() {
    let ctx = OrderContext::new();
    let x2 = o(&ctx, "x^2");
    let sum = ctx.add(&parsed("x"), &x2).unwrap();
    assert_eq!(remove_o(&sum), parsed("x"));
    assert_eq!(get_o(&sum), Some(x2));
}

#[test]
fn products_fold_into_the_order_term() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");

    assert_eq!(ctx.mul(&x, &parsed("x")).unwrap(), o(&ctx, "x^2"));
    assert_eq!(ctx.mul(&parsed("5"), &x).unwrap(), x);
    assert_eq!(ctx.mul(&x, &o(&ctx, "x")).unwrap(), o(&ctx, "x^2"));

    let xy = ctx.mul(&x, &o(&ctx, "y")).unwrap();
    assert_eq!(
        xy,
        ctx.order(&parsed("x*y"), OrderArgs::symbols(&["x", "y"])).unwrap()
    );
}

#[test]
fn products_at_different_points_fail() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    let far = ctx
        .order(&parsed("y"), OrderArgs::at(&["y"], Point::Infinity))
        .unwrap();
    assert!(matches!(ctx.mul(&x, &far), Err(CasError::MixedPoints(_))));
}

#[test]
fn sums_with_order_terms_distribute() {
    let ctx = OrderContext::new();
    let series = ctx.add(&parsed("1"), &o(&ctx, "x")).unwrap();
    let scaled = ctx.mul(&parsed("x"), &series).unwrap();
    let expected = ctx.add(&parsed("x"), &o(&ctx, "x^2")).unwrap();
    assert_eq!(scaled, expected);
}

#[test]
fn series_arithmetic() {
    let ctx = OrderContext::new();
    let sine = ctx.add(&parsed("x - x^3/6"), &o(&ctx, "x^5")).unwrap();

    let squared = ctx.mul(&sine, &sine).unwrap();
    let expected = ctx.add(&parsed("x^2 - x^4/3"), &o(&ctx, "x^6")).unwrap();
    assert_eq!(squared, expected);

    let derivative = ctx.diff_expr(&sine, "x").unwrap();
    let expected = ctx.add(&parsed("1 - x^2/2"), &o(&ctx, "x^4")).unwrap();
    assert_eq!(derivative, expected);
}

#[test]
fn order_aware_simplify() {
    let ctx = OrderContext::new();
    let x2 = o(&ctx, "x^2");
    let raw = Expr::Add(
        Expr::Add(parsed("x").boxed(), parsed("x^3").boxed()).boxed(),
        Expr::Mul(parsed("3").boxed(), x2.clone().boxed()).boxed(),
    );
    let expected = ctx.add(&parsed("x"), &x2).unwrap();
    assert_eq!(ctx.simplify(&raw).unwrap(), expected);

    let squared = Expr::Pow(o(&ctx, "x").boxed(), Expr::integer(2).boxed());
    assert_eq!(ctx.simplify(&squared).unwrap(), x2);
}

#[test]
fn substitution_through_a_series() {
    let ctx = OrderContext::new();
    let series = ctx.add(&parsed("1 + x"), &o(&ctx, "x^2")).unwrap();
    let replaced = ctx.subs_expr(&series, "x", &parsed("2*t")).unwrap();
    let expected = ctx.add(&parsed("1 + 2*t"), &o(&ctx, "t^2")).unwrap();
    assert_eq!(replaced, expected);
}

#[test]
fn uncached_context_agrees() {
    let cached = OrderContext::new();
    let uncached = OrderContext::with_config(OrderConfig {
        cache_capacity: Some(0),
        ..OrderConfig::default()
    });
    for input in ["x + x^2", "sin(x)*y", "1 + x*y", "x^3 - x"] {
        assert_eq!(o(&cached, input), o(&uncached, input), "O({input})");
    }
    assert!(uncached.cache().is_empty());
}

proptest! {
    #[test]
    fn lowest_power_dominates(a in 1i64..6, b in 1i64..6, c in 1i64..9) {
        let ctx = OrderContext::new();
        let sum = format!("{c}*x^{a} + x^{b}");
        let low = a.min(b);
        let got = o(&ctx, &sum);
        prop_assert_eq!(got, o(&ctx, &format!("x^{low}")));
    }

    #[test]
    fn scaling_never_changes_the_order(c in 1i64..50, p in 0i64..6) {
        let ctx = OrderContext::new();
        let scaled = ctx.order(&parsed(&format!("{c}*x^{p}")), OrderArgs::symbols(&["x"])).unwrap();
        let plain = ctx.order(&parsed(&format!("x^{p}")), OrderArgs::symbols(&["x"])).unwrap();
        prop_assert_eq!(scaled, plain);
    }

    #[test]
    fn smaller_powers_are_members(a in 1i64..6, b in 1i64..6) {
        let ctx = OrderContext::new();
        let big = o(&ctx, &format!("x^{a}"));
        let small = simplify(parsed(&format!("x^{b}")));
        let member = ctx.is_member(big.as_order().unwrap(), &small).unwrap();
        prop_assert_eq!(member, b >= a);
    }
}
