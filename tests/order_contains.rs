use bigo::{CasError, Containment, Expr, Order, OrderArgs, OrderContext, Point, parse_expr, simplify};

fn parsed(input: &str) -> Expr {
    parse_expr(input).expect("parse input")
}

fn order_term(ctx: &OrderContext, input: &str, args: OrderArgs) -> Order {
    let built = ctx
        .order(&parsed(input), args)
        .unwrap_or_else(|err| panic!("O({input}): {err}"));
    built.as_order().cloned().expect("order term")
}

fn o(ctx: &OrderContext, input: &str) -> Order {
    order_term(ctx, input, OrderArgs::Auto)
}

fn o_in(ctx: &OrderContext, input: &str, vars: &[&str]) -> Order {
    order_term(ctx, input, OrderArgs::symbols(vars))
}

#[test]
fn constants_and_variable_sets() {
    let ctx = OrderContext::new();
    let one = o(&ctx, "1");
    let one_x = o_in(&ctx, "1", &["x"]);

    assert!(ctx.is_member(&one_x, &one.to_expr()).unwrap());
    assert!(!ctx.is_member(&one, &one_x.to_expr()).unwrap());
    assert!(ctx.is_member(&one_x, &o(&ctx, "x").to_expr()).unwrap());
}

#[test]
fn terms_without_variables_take_the_other_point() {
    let ctx = OrderContext::new();
    let one = o(&ctx, "1");
    let x_oo = order_term(&ctx, "x", OrderArgs::at(&["x"], Point::Infinity));

    assert_eq!(
        ctx.contains(&one, &x_oo.to_expr()).unwrap(),
        Containment::DoesNotDominate
    );
    assert_eq!(ctx.contains(&x_oo, &one.to_expr()).unwrap(), Containment::Dominates);

    let x = o(&ctx, "x");
    assert_eq!(ctx.contains(&one, &x.to_expr()).unwrap(), Containment::Dominates);
}

#[test]
fn lower_powers_dominate_at_zero() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    let x2 = o(&ctx, "x^2");

    assert_eq!(ctx.contains(&x, &x2.to_expr()).unwrap(), Containment::Dominates);
    assert_eq!(ctx.contains(&x2, &x.to_expr()).unwrap(), Containment::DoesNotDominate);
    assert_eq!(ctx.contains(&x, &parsed("x^3 + 5*x^2")).unwrap(), Containment::Dominates);
    assert_eq!(ctx.contains(&x, &parsed("x*log(x)")).unwrap(), Containment::DoesNotDominate);
}

#[test]
fn higher_powers_dominate_at_infinity() {
    let ctx = OrderContext::new();
    let at = |input: &str| order_term(&ctx, input, OrderArgs::at(&["x"], Point::Infinity));
    let x = at("x");
    let x2 = at("x^2");

    assert_eq!(ctx.contains(&x2, &x.to_expr()).unwrap(), Containment::Dominates);
    assert_eq!(ctx.contains(&x, &x2.to_expr()).unwrap(), Containment::DoesNotDominate);
    assert_eq!(ctx.contains(&x, &parsed("log(x)")).unwrap(), Containment::Dominates);
}

#[test]
fn trivial_members() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    assert_eq!(ctx.contains(&x, &parsed("0")).unwrap(), Containment::Dominates);
    assert_eq!(ctx.contains(&x, &Expr::NaN).unwrap(), Containment::DoesNotDominate);
    assert_eq!(ctx.contains(&x, &parsed("3*x")).unwrap(), Containment::Dominates);
}

#[test]
fn sums_on_either_side() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    let mixed = o_in(&ctx, "x + y", &["x", "y"]);

    assert_eq!(mixed.expr(), &simplify(parsed("x + y")));
    assert_eq!(
        ctx.contains(&mixed, &o_in(&ctx, "x^2", &["x", "y"]).to_expr()).unwrap(),
        Containment::Dominates
    );
    assert_eq!(
        ctx.contains(&x, &mixed.to_expr()).unwrap(),
        Containment::DoesNotDominate
    );
}

#[test]
fn disjoint_variables_are_unknown() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    let y = o(&ctx, "y");

    assert_eq!(ctx.contains(&x, &y.to_expr()).unwrap(), Containment::Unknown);
    let err = ctx.is_member(&x, &y.to_expr()).unwrap_err();
    assert!(matches!(err, CasError::IndeterminateMembership(_)));
}

#[test]
fn mixed_points_are_rejected() {
    let ctx = OrderContext::new();
    let at_zero = o(&ctx, "x");
    let at_infinity = order_term(&ctx, "x", OrderArgs::at(&["x"], Point::Infinity));

    let err = ctx.contains(&at_zero, &at_infinity.to_expr()).unwrap_err();
    assert!(matches!(err, CasError::MixedPoints(_)));
}

#[test]
fn poles_leave_an_axis_undecided() {
    let ctx = OrderContext::new();
    let x = o(&ctx, "x");
    let verdict = ctx.contains(&x, &parsed("x*tan(1/x)")).unwrap();
    assert_eq!(verdict, Containment::Unknown);
}
