use bigo::{Expr, Order, OrderArgs, OrderContext, Point, parse_expr};

fn parsed(input: &str) -> Expr {
    parse_expr(input).expect("parse input")
}

fn build(ctx: &OrderContext, input: &str, args: OrderArgs) -> Expr {
    ctx.order(&parsed(input), args)
        .unwrap_or_else(|err| panic!("O({input}): {err}"))
}

fn term(expr: &Expr) -> &Order {
    expr.as_order().expect("order term")
}

#[test]
fn accessors() {
    let ctx = OrderContext::new();
    let built = build(&ctx, "x^2*y", OrderArgs::symbols(&["x", "y"]));
    let o = term(&built);
    assert_eq!(o.variables(), vec!["x", "y"]);
    assert_eq!(o.point(), Some(Point::Zero));
    assert_eq!(
        o.free_symbols().into_iter().collect::<Vec<_>>(),
        vec!["x".to_string(), "y".to_string()]
    );
    assert_eq!(o.remove_o(), Expr::integer(0));
    assert_eq!(o.get_o(), built);
}

#[test]
fn powers() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x", OrderArgs::Auto);
    let squared = ctx.pow(term(&x), &Expr::integer(2)).unwrap();
    assert_eq!(squared, Some(build(&ctx, "x^2", OrderArgs::Auto)));
    assert_eq!(ctx.pow(term(&x), &Expr::integer(-1)).unwrap(), None);
    assert_eq!(ctx.pow(term(&x), &Expr::var("n")).unwrap(), None);
}

#[test]
fn derivatives() {
    let ctx = OrderContext::new();
    let x2 = build(&ctx, "x^2", OrderArgs::Auto);
    assert_eq!(ctx.diff(term(&x2), "x").unwrap(), build(&ctx, "x", OrderArgs::Auto));

    let constant = build(&ctx, "1", OrderArgs::symbols(&["x"]));
    assert_eq!(ctx.diff(term(&constant), "x").unwrap(), constant);
    assert_eq!(ctx.diff(term(&x2), "y").unwrap(), x2);
}

#[test]
fn conjugate_and_transpose() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x^2", OrderArgs::Auto);
    assert_eq!(ctx.conjugate(term(&x)).unwrap(), Some(x.clone()));
    assert_eq!(ctx.transpose(term(&x)).unwrap(), Some(x.clone()));

    let log = build(&ctx, "log(x)", OrderArgs::Auto);
    assert_eq!(ctx.conjugate(term(&log)).unwrap(), None);
}

#[test]
fn renaming_a_variable() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x^2", OrderArgs::Auto);
    let renamed = ctx.subs(term(&x), "x", &Expr::var("t")).unwrap();
    assert_eq!(renamed, build(&ctx, "t^2", OrderArgs::Auto));
}

#[test]
fn reciprocal_substitution_moves_the_point() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x", OrderArgs::Auto);
    let moved = ctx.subs(term(&x), "x", &parsed("1/y")).unwrap();
    assert_eq!(moved, build(&ctx, "1/y", OrderArgs::at(&["y"], Point::Infinity)));

    let at_infinity = build(&ctx, "x", OrderArgs::at(&["x"], Point::Infinity));
    let back = ctx.subs(term(&at_infinity), "x", &parsed("1/y")).unwrap();
    assert_eq!(back, build(&ctx, "1/y", OrderArgs::symbols(&["y"])));
}

#[test]
fn scaling_substitution_keeps_the_point() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x", OrderArgs::Auto);
    let scaled = ctx.subs(term(&x), "x", &parsed("2*y")).unwrap();
    assert_eq!(scaled, build(&ctx, "y", OrderArgs::Auto));
}

#[test]
fn substituting_a_foreign_symbol_keeps_the_variables() {
    let ctx = OrderContext::new();
    let built = build(&ctx, "x*y", OrderArgs::symbols(&["x"]));
    let replaced = ctx.subs(term(&built), "y", &Expr::integer(3)).unwrap();
    assert_eq!(replaced, build(&ctx, "x", OrderArgs::Auto));
}

#[test]
fn merging_variable_sets() {
    let ctx = OrderContext::new();
    let x = build(&ctx, "x", OrderArgs::Auto);
    let y = build(&ctx, "y", OrderArgs::Auto);

    let (expr, symbols) = term(&y).as_expr_variables(Some(term(&x).args())).unwrap();
    assert_eq!(expr, Expr::var("y"));
    assert_eq!(
        symbols,
        vec![("x".to_string(), Point::Zero), ("y".to_string(), Point::Zero)]
    );

    let far = build(&ctx, "y", OrderArgs::at(&["y"], Point::Infinity));
    assert!(term(&far).as_expr_variables(Some(term(&x).args())).is_err());
}
