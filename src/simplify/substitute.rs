use crate::expr::Expr;

/// Substitute variable `var` with `replacement` throughout `expr`.
///
/// Order terms are left as they are; substituting into them has to rebuild
/// the term, which `OrderContext::subs` does.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        Expr::Order(_) => expr.clone(),
        other => other.map_children(|child| substitute(child, var, replacement)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    #[test]
    fn replaces_every_occurrence() {
        let expr = parse_expr("x^2 + sin(x*y)").unwrap();
        let replaced = substitute(&expr, "x", &Expr::var("t"));
        assert_eq!(replaced, parse_expr("t^2 + sin(t*y)").unwrap());
    }
}
