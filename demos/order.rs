use bigo::prelude::ord;
use bigo::{OrderArgs, OrderContext, parse_expr};

fn main() {
    for input in ["x + x^2", "3*x^2 + x^5", "1 + x*y"] {
        match ord(input, &[]) {
            Ok(result) => println!("O({input}) => {result}"),
            Err(err) => eprintln!("O({input}) failed: {err}"),
        }
    }

    let ctx = OrderContext::new();
    let series = parse_expr("x - x^3/6")
        .and_then(|sine| {
            let tail = ctx.order(&parse_expr("x^5")?, OrderArgs::symbols(&["x"]))?;
            ctx.add(&sine, &tail)
        })
        .and_then(|sine| ctx.mul(&sine, &sine));
    match series {
        Ok(squared) => println!("(x - x^3/6 + O(x^5))^2 => {squared}"),
        Err(err) => eprintln!("series product failed: {err}"),
    }
}
