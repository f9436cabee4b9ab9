use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric0, char, digit1, multispace0, satisfy};
use nom::combinator::{all_consuming, map, map_res, not, opt, peek, recognize};
use nom::error::VerboseError;
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, terminated};
use num_bigint::BigInt;
use num_traits::Num;

pub fn parse_expr(input: &str) -> Result<Expr> {
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(e) => Err(CasError::Parse(format!("{e:?}"))),
    }
}

fn parse_add_sub(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| {
            if op == '+' {
                Expr::Add(acc.boxed(), rhs.boxed())
            } else {
                Expr::Sub(acc.boxed(), rhs.boxed())
            }
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, init) = parse_pow(input)?;
    fold_many0(
        pair(ws(alt((char('*'), char('/')))), parse_pow),
        move || init.clone(),
        |acc, (op, rhs)| {
            if op == '*' {
                Expr::Mul(acc.boxed(), rhs.boxed())
            } else {
                Expr::Div(acc.boxed(), rhs.boxed())
            }
        },
    )(rest)
}

fn parse_pow(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, base) = parse_unary(input)?;
    if let Ok((next, exp)) = preceded(ws(char('^')), parse_pow)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else {
        parse_primary(input)
    }
}

fn parse_primary(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    alt((
        parse_parens,
        parse_function,
        parse_number,
        parse_identifier,
    ))(input)
}

fn parse_parens(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map(parse_int, |n| Expr::Constant(Rational::from_integer(n)))(input)
}

fn parse_identifier(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    map(ws(recognize(pair(alpha1, alphanumeric0))), |s: &str| match s {
        "oo" => Expr::Infinity,
        "nan" => Expr::NaN,
        _ => Expr::Variable(s.to_string()),
    })(input)
}

fn parse_function(input: &str) -> IResult<&str, Expr, VerboseError<&str>> {
    let (rest, (name, arg)) = pair(
        terminated(
            alt((
                tag("sin"),
                tag("cos"),
                tag("tan"),
                tag("arctan"),
                tag("exp"),
                tag("log"),
                tag("abs"),
            )),
            not(peek(satisfy(|c: char| c.is_ascii_alphanumeric()))),
        ),
        alt((
            delimited(ws(char('(')), parse_add_sub, ws(char(')'))),
            parse_primary,
        )),
    )(input)?;

    let arg = arg.boxed();
    let expr = match name {
        "sin" => Expr::Sin(arg),
        "cos" => Expr::Cos(arg),
        "tan" => Expr::Tan(arg),
        "arctan" => Expr::Atan(arg),
        "exp" => Expr::Exp(arg),
        "log" => Expr::Log(arg),
        _ => Expr::Abs(arg),
    };

    Ok((rest, expr))
}

fn parse_int(input: &str) -> IResult<&str, BigInt, VerboseError<&str>> {
    map_res(ws(recognize(pair(opt(char('-')), digit1))), |s: &str| {
        BigInt::from_str_radix(s, 10)
    })(input)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::simplify;

    #[test]
    fn parses_points_and_special_values() {
        assert_eq!(parse_expr("oo").unwrap(), Expr::Infinity);
        assert_eq!(parse_expr("nan").unwrap(), Expr::NaN);
        assert_eq!(
            parse_expr("abs(x)").unwrap(),
            Expr::Abs(Expr::var("x").boxed())
        );
    }

    #[test]
    fn function_names_need_a_word_boundary() {
        assert_eq!(parse_expr("cost").unwrap(), Expr::var("cost"));
        assert_eq!(
            parse_expr("exp x").unwrap(),
            Expr::Exp(Expr::var("x").boxed())
        );
    }

    #[test]
    fn integer_fractions_stay_divisions() {
        let parsed = parse_expr("1/0").unwrap();
        assert!(matches!(parsed, Expr::Div(_, _)));
    }

    #[test]
    fn powers_bind_tighter_than_division() {
        let simp = |input: &str| simplify(parse_expr(input).unwrap());
        assert_eq!(simp("x^4/3"), simp("(x^4)/3"));
        assert_eq!(simp("2^3/4"), Expr::integer(2));
    }

    #[test]
    fn division_is_left_associative() {
        let simp = |input: &str| simplify(parse_expr(input).unwrap());
        assert_eq!(simp("x/2/3"), simp("x/6"));
        assert_eq!(simp("x^3/6"), simp("(1/6)*x^3"));
    }
}
