//! Asymptotic order terms (big-O) over a lightweight symbolic expression tree.
//!
//! Expressions are parsed with [`parse_expr`], brought to canonical form by
//! [`simplify`], and wrapped into order terms through an [`OrderContext`]:
//!
//! ```
//! use bigo::{OrderArgs, OrderContext, parse_expr};
//!
//! let ctx = OrderContext::new();
//! let term = ctx.order(&parse_expr("x + x^2").unwrap(), OrderArgs::symbols(&["x"])).unwrap();
//! assert_eq!(term.to_string(), "O(x)");
//! ```

pub mod calculus;
pub mod config;
pub mod error;
pub mod expr;
pub mod format;
pub mod order;
pub mod parser;
pub mod prelude;
pub mod simplify;
pub mod ui;

pub use calculus::{LimitError, LimitResult, Point, differentiate, leading_term, limit};
pub use config::OrderConfig;
pub use error::{CasError, Result};
pub use expr::{Expr, Rational, add, div, mul, neg, one, pow, rational, sub, zero};
pub use format::{pretty, pretty_limit_result, pretty_order};
pub use order::{
    BoundedCache, ConstructionCache, Containment, NoCache, Order, OrderArgs, OrderContext,
    UnboundedCache, get_o, remove_o,
};
pub use parser::parse_expr;
pub use simplify::{expand, normalize, simplify, simplify_fully, simplify_with_limit, substitute};
