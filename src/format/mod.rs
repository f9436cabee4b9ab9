//! Formatting helpers for rendering expressions, order terms and limits.

pub mod expr;
pub mod limit;

pub use expr::{pretty, pretty_order};
pub use limit::pretty_limit_result;
