//! Symbolic simplification, expansion, normalization, and substitution utilities.

mod conjugate;
mod expand;
mod normalize;
mod rules;
mod split;
mod substitute;

pub use conjugate::{conjugate, transpose};
pub use expand::{
    DEFAULT_EXPAND_POWER_LIMIT, expand, expand_log, expand_power_base, expand_with_limit,
    find_unexpanded_power,
};
pub use normalize::{normalize, normalize_with_limit};
pub use rules::{
    add_terms, mul_factors, simplify, simplify_abs, simplify_add, simplify_atan, simplify_cos,
    simplify_div, simplify_exp, simplify_fully, simplify_log, simplify_mul, simplify_neg,
    simplify_pow, simplify_sin, simplify_sub, simplify_tan, simplify_with_limit, split_coeff,
};
pub use split::{as_independent, numer_denom};
pub use substitute::substitute;
