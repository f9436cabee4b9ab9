//! Calculus routines: differentiation, asymptotics, limits and leading terms.

pub mod asymptotic;
pub mod differentiate;
pub mod leading;
pub mod limit;

pub use asymptotic::{Asymptotics, Dominant, Tendency, sign_of};
pub use differentiate::differentiate;
pub use leading::leading_term;
pub use limit::{DEFAULT_LIMIT_DEPTH, LimitError, LimitResult, Point, limit, limit_with_depth};
