//! String-based convenience API for quick experimentation.

pub use crate::ui::{
    diff, differentiate, lim, limit, norm, normalize, ord, order, order_at, parse, simp, simplify,
};
