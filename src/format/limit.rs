use crate::calculus::LimitResult;
use crate::format::expr::pretty;

/// Render a `LimitResult` the way it would be typed back in.
pub fn pretty_limit_result(result: &LimitResult) -> String {
    match result {
        LimitResult::Finite(value) => pretty(value),
        LimitResult::PosInfinity => "oo".to_string(),
        LimitResult::NegInfinity => "-oo".to_string(),
        LimitResult::Unbounded => "unbounded".to_string(),
        LimitResult::DoesNotExist => "does not exist".to_string(),
    }
}
