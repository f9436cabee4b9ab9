use thiserror::Error;

use crate::calculus::LimitError;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CasError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("order variables must be symbols, got {0}")]
    InvalidVariable(String),
    #[error("order variables must be unique, got {0} twice")]
    DuplicateVariable(String),
    #[error("order terms only support the points 0 and oo, got {0}")]
    UnsupportedPoint(String),
    #[error("mixing order terms at different points is not supported: {0}")]
    MixedPoints(String),
    #[error("membership of {0} could not be decided")]
    IndeterminateMembership(String),
    #[error(transparent)]
    Limit(#[from] LimitError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
