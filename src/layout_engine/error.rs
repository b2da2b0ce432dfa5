use thiserror::Error;

use super::request::Role;
use super::systems::LayoutMethod;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout method `{0}` not found")]
    UnknownMethod(String),
    #[error("no `{0}` objects were passed")]
    MissingRole(Role),
    #[error("{0} layout needs an inner box")]
    MissingInnerBounds(LayoutMethod),
    #[error("there are no objects to arrange")]
    Empty,
    #[error("{objects} objects do not fit in {slots} grid cells")]
    Capacity { objects: usize, slots: usize },
    #[error("invalid option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },
    #[error("object {index} is {width} wide but the strip is only {strip} wide")]
    TilingInfeasible { index: usize, width: f64, strip: f64 },
}

impl LayoutError {
    pub(crate) fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::InvalidOption { key: key.into(), reason: reason.into() }
    }
}
