//! Error types for quadline-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("singular matrix")]
    SingularMatrix,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("element {element} produced a non-finite {analysis} stamp")]
    NonFiniteStamp {
        element: String,
        analysis: &'static str,
    },

    #[error("invalid analysis setup: {0}")]
    InvalidAnalysis(String),

    #[error("invalid element {name}: {reason}")]
    InvalidElement { name: String, reason: String },

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error(transparent)]
    Model(#[from] quadline_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
