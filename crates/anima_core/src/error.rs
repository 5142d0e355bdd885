//! Error types for the affect core.
//!
//! The simulation itself never fails: every write is clamped. Errors only
//! arise at the boundaries (opt-in stimulus validation, name parsing, profile
//! conversion).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimaError {
    /// A stimulus field lies outside its declared range.
    #[error("Invalid stimulus field `{field}`: {value} (expected {expected})")]
    InvalidStimulus {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A dimension key that is not part of the closed vocabulary.
    #[error("Unknown {kind} key: {name}")]
    UnknownDimension { kind: &'static str, name: String },

    /// A profile value that cannot be turned into a temperament.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnimaError>;
