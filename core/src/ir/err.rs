//! file: core/src/ir/err.rs
//! description: evaluation errors raised by the waveform value layer.
//!
//! `EvalError` is returned whenever a scalar, waveform or parameter set is
//! evaluated against an assignment that cannot satisfy it. Parser and
//! analysis passes propagate these untouched.

use crate::error::{Level, PulsecErrorExt};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A free variable has no binding in the assignment.
    MissingVariable(String),
    DivisionByZero,
    /// Decimal arithmetic left the representable range.
    Overflow,
    /// A sample step that is zero or negative.
    InvalidSampleStep,
    /// A slice whose stop precedes its start, or that leaves the waveform.
    InvalidSlice,
    /// An opaque function was deserialized or built without a callable.
    OpaqueFunctionUnavailable(String),
    /// A float computation (smoothing, opaque function) produced NaN or infinity.
    NonFinite,
    /// Call-time arguments do not match the declared argument list.
    ArgumentCount { expected: usize, got: usize },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::MissingVariable(name) => {
                write!(f, "no value assigned to variable `{name}`")
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::Overflow => write!(f, "decimal overflow during evaluation"),
            EvalError::InvalidSampleStep => write!(f, "sample step must be positive"),
            EvalError::InvalidSlice => write!(f, "slice interval is empty or out of range"),
            EvalError::OpaqueFunctionUnavailable(name) => {
                write!(f, "opaque function `{name}` has no callable attached")
            }
            EvalError::NonFinite => write!(f, "evaluation produced a non-finite value"),
            EvalError::ArgumentCount { expected, got } => {
                write!(f, "expected {expected} call-time arguments, got {got}")
            }
        }
    }
}

impl std::error::Error for EvalError {}

impl PulsecErrorExt for EvalError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "eval".to_string()
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
