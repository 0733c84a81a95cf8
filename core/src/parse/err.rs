use std::fmt;

use crate::error::{Level, PulsecErrorExt};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The chain does not start with a register node.
    MissingRegister,
    /// A drive was reached before any coupling was selected.
    MissingCoupling,
    /// A drive was reached before any field was selected.
    MissingField,
    /// A waveform transform was applied with no waveform to act on.
    MissingWaveform { transform: String },
    /// `sample` does not directly follow a function waveform.
    SampleWithoutFunction,
    PiecewiseLengthMismatch { durations: usize, values: usize },
    DuplicateArgs(Vec<String>),
    VectorArgCollision(Vec<String>),
    BatchLengthMismatch { name: String, expected: usize, got: usize },
    InconsistentBatchKeys { index: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::MissingRegister => write!(f, "program does not start with a register"),
            ParseErrorKind::MissingCoupling => write!(f, "no coupling selected for drive"),
            ParseErrorKind::MissingField => write!(f, "no field selected for drive"),
            ParseErrorKind::MissingWaveform { transform } => {
                write!(f, "'{}' applied before any waveform", transform)
            }
            ParseErrorKind::SampleWithoutFunction => {
                write!(f, "sample must directly follow a function waveform")
            }
            ParseErrorKind::PiecewiseLengthMismatch { durations, values } => write!(
                f,
                "piecewise waveform has {} durations but {} values",
                durations, values
            ),
            ParseErrorKind::DuplicateArgs(names) => {
                write!(f, "Cannot have duplicate names {:?}.", names)
            }
            ParseErrorKind::VectorArgCollision(names) => {
                write!(f, "Cannot have RunTimeVectors: {:?} as an argument.", names)
            }
            ParseErrorKind::BatchLengthMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "batch column '{}' has {} values, expected {}",
                name, got, expected
            ),
            ParseErrorKind::InconsistentBatchKeys { index } => {
                write!(f, "batch entry {} does not assign the same names as entry 0", index)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    level: Level,
    kind: ParseErrorKind,
    location: Option<Location>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Option<Location>) -> Self {
        ParseError {
            level: Level::Error,
            kind,
            location,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.kind, loc)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for ParseError {}

impl PulsecErrorExt for ParseError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }

    fn issuer(&self) -> String {
        "parser".to_string()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
