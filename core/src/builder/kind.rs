//! file: core/src/builder/kind.rs
//! description: builder-chain node kinds and their tags.
//!
//! `NodeKind` is the payload recorded by each fluent builder call. `NodeTag`
//! is its field-less discriminant, used by `BuilderStream::read_next` to
//! scan for structural landmarks.

use std::fmt;

use indexmap::IndexMap;

use crate::ir::params::{ParamMap, ParamValue};
use crate::ir::register::AtomArrangement;
use crate::ir::scalar::Scalar;
use crate::ir::sequence::Sequence;
use crate::ir::waveform::{Interpolation, OpaqueFn, Waveform};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // root
    Register(AtomArrangement),
    ApplySequence(Sequence),

    // coupling and field selectors
    Rydberg,
    Hyperfine,
    Detuning,
    Rabi,
    RabiAmplitude,
    RabiPhase,

    // spatial modulations
    Uniform,
    Location { index: usize, scale: Option<Scalar> },
    Scale(Vec<Scalar>),
    VarScale(String),

    // waveform primitives
    Constant { value: Scalar, duration: Scalar },
    Linear { start: Scalar, stop: Scalar, duration: Scalar },
    Poly { coeffs: Vec<Scalar>, duration: Scalar },
    PiecewiseLinear { durations: Vec<Scalar>, values: Vec<Scalar> },
    PiecewiseConstant { durations: Vec<Scalar>, values: Vec<Scalar> },
    Fn(OpaqueFn),
    ApplyWaveform(Waveform),

    // waveform transforms
    Slice { start: Option<Scalar>, stop: Option<Scalar> },
    Record { name: String },
    Sample { dt: Scalar, interpolation: Option<Interpolation> },

    // pragmas
    Assign(ParamMap),
    BatchAssign(IndexMap<String, Vec<ParamValue>>),
    ListAssign(Vec<ParamMap>),
    Args(Vec<String>),
    Parallelize(Scalar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Register,
    ApplySequence,
    Rydberg,
    Hyperfine,
    Detuning,
    Rabi,
    RabiAmplitude,
    RabiPhase,
    Uniform,
    Location,
    Scale,
    VarScale,
    Constant,
    Linear,
    Poly,
    PiecewiseLinear,
    PiecewiseConstant,
    Fn,
    ApplyWaveform,
    Slice,
    Record,
    Sample,
    Assign,
    BatchAssign,
    ListAssign,
    Args,
    Parallelize,
}

impl NodeTag {
    pub const SPATIAL: &'static [NodeTag] = &[
        NodeTag::Uniform,
        NodeTag::Location,
        NodeTag::Scale,
        NodeTag::VarScale,
    ];

    pub const PRAGMA: &'static [NodeTag] = &[
        NodeTag::Assign,
        NodeTag::BatchAssign,
        NodeTag::ListAssign,
        NodeTag::Args,
        NodeTag::Parallelize,
    ];

    pub fn is_spatial(self) -> bool {
        Self::SPATIAL.contains(&self)
    }

    pub fn is_pragma(self) -> bool {
        Self::PRAGMA.contains(&self)
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Register(_) => NodeTag::Register,
            NodeKind::ApplySequence(_) => NodeTag::ApplySequence,
            NodeKind::Rydberg => NodeTag::Rydberg,
            NodeKind::Hyperfine => NodeTag::Hyperfine,
            NodeKind::Detuning => NodeTag::Detuning,
            NodeKind::Rabi => NodeTag::Rabi,
            NodeKind::RabiAmplitude => NodeTag::RabiAmplitude,
            NodeKind::RabiPhase => NodeTag::RabiPhase,
            NodeKind::Uniform => NodeTag::Uniform,
            NodeKind::Location { .. } => NodeTag::Location,
            NodeKind::Scale(_) => NodeTag::Scale,
            NodeKind::VarScale(_) => NodeTag::VarScale,
            NodeKind::Constant { .. } => NodeTag::Constant,
            NodeKind::Linear { .. } => NodeTag::Linear,
            NodeKind::Poly { .. } => NodeTag::Poly,
            NodeKind::PiecewiseLinear { .. } => NodeTag::PiecewiseLinear,
            NodeKind::PiecewiseConstant { .. } => NodeTag::PiecewiseConstant,
            NodeKind::Fn(_) => NodeTag::Fn,
            NodeKind::ApplyWaveform(_) => NodeTag::ApplyWaveform,
            NodeKind::Slice { .. } => NodeTag::Slice,
            NodeKind::Record { .. } => NodeTag::Record,
            NodeKind::Sample { .. } => NodeTag::Sample,
            NodeKind::Assign(_) => NodeTag::Assign,
            NodeKind::BatchAssign(_) => NodeTag::BatchAssign,
            NodeKind::ListAssign(_) => NodeTag::ListAssign,
            NodeKind::Args(_) => NodeTag::Args,
            NodeKind::Parallelize(_) => NodeTag::Parallelize,
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
