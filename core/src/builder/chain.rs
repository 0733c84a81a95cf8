//! file: core/src/builder/chain.rs
//! description: fluent program builder.
//!
//! Every call appends one node to an immutable chain and returns a new
//! `Builder` pointing at it. Earlier builders stay valid, so a common prefix
//! can be branched into several programs.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ir::circuit::AnalogCircuit;
use crate::ir::params::{ParamMap, ParamValue};
use crate::ir::register::{AtomArrangement, Register};
use crate::ir::routine::Routine;
use crate::ir::scalar::Scalar;
use crate::ir::sequence::Sequence;
use crate::ir::waveform::{Interpolation, OpaqueFn, TimeFn, Waveform};
use crate::parse::Parser;
use crate::parse::err::ParseError;

use super::kind::NodeKind;
use super::node::BuilderNode;

#[derive(Debug, Clone)]
pub struct Builder {
    head: Arc<BuilderNode>,
}

impl Builder {
    /// Start a program on an empty register.
    pub fn start() -> Self {
        Builder::new(AtomArrangement::new())
    }

    pub fn new(register: AtomArrangement) -> Self {
        Builder {
            head: Arc::new(BuilderNode::root(NodeKind::Register(register))),
        }
    }

    /// Terminal node of the chain.
    pub fn head(&self) -> &Arc<BuilderNode> {
        &self.head
    }

    fn push(&self, kind: NodeKind) -> Builder {
        Builder {
            head: Arc::new(BuilderNode::child(Arc::clone(&self.head), kind)),
        }
    }

    // couplings and fields

    pub fn rydberg(&self) -> Builder {
        self.push(NodeKind::Rydberg)
    }

    pub fn hyperfine(&self) -> Builder {
        self.push(NodeKind::Hyperfine)
    }

    pub fn detuning(&self) -> Builder {
        self.push(NodeKind::Detuning)
    }

    pub fn rabi(&self) -> Builder {
        self.push(NodeKind::Rabi)
    }

    pub fn amplitude(&self) -> Builder {
        self.push(NodeKind::RabiAmplitude)
    }

    pub fn phase(&self) -> Builder {
        self.push(NodeKind::RabiPhase)
    }

    // spatial modulations

    pub fn uniform(&self) -> Builder {
        self.push(NodeKind::Uniform)
    }

    /// Drive a single site with weight 1. Consecutive `location` calls build
    /// one multi-site modulation.
    pub fn location(&self, index: usize) -> Builder {
        self.push(NodeKind::Location { index, scale: None })
    }

    pub fn scaled_location(&self, index: usize, scale: impl Into<Scalar>) -> Builder {
        self.push(NodeKind::Location {
            index,
            scale: Some(scale.into()),
        })
    }

    /// Per-site weights in site order.
    pub fn scale<S: Into<Scalar>>(&self, weights: impl IntoIterator<Item = S>) -> Builder {
        self.push(NodeKind::Scale(
            weights.into_iter().map(Into::into).collect(),
        ))
    }

    /// Per-site weights supplied at run time under `name`.
    pub fn var_scale(&self, name: impl Into<String>) -> Builder {
        self.push(NodeKind::VarScale(name.into()))
    }

    // waveforms

    pub fn constant(&self, value: impl Into<Scalar>, duration: impl Into<Scalar>) -> Builder {
        self.push(NodeKind::Constant {
            value: value.into(),
            duration: duration.into(),
        })
    }

    pub fn linear(
        &self,
        start: impl Into<Scalar>,
        stop: impl Into<Scalar>,
        duration: impl Into<Scalar>,
    ) -> Builder {
        self.push(NodeKind::Linear {
            start: start.into(),
            stop: stop.into(),
            duration: duration.into(),
        })
    }

    pub fn poly<S: Into<Scalar>>(
        &self,
        coeffs: impl IntoIterator<Item = S>,
        duration: impl Into<Scalar>,
    ) -> Builder {
        self.push(NodeKind::Poly {
            coeffs: coeffs.into_iter().map(Into::into).collect(),
            duration: duration.into(),
        })
    }

    pub fn piecewise_linear<D: Into<Scalar>, V: Into<Scalar>>(
        &self,
        durations: impl IntoIterator<Item = D>,
        values: impl IntoIterator<Item = V>,
    ) -> Builder {
        self.push(NodeKind::PiecewiseLinear {
            durations: durations.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn piecewise_constant<D: Into<Scalar>, V: Into<Scalar>>(
        &self,
        durations: impl IntoIterator<Item = D>,
        values: impl IntoIterator<Item = V>,
    ) -> Builder {
        self.push(NodeKind::PiecewiseConstant {
            durations: durations.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Arbitrary function of time. Follow with `sample` to discretize it.
    pub fn func(
        &self,
        name: impl Into<String>,
        duration: impl Into<Scalar>,
        function: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Builder {
        self.push(NodeKind::Fn(OpaqueFn {
            name: name.into(),
            duration: duration.into(),
            function: Some(TimeFn::new(function)),
        }))
    }

    /// Append a prebuilt waveform.
    pub fn apply(&self, waveform: Waveform) -> Builder {
        self.push(NodeKind::ApplyWaveform(waveform))
    }

    pub fn slice(&self, start: impl Into<Scalar>, stop: impl Into<Scalar>) -> Builder {
        self.slice_interval(Some(start.into()), Some(stop.into()))
    }

    /// Slice with optional bounds; a missing bound is the waveform edge.
    pub fn slice_interval(&self, start: Option<Scalar>, stop: Option<Scalar>) -> Builder {
        self.push(NodeKind::Slice { start, stop })
    }

    pub fn record(&self, name: impl Into<String>) -> Builder {
        self.push(NodeKind::Record { name: name.into() })
    }

    /// Sample the preceding `func` every `dt`. Without an explicit
    /// interpolation, phase drives hold values and every other field ramps.
    pub fn sample(&self, dt: impl Into<Scalar>, interpolation: Option<Interpolation>) -> Builder {
        self.push(NodeKind::Sample {
            dt: dt.into(),
            interpolation,
        })
    }

    /// Use a prebuilt sequence instead of drives from this chain.
    pub fn apply_sequence(&self, sequence: Sequence) -> Builder {
        self.push(NodeKind::ApplySequence(sequence))
    }

    // pragmas

    pub fn assign<K: Into<String>, V: Into<ParamValue>>(
        &self,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Builder {
        let map: ParamMap = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.push(NodeKind::Assign(map))
    }

    /// Column-wise batch: entry `i` takes the `i`-th value of every list.
    pub fn batch_assign<K: Into<String>, V: Into<ParamValue>>(
        &self,
        columns: impl IntoIterator<Item = (K, Vec<V>)>,
    ) -> Builder {
        let columns: IndexMap<String, Vec<ParamValue>> = columns
            .into_iter()
            .map(|(k, vs)| (k.into(), vs.into_iter().map(Into::into).collect()))
            .collect();
        self.push(NodeKind::BatchAssign(columns))
    }

    /// Row-wise batch: one parameter map per entry.
    pub fn list_assign(&self, rows: Vec<ParamMap>) -> Builder {
        self.push(NodeKind::ListAssign(rows))
    }

    /// Names of the values supplied when the program is called.
    pub fn args<S: Into<String>>(&self, names: impl IntoIterator<Item = S>) -> Builder {
        self.push(NodeKind::Args(names.into_iter().map(Into::into).collect()))
    }

    pub fn parallelize(&self, cluster_spacing: impl Into<Scalar>) -> Builder {
        self.push(NodeKind::Parallelize(cluster_spacing.into()))
    }

    // compilation

    pub fn parse_register(&self) -> Result<Register, ParseError> {
        Parser::new().parse_register(self)
    }

    pub fn parse_sequence(&self) -> Result<Sequence, ParseError> {
        Parser::new().parse_sequence(self)
    }

    pub fn parse_circuit(&self) -> Result<AnalogCircuit, ParseError> {
        Parser::new().parse_circuit(self)
    }

    pub fn parse(&self) -> Result<Routine, ParseError> {
        Parser::new().parse(self)
    }
}
