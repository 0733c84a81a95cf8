//! file: core/src/parse/sequence.rs
//! description: sequence pass, lowering drives from the builder chain.
//!
//! The chain has no explicit drive delimiters. Each drive starts at a
//! spatial node; its coupling and field come from the nodes that scoped it,
//! falling back to the last ones seen. The waveform expression runs from
//! the node after the spatial node up to the first node that is neither a
//! waveform primitive nor a waveform transform.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::builder::{BuilderNode, BuilderStream, NodeKind, NodeTag};
use crate::ir::field::SpatialModulation;
use crate::ir::pulse::FieldName;
use crate::ir::scalar::Scalar;
use crate::ir::sequence::Coupling;
use crate::ir::waveform::{Interpolation, Waveform};

use super::err::{ParseError, ParseErrorKind};
use super::state::ParseState;

/// Selectors found above a spatial node.
struct Address {
    coupling: Option<Coupling>,
    field: Option<FieldName>,
    spatial: Arc<BuilderNode>,
}

pub(crate) fn read_sequence(state: &mut ParseState) -> Result<(), ParseError> {
    let mut stream = state.stream.copy();
    if stream.peek_tag() == Some(NodeTag::Register) {
        stream.read();
    }

    if let Some(node) = stream.curr() {
        if let NodeKind::ApplySequence(sequence) = &node.kind {
            debug!("adopting prebuilt sequence at {}", node.location());
            state.sequence = sequence.clone();
            return Ok(());
        }
    }

    while let Some(address) = read_address(&mut stream) {
        if let Some(coupling) = address.coupling {
            if state.coupling != Some(coupling) {
                trace!("coupling -> {}", coupling);
            }
            state.coupling = Some(coupling);
        }
        if let Some(field) = address.field {
            if state.field != Some(field) {
                trace!("field -> {}", field);
            }
            state.field = Some(field);
        }

        let location = address.spatial.location();
        let field = state
            .field
            .ok_or_else(|| ParseError::new(ParseErrorKind::MissingField, Some(location.clone())))?;
        let coupling = state
            .coupling
            .ok_or_else(|| ParseError::new(ParseErrorKind::MissingCoupling, Some(location.clone())))?;

        let modulation = read_modulation(&address.spatial, &mut stream);
        let Some(waveform) = read_waveform(state, &mut stream)? else {
            warn!("spatial modulation at {} has no waveform, skipping", location);
            continue;
        };

        debug!("drive {}.{} [{}] <- {}", coupling, field, modulation, waveform.kind_name());
        let sequence = std::mem::take(&mut state.sequence);
        state.sequence = sequence.add_drive(coupling, field, modulation, waveform);
    }

    Ok(())
}

/// Scan to the next spatial node and classify the selectors scoping it.
fn read_address(stream: &mut BuilderStream) -> Option<Address> {
    let spatial = stream.read_next(NodeTag::SPATIAL)?;

    let field = match spatial.parent_kind() {
        Some(NodeKind::Detuning) => Some(FieldName::Detuning),
        Some(NodeKind::RabiAmplitude) => Some(FieldName::RabiAmplitude),
        Some(NodeKind::RabiPhase) => Some(FieldName::RabiPhase),
        _ => None,
    };

    let coupling = match (field, spatial.parent()) {
        (Some(field), Some(field_node)) => {
            let mut scope = field_node.parent();
            if field != FieldName::Detuning {
                if let Some(rabi) = scope.filter(|n| matches!(n.kind, NodeKind::Rabi)) {
                    scope = rabi.parent();
                }
            }
            match scope.map(|n| &n.kind) {
                Some(NodeKind::Rydberg) => Some(Coupling::Rydberg),
                Some(NodeKind::Hyperfine) => Some(Coupling::Hyperfine),
                _ => None,
            }
        }
        _ => None,
    };

    Some(Address {
        coupling,
        field,
        spatial,
    })
}

/// Lower a spatial node to its IR key. A run of `location` nodes collapses
/// into one multi-site key.
fn read_modulation(spatial: &BuilderNode, stream: &mut BuilderStream) -> SpatialModulation {
    match &spatial.kind {
        NodeKind::Location { index, scale } => {
            let mut weights = BTreeMap::new();
            weights.insert(*index, scale.clone().unwrap_or_else(|| Scalar::from(1)));
            while let Some(next) = stream.curr() {
                let NodeKind::Location { index, scale } = &next.kind else {
                    break;
                };
                weights.insert(*index, scale.clone().unwrap_or_else(|| Scalar::from(1)));
                stream.read();
            }
            SpatialModulation::ScaledLocations { weights }
        }
        NodeKind::Scale(values) => {
            SpatialModulation::locations(values.iter().cloned().enumerate())
        }
        NodeKind::VarScale(name) => SpatialModulation::RunTimeVector { name: name.clone() },
        _ => SpatialModulation::Uniform,
    }
}

/// Fold the waveform expression under the cursor. Stops, without consuming,
/// at the first node that does not belong to it.
fn read_waveform(
    state: &ParseState,
    stream: &mut BuilderStream,
) -> Result<Option<Waveform>, ParseError> {
    let mut waveform: Option<Waveform> = None;

    while let Some(node) = stream.curr().cloned() {
        match &node.kind {
            NodeKind::Slice { start, stop } => {
                let inner = require(waveform.take(), &node, "slice")?;
                waveform = Some(inner.slice(start.clone(), stop.clone()));
            }
            NodeKind::Record { name } => {
                let inner = require(waveform.take(), &node, "record")?;
                waveform = Some(inner.record(name.clone()));
            }
            NodeKind::Sample { dt, interpolation } => {
                let interpolation = interpolation.unwrap_or(match state.field {
                    Some(FieldName::RabiPhase) => Interpolation::Constant,
                    _ => Interpolation::Linear,
                });
                let Some(NodeKind::Fn(function)) = node.parent_kind() else {
                    return Err(ParseError::new(
                        ParseErrorKind::SampleWithoutFunction,
                        Some(node.location()),
                    ));
                };
                let sampled = Waveform::OpaqueFn(function.clone()).sample(dt.clone(), interpolation);
                waveform = Some(extend(waveform.take(), sampled));
            }
            NodeKind::Fn(_) if stream.peek(1).map(|n| n.tag()) == Some(NodeTag::Sample) => {}
            _ => match lower_primitive(&node)? {
                Some(leaf) => waveform = Some(extend(waveform.take(), leaf)),
                None => break,
            },
        }
        stream.read();
    }

    Ok(waveform)
}

fn extend(acc: Option<Waveform>, next: Waveform) -> Waveform {
    match acc {
        Some(acc) => acc.append(next),
        None => next,
    }
}

fn require(
    waveform: Option<Waveform>,
    node: &BuilderNode,
    transform: &str,
) -> Result<Waveform, ParseError> {
    waveform.ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::MissingWaveform {
                transform: transform.to_string(),
            },
            Some(node.location()),
        )
    })
}

/// Leaf waveform for a primitive node; `None` for any other node kind.
fn lower_primitive(node: &BuilderNode) -> Result<Option<Waveform>, ParseError> {
    let piecewise_error = |durations: &[Scalar], values: &[Scalar]| {
        ParseError::new(
            ParseErrorKind::PiecewiseLengthMismatch {
                durations: durations.len(),
                values: values.len(),
            },
            Some(node.location()),
        )
    };

    let waveform = match &node.kind {
        NodeKind::Constant { value, duration } => Waveform::constant(value.clone(), duration.clone()),
        NodeKind::Linear {
            start,
            stop,
            duration,
        } => Waveform::linear(start.clone(), stop.clone(), duration.clone()),
        NodeKind::Poly { coeffs, duration } => Waveform::poly(coeffs.iter().cloned(), duration.clone()),
        NodeKind::PiecewiseLinear { durations, values } => {
            Waveform::piecewise_linear(durations.clone(), values.clone())
                .ok_or_else(|| piecewise_error(durations, values))?
        }
        NodeKind::PiecewiseConstant { durations, values } => {
            Waveform::piecewise_constant(durations.clone(), values.clone())
                .ok_or_else(|| piecewise_error(durations, values))?
        }
        NodeKind::Fn(function) => Waveform::OpaqueFn(function.clone()),
        NodeKind::ApplyWaveform(waveform) => waveform.clone(),
        _ => return Ok(None),
    };
    Ok(Some(waveform))
}
