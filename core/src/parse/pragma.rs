//! file: core/src/parse/pragma.rs
//! description: pragma pass (assignments, batches, call arguments, tiling).
//!
//! Pragmas form one contiguous run. The pass starts at the first pragma in
//! the chain and stops, without error, at the first node that is not one.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use log::debug;

use crate::analysis::ScanVariables;
use crate::builder::{BuilderNode, NodeKind, NodeTag};
use crate::ir::params::{ParamMap, ParamValue};

use super::err::{ParseError, ParseErrorKind};
use super::state::ParseState;

pub(crate) fn read_pragmas(state: &mut ParseState) -> Result<(), ParseError> {
    let mut stream = state.stream.copy();
    let mut curr = stream.read_next(NodeTag::PRAGMA);

    while let Some(node) = curr {
        match &node.kind {
            NodeKind::Assign(values) => {
                debug!("static assignment of {} names", values.len());
                state.static_params = values.clone();
            }
            NodeKind::BatchAssign(columns) => {
                state.batch_params = expand_columns(columns, &node)?;
                debug!("batch of {} entries", state.batch_params.len());
            }
            NodeKind::ListAssign(rows) => {
                state.batch_params = check_rows(rows, &node)?;
                debug!("batch of {} entries", state.batch_params.len());
            }
            NodeKind::Args(names) => {
                check_args(state, names, &node)?;
                state.order = names.clone();
            }
            NodeKind::Parallelize(spacing) => {
                debug!("parallelizing register with spacing {}", spacing);
                state.register = state
                    .register
                    .take()
                    .map(|register| register.parallelize(spacing.clone()));
            }
            _ => break,
        }
        curr = stream.read();
    }

    Ok(())
}

fn check_args(state: &ParseState, names: &[String], node: &BuilderNode) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = names
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::DuplicateArgs(duplicates),
            Some(node.location()),
        ));
    }

    let vector_names = ScanVariables::new().scan_sequence(&state.sequence).vector_vars;
    let collisions: BTreeSet<&String> = names.iter().filter(|n| vector_names.contains(*n)).collect();
    if !collisions.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::VectorArgCollision(collisions.into_iter().cloned().collect()),
            Some(node.location()),
        ));
    }
    Ok(())
}

fn expand_columns(
    columns: &IndexMap<String, Vec<ParamValue>>,
    node: &BuilderNode,
) -> Result<Vec<ParamMap>, ParseError> {
    let Some(expected) = columns.values().next().map(Vec::len) else {
        return Ok(vec![ParamMap::new()]);
    };
    for (name, values) in columns {
        if values.len() != expected {
            return Err(ParseError::new(
                ParseErrorKind::BatchLengthMismatch {
                    name: name.clone(),
                    expected,
                    got: values.len(),
                },
                Some(node.location()),
            ));
        }
    }
    Ok((0..expected)
        .map(|i| {
            columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect()
        })
        .collect())
}

fn check_rows(rows: &[ParamMap], node: &BuilderNode) -> Result<Vec<ParamMap>, ParseError> {
    let Some(first) = rows.first() else {
        return Ok(vec![ParamMap::new()]);
    };
    let keys: BTreeSet<&String> = first.keys().collect();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.keys().collect::<BTreeSet<_>>() != keys {
            return Err(ParseError::new(
                ParseErrorKind::InconsistentBatchKeys { index },
                Some(node.location()),
            ));
        }
    }
    Ok(rows.to_vec())
}
