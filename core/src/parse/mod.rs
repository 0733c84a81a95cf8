//! file: core/src/parse/mod.rs
//! description: lowering of a builder chain into IR.
//!
//! Passes, in order: register, sequence, pragmas. Every entry point builds
//! a fresh `ParseState`, so one `Parser` can be shared between threads and
//! reused across chains.

pub mod err;
mod pragma;
mod sequence;
mod state;

use log::debug;

use crate::builder::{Builder, NodeKind};
use crate::ir::circuit::AnalogCircuit;
use crate::ir::register::Register;
use crate::ir::routine::Routine;
use crate::ir::sequence::Sequence;

use self::err::{ParseError, ParseErrorKind};
use self::state::ParseState;

#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    /// Register, wrapped by any `parallelize` pragma.
    pub fn parse_register(&self, builder: &Builder) -> Result<Register, ParseError> {
        let mut state = ParseState::new(builder);
        let register = read_register(&mut state)?;
        // the args check in the pragma pass needs the sequence's vector names
        sequence::read_sequence(&mut state)?;
        pragma::read_pragmas(&mut state)?;
        Ok(state.register.unwrap_or(register))
    }

    pub fn parse_sequence(&self, builder: &Builder) -> Result<Sequence, ParseError> {
        let mut state = ParseState::new(builder);
        sequence::read_sequence(&mut state)?;
        Ok(state.sequence)
    }

    /// Register and sequence; pragmas are not applied.
    pub fn parse_circuit(&self, builder: &Builder) -> Result<AnalogCircuit, ParseError> {
        let mut state = ParseState::new(builder);
        let register = read_register(&mut state)?;
        sequence::read_sequence(&mut state)?;
        Ok(AnalogCircuit::new(register, state.sequence))
    }

    pub fn parse(&self, builder: &Builder) -> Result<Routine, ParseError> {
        let mut state = ParseState::new(builder);
        debug!("parsing chain of {} nodes", state.stream.len());

        let register = read_register(&mut state)?;
        sequence::read_sequence(&mut state)?;
        pragma::read_pragmas(&mut state)?;

        let params = state.params();
        let register = state.register.take().unwrap_or(register);
        let circuit = AnalogCircuit::new(register, std::mem::take(&mut state.sequence));
        Ok(Routine {
            source: builder.clone(),
            circuit,
            params,
        })
    }
}

/// The first node of every chain is its register.
fn read_register(state: &mut ParseState) -> Result<Register, ParseError> {
    let node = state
        .stream
        .read()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingRegister, None))?;
    let NodeKind::Register(atoms) = &node.kind else {
        return Err(ParseError::new(
            ParseErrorKind::MissingRegister,
            Some(node.location()),
        ));
    };
    let register = Register::Atoms(atoms.clone());
    state.register = Some(register.clone());
    Ok(register)
}
