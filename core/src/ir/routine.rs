use std::fmt;

use crate::builder::Builder;

use super::circuit::AnalogCircuit;
use super::params::Parameters;
use super::register::Register;
use super::sequence::Sequence;

/// A compiled program: the circuit, its execution parameters, and the builder
/// chain it came from.
#[derive(Debug, Clone)]
pub struct Routine {
    pub source: Builder,
    pub circuit: AnalogCircuit,
    pub params: Parameters,
}

impl Routine {
    pub fn register(&self) -> &Register {
        &self.circuit.register
    }

    pub fn sequence(&self) -> &Sequence {
        &self.circuit.sequence
    }

    pub fn circuit(&self) -> &AnalogCircuit {
        &self.circuit
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.circuit)?;
        writeln!(f, "---")?;
        write!(f, "args: [{}]", self.params.args_list.join(", "))?;
        if !self.params.static_params.is_empty() {
            write!(f, "\nstatic:")?;
            for (name, value) in &self.params.static_params {
                write!(f, " {name}={}", value)?;
            }
        }
        write!(f, "\nbatch entries: {}", self.params.batch_params.len())
    }
}
