use std::fmt;

use serde::{Deserialize, Serialize};

use super::register::Register;
use super::sequence::Sequence;

/// The complete lowered program: where the atoms are and how they are driven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogCircuit {
    pub register: Register,
    pub sequence: Sequence,
}

impl AnalogCircuit {
    pub fn new(register: Register, sequence: Sequence) -> Self {
        AnalogCircuit { register, sequence }
    }
}

impl fmt::Display for AnalogCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.register)?;
        write!(f, "sequence")?;
        for (coupling, name, modulation, waveform) in self.sequence.drives() {
            write!(f, "\n  {coupling}.{name} [{modulation}] => {waveform}")?;
        }
        Ok(())
    }
}
