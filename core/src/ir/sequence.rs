use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::{Field, SpatialModulation};
use super::pulse::{FieldName, Pulse};
use super::waveform::Waveform;

/// Atomic transition a drive addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coupling {
    Rydberg,
    Hyperfine,
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coupling::Rydberg => write!(f, "rydberg"),
            Coupling::Hyperfine => write!(f, "hyperfine"),
        }
    }
}

/// The full time program: one pulse per coupling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sequence {
    pub pulses: IndexMap<Coupling, Pulse>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    pub fn pulse(&self, coupling: Coupling) -> Option<&Pulse> {
        self.pulses.get(&coupling)
    }

    /// Look up the field for a (coupling, field name) pair.
    pub fn field(&self, coupling: Coupling, name: FieldName) -> Option<&Field> {
        self.pulse(coupling).and_then(|p| p.field(name))
    }

    /// Merge one drive under (coupling, field name), summing with any drive
    /// already present on the same spatial key.
    pub fn add_drive(
        self,
        coupling: Coupling,
        name: FieldName,
        modulation: SpatialModulation,
        waveform: Waveform,
    ) -> Sequence {
        self.add_field(coupling, name, Field::drive(modulation, waveform))
    }

    pub fn add_field(mut self, coupling: Coupling, name: FieldName, field: Field) -> Sequence {
        let slot = self.pulses.entry(coupling).or_default();
        let existing = std::mem::take(slot);
        *slot = existing.add_field(name, field);
        self
    }

    /// Iterate every drive as (coupling, field name, modulation, waveform).
    pub fn drives(&self) -> impl Iterator<Item = (Coupling, FieldName, &SpatialModulation, &Waveform)> {
        self.pulses.iter().flat_map(|(coupling, pulse)| {
            pulse.fields.iter().flat_map(move |(name, field)| {
                field
                    .drives()
                    .iter()
                    .map(move |(sm, wf)| (*coupling, *name, sm, wf))
            })
        })
    }
}
