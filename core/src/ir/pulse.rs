use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::Field;

/// Physical quantity driven by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldName {
    Detuning,
    RabiAmplitude,
    RabiPhase,
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldName::Detuning => "detuning",
            FieldName::RabiAmplitude => "rabi.amplitude",
            FieldName::RabiPhase => "rabi.phase",
        };
        write!(f, "{name}")
    }
}

/// Fields active under one coupling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pulse {
    pub fields: IndexMap<FieldName, Field>,
}

impl Pulse {
    pub fn new() -> Self {
        Pulse::default()
    }

    pub fn field(&self, name: FieldName) -> Option<&Field> {
        self.fields.get(&name)
    }

    /// Merge `field` into the entry for `name`, summing shared drives.
    pub fn add_field(mut self, name: FieldName, field: Field) -> Pulse {
        let slot = self.fields.entry(name).or_default();
        let existing = std::mem::take(slot);
        *slot = existing.add(field);
        self
    }
}
