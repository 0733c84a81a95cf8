//! file: core/src/ir/field.rs
//! description: spatial modulations and the `Field` drive map.
//!
//! A `Field` maps a spatial modulation (which sites a drive covers) to the
//! waveform driving them. Adding two fields sums the waveforms of shared
//! keys instead of overwriting them.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::scalar::Scalar;
use super::waveform::Waveform;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialModulation {
    /// Every site is driven with weight 1.
    Uniform,
    /// Per-site weights supplied at run time under `name`.
    RunTimeVector { name: String },
    /// Explicit per-site weights keyed by site index.
    ScaledLocations { weights: BTreeMap<usize, Scalar> },
}

impl SpatialModulation {
    pub fn locations(weights: impl IntoIterator<Item = (usize, Scalar)>) -> Self {
        SpatialModulation::ScaledLocations {
            weights: weights.into_iter().collect(),
        }
    }
}

impl fmt::Display for SpatialModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialModulation::Uniform => write!(f, "uniform"),
            SpatialModulation::RunTimeVector { name } => write!(f, "vector {name}"),
            SpatialModulation::ScaledLocations { weights } => {
                write!(f, "locations {{")?;
                for (i, (site, weight)) in weights.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{site}: {weight}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(with = "drive_pairs")]
    drives: IndexMap<SpatialModulation, Waveform>,
}

impl Field {
    pub fn new() -> Self {
        Field::default()
    }

    /// A field holding a single drive.
    pub fn drive(modulation: SpatialModulation, waveform: Waveform) -> Self {
        let mut drives = IndexMap::new();
        drives.insert(modulation, waveform);
        Field { drives }
    }

    pub fn drives(&self) -> &IndexMap<SpatialModulation, Waveform> {
        &self.drives
    }

    pub fn get(&self, modulation: &SpatialModulation) -> Option<&Waveform> {
        self.drives.get(modulation)
    }

    pub fn len(&self) -> usize {
        self.drives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty()
    }

    /// Merge `other` into `self`: shared keys sum via `Waveform::add`,
    /// new keys are appended in encounter order.
    pub fn add(mut self, other: Field) -> Field {
        for (modulation, waveform) in other.drives {
            match self.drives.entry(modulation) {
                Entry::Occupied(mut slot) => {
                    let summed = slot.get().clone().add(waveform);
                    slot.insert(summed);
                }
                Entry::Vacant(slot) => {
                    slot.insert(waveform);
                }
            }
        }
        self
    }
}

impl FromIterator<(SpatialModulation, Waveform)> for Field {
    fn from_iter<I: IntoIterator<Item = (SpatialModulation, Waveform)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Field::new(), |field, (sm, wf)| field.add(Field::drive(sm, wf)))
    }
}

// JSON objects need string keys, so drives travel as an ordered list of pairs.
mod drive_pairs {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Drive {
        modulation: SpatialModulation,
        waveform: Waveform,
    }

    pub fn serialize<S: Serializer>(
        drives: &IndexMap<SpatialModulation, Waveform>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<Drive> = drives
            .iter()
            .map(|(modulation, waveform)| Drive {
                modulation: modulation.clone(),
                waveform: waveform.clone(),
            })
            .collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<SpatialModulation, Waveform>, D::Error> {
        let pairs = Vec::<Drive>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|d| (d.modulation, d.waveform)).collect())
    }
}
