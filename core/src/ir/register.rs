//! file: core/src/ir/register.rs
//! description: atom registers and their parallel tiling wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::scalar::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SiteFilling {
    #[default]
    Filled,
    Vacant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub position: (Scalar, Scalar),
    pub filling: SiteFilling,
}

/// A list of atom sites in the plane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtomArrangement {
    pub sites: Vec<Site>,
}

impl AtomArrangement {
    pub fn new() -> Self {
        AtomArrangement::default()
    }

    pub fn from_positions<X: Into<Scalar>, Y: Into<Scalar>>(
        positions: impl IntoIterator<Item = (X, Y)>,
    ) -> Self {
        let sites = positions
            .into_iter()
            .map(|(x, y)| Site {
                position: (x.into(), y.into()),
                filling: SiteFilling::Filled,
            })
            .collect();
        AtomArrangement { sites }
    }

    /// `count` atoms on a line, `spacing` apart.
    pub fn chain(count: usize, spacing: impl Into<Scalar>) -> Self {
        let spacing = spacing.into();
        AtomArrangement::from_positions(
            (0..count).map(|i| (Scalar::from(i) * spacing.clone(), Scalar::zero())),
        )
    }

    /// `side` x `side` square lattice with lattice constant `spacing`.
    pub fn square(side: usize, spacing: impl Into<Scalar>) -> Self {
        let spacing = spacing.into();
        AtomArrangement::from_positions((0..side).flat_map(|i| {
            let spacing = spacing.clone();
            (0..side).map(move |j| (Scalar::from(i) * spacing.clone(), Scalar::from(j) * spacing.clone()))
        }))
    }

    pub fn add_site(mut self, x: impl Into<Scalar>, y: impl Into<Scalar>, filling: SiteFilling) -> Self {
        self.sites.push(Site {
            position: (x.into(), y.into()),
            filling,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// A base register replicated across a hardware array, clusters
/// `cluster_spacing` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelRegister {
    pub register: AtomArrangement,
    pub cluster_spacing: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Register {
    Atoms(AtomArrangement),
    Parallel(ParallelRegister),
}

impl Register {
    /// Wrap in a parallel register. An already parallel register keeps its
    /// base arrangement and takes the new spacing.
    pub fn parallelize(self, cluster_spacing: Scalar) -> Register {
        let register = match self {
            Register::Atoms(atoms) => atoms,
            Register::Parallel(parallel) => parallel.register,
        };
        Register::Parallel(ParallelRegister {
            register,
            cluster_spacing,
        })
    }

    pub fn atoms(&self) -> &AtomArrangement {
        match self {
            Register::Atoms(atoms) => atoms,
            Register::Parallel(parallel) => &parallel.register,
        }
    }
}

impl From<AtomArrangement> for Register {
    fn from(atoms: AtomArrangement) -> Self {
        Register::Atoms(atoms)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms = self.atoms();
        match self {
            Register::Atoms(_) => write!(f, "register ({} sites)", atoms.len())?,
            Register::Parallel(p) => write!(
                f,
                "parallel register ({} sites, cluster spacing {})",
                atoms.len(),
                p.cluster_spacing
            )?,
        }
        for site in &atoms.sites {
            let mark = match site.filling {
                SiteFilling::Filled => "*",
                SiteFilling::Vacant => "o",
            };
            write!(f, "\n  {mark} ({}, {})", site.position.0, site.position.1)?;
        }
        Ok(())
    }
}
