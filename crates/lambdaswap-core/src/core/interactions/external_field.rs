use super::EnergyContext;
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;
use serde::Deserialize;

/// Position-dependent potential acting on every adsorbate atom.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum ExternalField {
    /// Impenetrable walls normal to z. Interacting atoms outside
    /// `[lower, upper]` make a configuration infeasible.
    HardWalls { lower: f64, upper: f64 },
    /// Uniform gradient `strength * z` in K/Å, scaled like van der Waals terms.
    Linear { strength: f64 },
}

impl ExternalField {
    /// Energy of one atom, `None` when the atom sits where it may not.
    fn atom_energy(&self, atom: &Atom) -> Option<f64> {
        match *self {
            Self::HardWalls { lower, upper } => {
                let z = atom.position.z;
                if atom.scaling_vdw > 0.0 && (z < lower || z > upper) {
                    None
                } else {
                    Some(0.0)
                }
            }
            Self::Linear { strength } => Some(strength * atom.position.z * atom.scaling_vdw),
        }
    }
}

/// Field energy of every adsorbate atom; atoms outside hard walls count as zero.
pub fn total_energy(ctx: &EnergyContext<'_>) -> f64 {
    ctx.external_field.map_or(0.0, |field| {
        ctx.molecule_atoms
            .iter()
            .map(|atom| field.atom_energy(atom).unwrap_or(0.0))
            .sum()
    })
}

pub fn energy_difference(
    ctx: &EnergyContext<'_>,
    trial: &[Atom],
    reference: &[Atom],
) -> Option<RunningEnergy> {
    let Some(field) = ctx.external_field else {
        return Some(RunningEnergy::default());
    };

    let mut energy = 0.0;
    for atom in trial {
        energy += field.atom_energy(atom)?;
    }
    for atom in reference {
        energy -= field.atom_energy(atom).unwrap_or(0.0);
    }
    Some(RunningEnergy::external_field(energy, 0.0))
}
