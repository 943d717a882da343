use super::EnergyContext;
use crate::core::forcefield::params::ForceField;
use crate::core::forcefield::potentials::lennard_jones_tail_integral;
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;
use std::f64::consts::PI;

#[inline]
fn pair_tail(forcefield: &ForceField, a: &Atom, b: &Atom) -> f64 {
    let (epsilon, sigma) = forcefield.pair(a.atom_type, b.atom_type);
    a.scaling_vdw * b.scaling_vdw * lennard_jones_tail_integral(epsilon, sigma, forcefield.cutoff_vdw)
}

/// Tail energy attributable to `atoms` given the rest of the system.
fn tail_energy_of(ctx: &EnergyContext<'_>, atoms: &[Atom]) -> f64 {
    let ff = ctx.forcefield;
    let mut energy = 0.0;
    for a in atoms {
        for b in ctx.molecule_atoms.iter().filter(|b| !a.same_molecule(b)) {
            energy += 2.0 * pair_tail(ff, a, b);
        }
        for f in ctx.framework_atoms {
            energy += 2.0 * pair_tail(ff, a, f);
        }
        for b in atoms {
            energy += pair_tail(ff, a, b);
        }
    }
    2.0 * PI / ctx.simulation_box.volume() * energy
}

/// Tail energy of all adsorbate atoms, including their interaction with the framework.
pub fn total_energy(ctx: &EnergyContext<'_>) -> f64 {
    if !ctx.forcefield.use_tail_corrections {
        return 0.0;
    }
    let ff = ctx.forcefield;
    let mut energy = 0.0;
    for a in ctx.molecule_atoms {
        for b in ctx.molecule_atoms {
            energy += pair_tail(ff, a, b);
        }
        for f in ctx.framework_atoms {
            energy += 2.0 * pair_tail(ff, a, f);
        }
    }
    2.0 * PI / ctx.simulation_box.volume() * energy
}

pub fn energy_difference(ctx: &EnergyContext<'_>, trial: &[Atom], reference: &[Atom]) -> RunningEnergy {
    if !ctx.forcefield.use_tail_corrections {
        return RunningEnergy::default();
    }
    RunningEnergy::tail_correction(tail_energy_of(ctx, trial) - tail_energy_of(ctx, reference))
}
