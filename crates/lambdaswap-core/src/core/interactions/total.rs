use super::ewald::{self, EwaldFourier};
use super::{EnergyContext, external_field, pair_energy_with, tail};
use crate::core::forcefield::term::RunningEnergy;

/// Full potential energy of the adsorbate phase, computed from scratch.
///
/// Used to seed running averages and to check that accumulated move deltas
/// do not drift from the actual configuration.
pub fn compute_total_energy(ctx: &EnergyContext<'_>, fourier: &EwaldFourier) -> RunningEnergy {
    let ff = ctx.forcefield;
    let atoms = ctx.molecule_atoms;
    let mut energy = RunningEnergy::external_field(external_field::total_energy(ctx), 0.0);

    for (i, atom) in atoms.iter().enumerate() {
        if let Some((vdw, charge)) =
            pair_energy_with(ff, ctx.simulation_box, atom, ctx.framework_atoms, false, false)
        {
            energy += RunningEnergy::framework_molecule(vdw, charge);
        }
        if let Some((vdw, charge)) =
            pair_energy_with(ff, ctx.simulation_box, atom, &atoms[i + 1..], true, false)
        {
            energy += RunningEnergy::molecule_molecule(vdw, charge);
        }
    }

    if let Some(alpha) = ff.ewald_alpha() {
        energy.ewald_fourier = fourier.energy();
        energy.ewald_self = ewald::self_energy(alpha, atoms);
        energy.ewald_exclusion = ewald::exclusion_energy(alpha, ctx.simulation_box, atoms);
    }
    energy.tail = tail::total_energy(ctx);
    energy
}
