use super::{EnergyContext, pairwise_difference};
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;

/// Energy of the trial atoms against every other adsorbate molecule minus
/// that of the reference atoms. Atoms sharing the trial molecule's identity
/// are skipped, so the live copy of the molecule never interacts with itself.
pub fn energy_difference(
    ctx: &EnergyContext<'_>,
    trial: &[Atom],
    reference: &[Atom],
) -> Option<RunningEnergy> {
    let (vdw, charge) = pairwise_difference(ctx, ctx.molecule_atoms, true, trial, reference)?;
    Some(RunningEnergy::molecule_molecule(vdw, charge))
}
