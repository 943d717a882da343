use super::{EnergyContext, pairwise_difference};
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;

/// Energy of the trial atoms against the framework minus that of the
/// reference atoms.
pub fn energy_difference(
    ctx: &EnergyContext<'_>,
    trial: &[Atom],
    reference: &[Atom],
) -> Option<RunningEnergy> {
    if ctx.framework_atoms.is_empty() {
        return Some(RunningEnergy::default());
    }
    let (vdw, charge) = pairwise_difference(ctx, ctx.framework_atoms, false, trial, reference)?;
    Some(RunningEnergy::framework_molecule(vdw, charge))
}
