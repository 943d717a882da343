use super::swap_cfcmc::SwapContext;
use super::{MoveOutcome, Rejection, TransitionProbabilities};
use crate::core::interactions::{EnergyKernels, FourierBase};
use crate::core::utils::random::RandomSource;
use crate::engine::pipeline;
use crate::engine::statistics::{SwapBranch, TimingBucket};
use crate::engine::transaction::scoped;
use tracing::debug;

/// Completes the current fractional molecule and grows a new one at
/// `new_bin`.
///
/// Stage 1 switches the fractional molecule fully on; stage 2 adds a random
/// trial molecule at the new lambda. On acceptance the trial is appended to
/// the component and swapped into the fractional slot.
pub(crate) fn attempt<R, K>(swap: SwapContext<'_>, random: &mut R, kernels: &K, new_bin: usize) -> MoveOutcome
where
    R: RandomSource + ?Sized,
    K: EnergyKernels + ?Sized,
{
    let SwapContext {
        system,
        move_state,
        tmmc,
        fractional,
        component,
        old_bin,
    } = swap;
    let slot = fractional.slot(component);
    let old_n = system.number_of_integer_molecules(component);
    let new_lambda = move_state.lambda.lambda_of_bin(new_bin);

    move_state.statistics.record_attempt(SwapBranch::Insertion);

    let result = scoped(system, &[(component, slot)], |system, snapshot| {
        let old_fractional = snapshot.atoms(0);

        for atom in system.molecule_atoms_mut(component, slot) {
            atom.set_scaling_to_integer();
        }
        let promoted = system.molecule_atoms(component, slot).to_vec();
        if system.inside_blocked_pockets(component, &promoted) {
            return Err(Rejection::REJECTED);
        }
        let stage_one = pipeline::evaluate(
            kernels,
            system,
            FourierBase::Total,
            &promoted,
            old_fractional,
            &mut move_state.cpu_time,
            TimingBucket::Insertion,
        )?;

        let (molecule, mut trial) =
            system.components[component].random_molecule_in_box(component as u8, random, &system.simulation_box);
        let molecule_id = system.number_of_molecules(component) as u32;
        let group_id = old_fractional.first().map_or(0, |atom| atom.group_id);
        for atom in &mut trial {
            atom.molecule_id = molecule_id;
            atom.component_id = component as u8;
            atom.group_id = group_id;
            atom.set_scaling(new_lambda);
        }
        if system.inside_blocked_pockets(component, &trial) {
            return Err(Rejection::REJECTED);
        }
        let stage_two = pipeline::evaluate(
            kernels,
            system,
            FourierBase::Stored,
            &trial,
            &[],
            &mut move_state.cpu_time,
            TimingBucket::Insertion,
        )?;

        move_state.statistics.record_constructed(SwapBranch::Insertion);

        let energy = stage_one + stage_two;
        let pre_factor = super::reservoir_factor(system, component) / (1 + old_n) as f64;
        let bias = move_state.lambda.bias_difference(new_bin, old_bin);
        let acceptance = pre_factor * (-system.beta * energy.potential_energy() + bias).exp();
        let probabilities = TransitionProbabilities::insertion(acceptance);

        if !tmmc.allows(old_n + 1) {
            debug!(component, macrostate = old_n + 1, "insertion vetoed by macrostate bounds");
            return Err(Rejection::with(probabilities));
        }

        if random.uniform() < tmmc.bias_factor(old_n + 1, old_n) * acceptance {
            kernels.accept_ewald_move(system.fourier_mut());
            move_state.lambda.set_current_bin(new_bin);
            system.insert_molecule(component, molecule, &trial);
            fractional.restore_after_insertion(system, component);
            move_state.statistics.record_accepted(SwapBranch::Insertion);
            debug!(component, molecules = old_n + 1, acceptance, "insertion accepted");
            Ok(MoveOutcome::accepted(energy, probabilities))
        } else {
            Err(Rejection::REJECTED)
        }
    });

    result.unwrap_or_else(Rejection::into_outcome)
}
