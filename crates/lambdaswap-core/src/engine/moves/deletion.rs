use super::swap_cfcmc::SwapContext;
use super::{MoveOutcome, Rejection, TransitionProbabilities};
use crate::core::interactions::{EnergyKernels, FourierBase};
use crate::core::utils::random::RandomSource;
use crate::engine::pipeline;
use crate::engine::statistics::{SwapBranch, TimingBucket};
use crate::engine::transaction::scoped;
use tracing::debug;

/// Decouples the current fractional molecule and hands the fractional role
/// to a random integer molecule at `new_bin`.
///
/// Stage 1 switches the fractional molecule fully off; stage 2 scales the
/// candidate down to the new lambda. On acceptance the candidate moves into
/// the fractional slot and the decoupled molecule is removed.
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
    let old_n = system.number_of_integer_molecules(component);
    if old_n == 0 {
        return MoveOutcome::rejected(TransitionProbabilities::REJECTED);
    }
    let slot = fractional.slot(component);
    let new_lambda = move_state.lambda.lambda_of_bin(new_bin);

    move_state.statistics.record_attempt(SwapBranch::Deletion);

    let candidate = fractional.random_integer_molecule(random, system, component);

    let result = scoped(system, &[(component, slot), (component, candidate)], |system, snapshot| {
        let old_fractional = snapshot.atoms(0);
        let old_candidate = snapshot.atoms(1);

        for atom in system.molecule_atoms_mut(component, slot) {
            atom.set_scaling_fully_off();
            atom.group_id = 0;
        }
        let vanished = system.molecule_atoms(component, slot).to_vec();
        if system.inside_blocked_pockets(component, &vanished) {
            return Err(Rejection::REJECTED);
        }
        let stage_one = pipeline::evaluate(
            kernels,
            system,
            FourierBase::Total,
            &vanished,
            old_fractional,
            &mut move_state.cpu_time,
            TimingBucket::Deletion,
        )?;

        let group_id = old_fractional.first().map_or(0, |atom| atom.group_id);
        for atom in system.molecule_atoms_mut(component, candidate) {
            atom.group_id = group_id;
            atom.set_scaling(new_lambda);
        }
        let shrunk = system.molecule_atoms(component, candidate).to_vec();
        let stage_two = pipeline::evaluate(
            kernels,
            system,
            FourierBase::Stored,
            &shrunk,
            old_candidate,
            &mut move_state.cpu_time,
            TimingBucket::Deletion,
        )?;

        move_state.statistics.record_constructed(SwapBranch::Deletion);

        let energy = stage_one + stage_two;
        let pre_factor = old_n as f64 / super::reservoir_factor(system, component);
        let bias = move_state.lambda.bias_difference(new_bin, old_bin);
        let acceptance = pre_factor * (-system.beta * energy.potential_energy() + bias).exp();
        let probabilities = TransitionProbabilities::deletion(acceptance);

        if !tmmc.allows(old_n - 1) {
            debug!(component, macrostate = old_n - 1, "deletion vetoed by macrostate bounds");
            return Err(Rejection::with(probabilities));
        }

        if random.uniform() < tmmc.bias_factor(old_n - 1, old_n) * acceptance {
            kernels.accept_ewald_move(system.fourier_mut());
            move_state.lambda.set_current_bin(new_bin);
            fractional.finish_deletion(system, component, candidate);
            move_state.statistics.record_accepted(SwapBranch::Deletion);
            debug!(component, molecules = old_n - 1, acceptance, "deletion accepted");
            Ok(MoveOutcome::accepted(energy, probabilities))
        } else {
            Err(Rejection::with(probabilities))
        }
    });

    result.unwrap_or_else(Rejection::into_outcome)
}
