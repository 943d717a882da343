use super::swap_cfcmc::SwapContext;
use super::{MoveOutcome, Rejection, TransitionProbabilities};
use crate::core::interactions::{EnergyKernels, FourierBase};
use crate::core::models::atom::Atom;
use crate::core::utils::random::RandomSource;
use crate::engine::pipeline;
use crate::engine::statistics::{SwapBranch, TimingBucket};
use crate::engine::transaction::scoped;

/// Moves the fractional molecule to `new_bin` with a plain Metropolis test.
/// `widom` books the CPU time in the Widom bucket.
pub(crate) fn attempt<R, K>(
    swap: SwapContext<'_>,
    random: &mut R,
    kernels: &K,
    new_bin: usize,
    widom: bool,
) -> MoveOutcome
where
    R: RandomSource + ?Sized,
    K: EnergyKernels + ?Sized,
{
    let SwapContext {
        system,
        move_state,
        fractional,
        component,
        old_bin,
        ..
    } = swap;
    let slot = fractional.slot(component);
    let new_lambda = move_state.lambda.lambda_of_bin(new_bin);
    let bucket = if widom { TimingBucket::Widom } else { TimingBucket::LambdaChange };

    move_state.statistics.record_attempt(SwapBranch::LambdaChange);

    let result = scoped(system, &[(component, slot)], |system, snapshot| {
        let current = snapshot.atoms(0);
        let trial: Vec<Atom> = current
            .iter()
            .map(|atom| {
                let mut atom = *atom;
                atom.set_scaling(new_lambda);
                atom
            })
            .collect();
        if system.inside_blocked_pockets(component, &trial) {
            return Err(Rejection::REJECTED);
        }

        let energy = pipeline::evaluate(
            kernels,
            system,
            FourierBase::Total,
            &trial,
            current,
            &mut move_state.cpu_time,
            bucket,
        )?;

        move_state.statistics.record_constructed(SwapBranch::LambdaChange);

        let bias = move_state.lambda.bias_difference(new_bin, old_bin);
        if random.uniform() < (-system.beta * energy.potential_energy() + bias).exp() {
            kernels.accept_ewald_move(system.fourier_mut());
            move_state.statistics.record_accepted(SwapBranch::LambdaChange);
            system.molecule_atoms_mut(component, slot).copy_from_slice(&trial);
            move_state.lambda.set_current_bin(new_bin);
            Ok(MoveOutcome::accepted(energy, TransitionProbabilities::REJECTED))
        } else {
            Err(Rejection::REJECTED)
        }
    });

    result.unwrap_or_else(Rejection::into_outcome)
}
