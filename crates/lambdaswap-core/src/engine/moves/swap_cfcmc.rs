use super::{MoveOutcome, deletion, insertion, lambda_change};
use crate::core::interactions::EnergyKernels;
use crate::core::models::system::System;
use crate::core::utils::random::RandomSource;
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use crate::engine::fractional::FractionalMoleculeIndex;
use crate::engine::lambda::BinSelection;
use crate::engine::state::{ComponentMoveState, SimulationState};
use crate::engine::tmmc::Tmmc;
use tracing::{instrument, trace};

/// The parts of a [`SimulationState`] one branch works on, borrowed apart.
pub(crate) struct SwapContext<'a> {
    pub system: &'a mut System,
    pub move_state: &'a mut ComponentMoveState,
    pub tmmc: &'a Tmmc,
    pub fractional: &'a FractionalMoleculeIndex,
    pub component: usize,
    pub old_bin: usize,
}

/// Attempts one CFCMC swap move for `component`.
///
/// A single deviate picks a bin within `max_bin_change` of the current one.
/// Running off the top of the histogram attempts an insertion, off the
/// bottom a deletion; anything else is a lambda change of the fractional
/// molecule. Disabled insertions and deletions are skipped without being
/// counted.
///
/// # Arguments
///
/// * `random` - Source of every deviate the move draws.
/// * `state` - The system plus per-component move state, TMMC and the
///   fractional slot index.
/// * `kernels` - The five energy-difference evaluators.
/// * `component` - Component whose fractional molecule is moved.
/// * `insertion_disabled`, `deletion_disabled` - Administrative switches.
///
/// # Return
///
/// The accepted energy change (if any) together with the transition
/// probabilities for the TMMC collection matrix. Rejections are not errors.
///
/// # Errors
///
/// Returns [`EngineError::InvalidComponent`],
/// [`EngineError::MissingFractionalMolecule`], or [`EngineError::Config`] when
/// `max_bin_change` is not smaller than the number of bins, without touching
/// the state.
#[instrument(skip_all, name = "swap_move_cfcmc", fields(component = component))]
pub fn swap_move_cfcmc<R, K>(
    random: &mut R,
    state: &mut SimulationState,
    kernels: &K,
    component: usize,
    insertion_disabled: bool,
    deletion_disabled: bool,
) -> Result<MoveOutcome, EngineError>
where
    R: RandomSource + ?Sized,
    K: EnergyKernels + ?Sized,
{
    let available = state.components.len().min(state.system.number_of_components());
    if component >= available {
        return Err(EngineError::InvalidComponent { component, available });
    }
    if state.system.number_of_fractional_molecules(component) == 0 {
        return Err(EngineError::MissingFractionalMolecule { component });
    }

    let bins = state.components[component].lambda.number_of_sample_points();
    let max_change = state.components[component].max_bin_change;
    if max_change >= bins {
        return Err(EngineError::Config {
            source: ConfigError::InvalidParameter {
                parameter: "max_bin_change",
                reason: format!("{max_change} must be smaller than the number of bins ({bins})"),
            },
        });
    }

    let SimulationState {
        system,
        components,
        tmmc,
        fractional,
    } = state;
    let move_state = &mut components[component];
    let old_bin = move_state.lambda.current_bin();
    let selection = move_state.lambda.propose(random, move_state.max_bin_change);
    trace!(?selection, old_bin, "selected swap branch");

    let swap = SwapContext {
        system,
        move_state,
        tmmc,
        fractional,
        component,
        old_bin,
    };
    let outcome = match selection {
        BinSelection::Insertion { .. } if insertion_disabled => MoveOutcome::skipped(),
        BinSelection::Deletion { .. } if deletion_disabled => MoveOutcome::skipped(),
        BinSelection::Insertion { bin } => insertion::attempt(swap, random, kernels, bin),
        BinSelection::Deletion { bin } => deletion::attempt(swap, random, kernels, bin),
        BinSelection::LambdaChange { bin } => {
            lambda_change::attempt(swap, random, kernels, bin, insertion_disabled || deletion_disabled)
        }
    };
    Ok(outcome)
}
