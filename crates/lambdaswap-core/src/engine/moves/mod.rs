//! Monte Carlo moves operating on a [`SimulationState`](super::state::SimulationState).
//!
//! [`swap_cfcmc`] is the entry point; [`insertion`], [`deletion`] and
//! [`lambda_change`] hold one branch each.

pub(crate) mod deletion;
pub(crate) mod insertion;
pub(crate) mod lambda_change;
pub mod swap_cfcmc;

use super::pipeline::Overlap;
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::system::System;

/// Probability mass a move assigned to `N - 1`, `N` and `N + 1`, in that
/// order. Only used to accumulate the TMMC collection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionProbabilities {
    pub deletion: f64,
    pub unchanged: f64,
    pub insertion: f64,
}

impl TransitionProbabilities {
    /// A move that never got past the administrative checks.
    pub const SKIPPED: Self = Self {
        deletion: 0.0,
        unchanged: 0.0,
        insertion: 0.0,
    };

    /// A move that left the molecule count where it was.
    pub const REJECTED: Self = Self {
        deletion: 0.0,
        unchanged: 1.0,
        insertion: 0.0,
    };

    pub fn insertion(acceptance: f64) -> Self {
        Self {
            deletion: 0.0,
            unchanged: 1.0 - acceptance,
            insertion: acceptance,
        }
    }

    pub fn deletion(acceptance: f64) -> Self {
        Self {
            deletion: acceptance,
            unchanged: 1.0 - acceptance,
            insertion: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deletion == 0.0 && self.unchanged == 0.0 && self.insertion == 0.0
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.deletion, self.unchanged, self.insertion]
    }
}

/// Result of one move attempt.
///
/// `energy` is the accepted energy change and is `None` for every kind of
/// rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub energy: Option<RunningEnergy>,
    pub probabilities: TransitionProbabilities,
}

impl MoveOutcome {
    pub fn accepted(energy: RunningEnergy, probabilities: TransitionProbabilities) -> Self {
        Self {
            energy: Some(energy),
            probabilities,
        }
    }

    pub fn rejected(probabilities: TransitionProbabilities) -> Self {
        Self {
            energy: None,
            probabilities,
        }
    }

    pub fn skipped() -> Self {
        Self::rejected(TransitionProbabilities::SKIPPED)
    }

    pub fn is_accepted(&self) -> bool {
        self.energy.is_some()
    }
}

/// Why a branch gave up after it started mutating the system. Carries the
/// probability vector to report once the snapshot has been restored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rejection {
    pub probabilities: TransitionProbabilities,
}

impl Rejection {
    pub const REJECTED: Self = Self {
        probabilities: TransitionProbabilities::REJECTED,
    };

    pub fn with(probabilities: TransitionProbabilities) -> Self {
        Self { probabilities }
    }

    pub fn into_outcome(self) -> MoveOutcome {
        MoveOutcome::rejected(self.probabilities)
    }
}

impl From<Overlap> for Rejection {
    fn from(_: Overlap) -> Self {
        Self::REJECTED
    }
}

/// `beta * y * f * V`, the dimensionless reservoir term shared by the
/// insertion and deletion acceptance rules.
pub(crate) fn reservoir_factor(system: &System, component: usize) -> f64 {
    let species = &system.components[component];
    system.beta * species.mol_fraction * species.fugacity(system.pressure) * system.simulation_box.volume()
}
