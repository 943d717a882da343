//! # Engine Module
//!
//! The Continuous Fractional Component Monte Carlo swap move and the state it
//! operates on.
//!
//! ## Overview
//!
//! Every component carries one fractional molecule whose coupling `lambda` is
//! discretized into bins. A swap move perturbs the bin; running off either end
//! of the histogram turns the move into an insertion or a deletion. The pieces:
//!
//! - **Lambda Histogram** ([`lambda`]) - bins, bias weights and the
//!   signed-bin proposal that selects the branch
//! - **Energy Delta Pipeline** ([`pipeline`]) - the five evaluators in fixed
//!   order, stopping at the first overlap
//! - **TMMC Gate** ([`tmmc`]) - macrostate bounds, bias factor and the
//!   collection matrix
//! - **Fractional-Molecule Index** ([`fractional`]) - keeps the fractional
//!   molecule at a fixed slot across insertions and deletions
//! - **Move Dispatcher** ([`moves::swap_cfcmc`]) - runs a branch inside a
//!   snapshot [`transaction`] and applies the acceptance rule
//!
//! [`state`] bundles all of the above with the [`System`](crate::core::models::system::System),
//! [`statistics`] keeps the move counters and CPU time, and [`config`],
//! [`error`] and [`progress`] are shared with the workflows.

pub mod config;
pub mod error;
pub mod fractional;
pub mod lambda;
pub mod moves;
pub mod pipeline;
pub mod progress;
pub mod state;
pub mod statistics;
pub mod tmmc;
pub(crate) mod transaction;

#[cfg(test)]
pub(crate) mod test_support;
