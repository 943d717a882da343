//! # lambdaswap Core Library
//!
//! Continuous Fractional Component Monte Carlo (CFCMC) swap moves for grand-canonical
//! molecular simulation, with an optional Transition-Matrix Monte Carlo (TMMC) macrostate bias.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`System`, `Component`, `Atom`),
//!   the force field, and the five reference energy kernels.
//!
//! - **[`engine`]: The Logic Core.** The stateful move machinery: the lambda histogram,
//!   the TMMC gate, the staged energy-delta pipeline, snapshot/rollback transactions,
//!   fractional-molecule bookkeeping, and the swap move dispatcher itself.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a complete
//!   grand-canonical run that repeatedly applies the swap move and collects averages.

pub mod core;
pub mod engine;
pub mod workflows;
