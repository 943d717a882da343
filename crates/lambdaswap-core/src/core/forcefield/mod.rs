//! # Force Field Module
//!
//! Parameters and pair potentials behind the reference energy kernels.
//!
//! ## Overview
//!
//! - **Parameters** ([`params`]) - Pseudo-atom table, cutoffs, overlap criterion and Ewald
//!   settings, loaded from TOML
//! - **Potentials** ([`potentials`]) - Soft-core Lennard-Jones, screened Coulomb and the
//!   analytic dispersion tail integral
//! - **Energy terms** ([`term`]) - [`term::RunningEnergy`], the additive decomposition every
//!   kernel returns
//!
//! All energies are expressed in Kelvin (energy divided by Boltzmann's constant).

pub mod params;
pub(crate) mod potentials;
pub mod term;
