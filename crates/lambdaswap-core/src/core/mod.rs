//! # Core Module
//!
//! The stateless foundation of the library: data models, force field, and the
//! reference energy kernels.
//!
//! ## Architecture
//!
//! - **System Representation** ([`models`]) - Atoms, molecules, components and the simulation cell
//! - **Energy Model** ([`forcefield`]) - Parameters, pair potentials and the
//!   [`forcefield::term::RunningEnergy`] decomposition
//! - **Energy Kernels** ([`interactions`]) - External field, framework, intermolecular, Ewald
//!   and tail-correction energy differences behind the
//!   [`interactions::EnergyKernels`] trait
//! - **Utilities** ([`utils`]) - Random-number seam and rigid-body geometry

pub mod forcefield;
pub mod interactions;
pub mod models;
pub mod utils;
