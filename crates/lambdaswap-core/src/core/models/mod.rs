//! # Core Models Module
//!
//! Plain data structures describing a grand-canonical simulation cell.
//!
//! ## Key Components
//!
//! - [`atom`] - Interaction sites with their lambda-dependent van der Waals and Coulomb scaling
//! - [`molecule`] - Rigid-body state of a molecule
//! - [`component`] - Exchangeable species: rigid template, reservoir composition, blocked pockets
//! - [`simulation_box`] - Orthorhombic periodic cell
//! - [`system`] - Flat, component-major molecule storage with insert/delete/swap mutators
//!
//! ## Usage
//!
//! ```ignore
//! use lambdaswap::core::models::system::System;
//!
//! let mut system = System::new(cell, forcefield, components, 300.0, 1e5);
//! let (molecule, atoms) = system.components[0].random_molecule_in_box(0, &mut rng, &system.simulation_box);
//! system.insert_molecule(0, molecule, &atoms);
//! ```

pub mod atom;
pub mod component;
pub mod molecule;
pub mod simulation_box;
pub mod system;
