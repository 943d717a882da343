//! # Workflows Module
//!
//! High-level entry points that drive the swap move over a whole simulation.
//!
//! - **Simulation Workflow** ([`simulate`]) - seeded equilibration and
//!   production cycles, Wang-Landau adaptation of the lambda bias, TMMC
//!   bookkeeping, and independent replicas (run concurrently with the
//!   `parallel` feature).

pub mod simulate;
