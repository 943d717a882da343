//! # Interactions Module
//!
//! Reference implementations of the five energy-difference kernels consumed by the
//! swap move, behind the [`EnergyKernels`] seam.
//!
//! ## Contract
//!
//! Every kernel receives a trial and a reference atom set describing the same molecule
//! (or an empty reference for a newly created molecule) and returns `trial - reference`.
//! The first three kernels return `None` when the trial configuration is infeasible:
//!
//! - [`external_field`] - position-dependent external potential, hard walls veto
//! - [`framework`] - trial atoms against the rigid framework
//! - [`intermolecular`] - trial atoms against all other adsorbate molecules
//!
//! The last two are total:
//!
//! - [`ewald`] - reciprocal-space energy plus self and exclusion corrections, staged
//!   into the `stored` structure factors until [`EnergyKernels::accept_ewald_move`]
//! - [`tail`] - analytic dispersion correction beyond the cutoff

pub mod ewald;
pub mod external_field;
pub mod framework;
pub mod intermolecular;
pub mod tail;
pub mod total;

use crate::core::forcefield::params::ForceField;
use crate::core::forcefield::potentials::{coulomb_real_space, soft_core_lennard_jones};
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;
use crate::core::models::simulation_box::SimulationBox;
use ewald::EwaldFourier;
use external_field::ExternalField;

/// Read-only view of everything a kernel may look at.
#[derive(Debug, Clone, Copy)]
pub struct EnergyContext<'a> {
    pub forcefield: &'a ForceField,
    pub simulation_box: &'a SimulationBox,
    pub framework_atoms: &'a [Atom],
    pub molecule_atoms: &'a [Atom],
    pub external_field: Option<&'a ExternalField>,
}

/// Which structure-factor vector an Ewald difference starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourierBase {
    /// The committed state; used by the first stage of a move.
    Total,
    /// The output of the previous stage of the same move.
    Stored,
}

pub trait EnergyKernels {
    fn external_field_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy>;

    fn framework_molecule_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy>;

    fn intermolecular_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy>;

    fn ewald_fourier_difference(
        &self,
        ctx: &EnergyContext<'_>,
        fourier: &mut EwaldFourier,
        base: FourierBase,
        trial: &[Atom],
        reference: &[Atom],
    ) -> RunningEnergy;

    fn tail_correction_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> RunningEnergy;

    /// Reconciles the staged (`stored`) reciprocal-space state into `total`.
    fn accept_ewald_move(&self, fourier: &mut EwaldFourier);
}

/// The kernels shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interactions;

impl EnergyKernels for Interactions {
    fn external_field_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy> {
        external_field::energy_difference(ctx, trial, reference)
    }

    fn framework_molecule_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy> {
        framework::energy_difference(ctx, trial, reference)
    }

    fn intermolecular_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> Option<RunningEnergy> {
        intermolecular::energy_difference(ctx, trial, reference)
    }

    fn ewald_fourier_difference(
        &self,
        ctx: &EnergyContext<'_>,
        fourier: &mut EwaldFourier,
        base: FourierBase,
        trial: &[Atom],
        reference: &[Atom],
    ) -> RunningEnergy {
        ewald::energy_difference(ctx, fourier, base, trial, reference)
    }

    fn tail_correction_difference(
        &self,
        ctx: &EnergyContext<'_>,
        trial: &[Atom],
        reference: &[Atom],
    ) -> RunningEnergy {
        tail::energy_difference(ctx, trial, reference)
    }

    fn accept_ewald_move(&self, fourier: &mut EwaldFourier) {
        fourier.accept();
    }
}

/// Van der Waals and real-space charge energy of `atom` against `others`.
///
/// Returns `None` as soon as a single van der Waals pair exceeds the overlap
/// criterion while `check_overlap` is set. Atoms of the same molecule as
/// `atom` are skipped when `skip_same_molecule` is set.
pub(crate) fn pair_energy_with(
    forcefield: &ForceField,
    simulation_box: &SimulationBox,
    atom: &Atom,
    others: &[Atom],
    skip_same_molecule: bool,
    check_overlap: bool,
) -> Option<(f64, f64)> {
    let cutoff_vdw_sq = forcefield.cutoff_vdw * forcefield.cutoff_vdw;
    let cutoff_charge_sq = forcefield.cutoff_charge * forcefield.cutoff_charge;
    let alpha = forcefield.ewald_alpha();
    let charge = atom.scaled_charge();

    let mut vdw = 0.0;
    let mut coulomb = 0.0;
    for other in others {
        if skip_same_molecule && atom.same_molecule(other) {
            continue;
        }
        let dist_sq = simulation_box.distance_squared(&atom.position, &other.position);
        if dist_sq < cutoff_vdw_sq {
            let (epsilon, sigma) = forcefield.pair(atom.atom_type, other.atom_type);
            let energy = soft_core_lennard_jones(
                dist_sq,
                epsilon,
                sigma,
                atom.scaling_vdw * other.scaling_vdw,
            );
            if check_overlap && energy > forcefield.overlap_criterion {
                return None;
            }
            vdw += energy;
        }
        if dist_sq < cutoff_charge_sq {
            coulomb += coulomb_real_space(dist_sq.sqrt(), charge, other.scaled_charge(), alpha);
        }
    }
    Some((vdw, coulomb))
}

/// Sums [`pair_energy_with`] over `trial` (overlap checked) minus
/// `reference` (unchecked).
pub(crate) fn pairwise_difference(
    ctx: &EnergyContext<'_>,
    others: &[Atom],
    skip_same_molecule: bool,
    trial: &[Atom],
    reference: &[Atom],
) -> Option<(f64, f64)> {
    let mut vdw = 0.0;
    let mut coulomb = 0.0;
    for atom in trial {
        let (v, c) = pair_energy_with(
            ctx.forcefield,
            ctx.simulation_box,
            atom,
            others,
            skip_same_molecule,
            true,
        )?;
        vdw += v;
        coulomb += c;
    }
    for atom in reference {
        if let Some((v, c)) = pair_energy_with(
            ctx.forcefield,
            ctx.simulation_box,
            atom,
            others,
            skip_same_molecule,
            false,
        ) {
            vdw -= v;
            coulomb -= c;
        }
    }
    Some((vdw, coulomb))
}
