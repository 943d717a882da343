//! Deterministic fixtures for driving moves down a chosen path.

use super::fractional::FractionalMoleculeIndex;
use super::state::{ComponentMoveState, SimulationState};
use super::statistics::Evaluator;
use super::tmmc::Tmmc;
use crate::core::forcefield::params::ForceField;
use crate::core::forcefield::term::RunningEnergy;
use crate::core::interactions::ewald::EwaldFourier;
use crate::core::interactions::{EnergyContext, EnergyKernels, FourierBase};
use crate::core::models::atom::Atom;
use crate::core::models::component::{Component, TemplateAtom};
use crate::core::models::simulation_box::SimulationBox;
use crate::core::models::system::System;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use std::cell::{Cell, RefCell};

/// Energy kernels returning a fixed value per call, optionally reporting an
/// overlap on a chosen call, and recording what was evaluated.
#[derive(Debug, Default)]
pub struct ScriptedKernels {
    energy: f64,
    overlap: Option<(Evaluator, usize)>,
    evaluated: RefCell<Vec<Evaluator>>,
    ewald_accepts: Cell<usize>,
}

impl ScriptedKernels {
    /// Every evaluator contributes `energy` per call.
    pub fn uniform(energy: f64) -> Self {
        Self {
            energy,
            ..Self::default()
        }
    }

    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// The first call of `evaluator` reports an overlap.
    pub fn with_overlap_at(self, evaluator: Evaluator) -> Self {
        self.with_overlap_on_call(evaluator, 0)
    }

    /// The `occurrence`-th call (0-based) of `evaluator` reports an overlap.
    pub fn with_overlap_on_call(mut self, evaluator: Evaluator, occurrence: usize) -> Self {
        self.overlap = Some((evaluator, occurrence));
        self
    }

    pub fn calls(&self) -> usize {
        self.evaluated.borrow().len()
    }

    pub fn evaluated(&self) -> Vec<Evaluator> {
        self.evaluated.borrow().clone()
    }

    pub fn ewald_accepts(&self) -> usize {
        self.ewald_accepts.get()
    }

    /// Records a call and returns whether it overlaps.
    fn record(&self, evaluator: Evaluator) -> bool {
        let mut evaluated = self.evaluated.borrow_mut();
        let occurrence = evaluated.iter().filter(|e| **e == evaluator).count();
        evaluated.push(evaluator);
        self.overlap == Some((evaluator, occurrence))
    }
}

impl EnergyKernels for ScriptedKernels {
    fn external_field_difference(&self, _: &EnergyContext<'_>, _: &[Atom], _: &[Atom]) -> Option<RunningEnergy> {
        (!self.record(Evaluator::ExternalField)).then(|| RunningEnergy::external_field(self.energy, 0.0))
    }

    fn framework_molecule_difference(&self, _: &EnergyContext<'_>, _: &[Atom], _: &[Atom]) -> Option<RunningEnergy> {
        (!self.record(Evaluator::Framework)).then(|| RunningEnergy::framework_molecule(self.energy, 0.0))
    }

    fn intermolecular_difference(&self, _: &EnergyContext<'_>, _: &[Atom], _: &[Atom]) -> Option<RunningEnergy> {
        (!self.record(Evaluator::Intermolecular)).then(|| RunningEnergy::molecule_molecule(self.energy, 0.0))
    }

    fn ewald_fourier_difference(
        &self,
        _: &EnergyContext<'_>,
        _: &mut EwaldFourier,
        _: FourierBase,
        _: &[Atom],
        _: &[Atom],
    ) -> RunningEnergy {
        self.record(Evaluator::Ewald);
        RunningEnergy {
            ewald_fourier: self.energy,
            ..RunningEnergy::default()
        }
    }

    fn tail_correction_difference(&self, _: &EnergyContext<'_>, _: &[Atom], _: &[Atom]) -> RunningEnergy {
        self.record(Evaluator::Tail);
        RunningEnergy::tail_correction(self.energy)
    }

    fn accept_ewald_move(&self, fourier: &mut EwaldFourier) {
        self.ewald_accepts.set(self.ewald_accepts.get() + 1);
        fourier.accept();
    }
}

pub fn test_forcefield() -> ForceField {
    toml::from_str(
        r#"
        cutoff-vdw = 4.5
        cutoff-charge = 4.5
        [[pseudo-atoms]]
        name = "X"
        epsilon = 100.0
        sigma = 3.0
        mass = 16.0
        "#,
    )
    .unwrap()
}

pub fn single_site_component() -> Component {
    Component::new(
        "X",
        vec![TemplateAtom {
            offset: Vector3::zeros(),
            atom_type: 0,
            charge: 0.0,
            mass: 16.0,
        }],
    )
}

/// A cubic box of `volume` at T = 1 K and zero pressure, holding one
/// single-site component: a fractional molecule at lambda = 0 in slot 0
/// followed by `integer_molecules` integer molecules.
pub fn test_system(volume: f64, integer_molecules: usize) -> System {
    let length = volume.cbrt();
    let mut system = System::new(
        SimulationBox::cubic(length),
        test_forcefield(),
        vec![single_site_component()],
        1.0,
        0.0,
    );

    let center = Point3::new(0.5, 0.5, 0.5) * length;
    let (molecule, mut atoms) = system.components[0].build_molecule(0, 0, center, UnitQuaternion::identity());
    for atom in &mut atoms {
        atom.set_scaling(0.0);
        atom.group_id = 1;
    }
    system.insert_fractional_molecule(0, molecule, &atoms);

    for i in 0..integer_molecules {
        let x = length * (i + 1) as f64 / (integer_molecules + 1) as f64;
        let position = Point3::new(x, 0.1 * length, 0.1 * length);
        let (molecule, atoms) = system.components[0].build_molecule(0, 0, position, UnitQuaternion::identity());
        system.insert_molecule(0, molecule, &atoms);
    }
    system
}

/// Wraps `system` with one component's move state, TMMC disabled, and the
/// fractional molecule moved to `current_bin`.
pub fn test_state(mut system: System, bins: usize, current_bin: usize, max_bin_change: usize) -> SimulationState {
    let mut move_state = ComponentMoveState::new(bins, max_bin_change);
    move_state.lambda.set_current_bin(current_bin);
    let lambda = move_state.lambda.lambda();
    for atom in system.molecule_atoms_mut(0, 0) {
        atom.set_scaling(lambda);
    }
    SimulationState {
        system,
        components: vec![move_state],
        tmmc: Tmmc::disabled(),
        fractional: FractionalMoleculeIndex::new(1),
    }
}
