use super::atom::Atom;
use super::component::Component;
use super::molecule::Molecule;
use super::simulation_box::SimulationBox;
use crate::core::forcefield::params::ForceField;
use crate::core::forcefield::term::RunningEnergy;
use crate::core::interactions::EnergyContext;
use crate::core::interactions::ewald::EwaldFourier;
use crate::core::interactions::external_field::ExternalField;
use crate::core::interactions::total::compute_total_energy;
use std::ops::Range;

/// Boltzmann constant in J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Converts a pressure in Pa to K/Å³, the unit in which `beta * p * V` is
/// dimensionless when energies are expressed in K.
#[inline]
pub fn pascal_to_internal(pressure: f64) -> f64 {
    pressure * 1e-30 / BOLTZMANN
}

/// A grand-canonical simulation cell: framework, adsorbate molecules of every
/// component, and the committed reciprocal-space state.
///
/// Adsorbate atoms are stored in one flat list in component-major order; within a
/// component, molecule `slot` owns the atoms
/// `[slot * n, (slot + 1) * n)` relative to the start of the component block,
/// where `n` is the size of the component's template. Every atom's
/// `molecule_id` equals the slot of its molecule.
///
/// Slices handed out by the accessors become stale after any insertion,
/// deletion or swap and must be re-acquired.
#[derive(Debug, Clone)]
pub struct System {
    pub simulation_box: SimulationBox,
    pub forcefield: ForceField,
    pub components: Vec<Component>,
    pub external_field: Option<ExternalField>,
    pub framework_atoms: Vec<Atom>,
    /// Inverse temperature in 1/K.
    pub beta: f64,
    /// Pressure in K/Å³.
    pub pressure: f64,
    atoms: Vec<Atom>,
    molecules: Vec<Molecule>,
    number_of_molecules_per_component: Vec<usize>,
    number_of_fractional_molecules_per_component: Vec<usize>,
    fourier: EwaldFourier,
}

impl System {
    /// Creates an empty system.
    ///
    /// # Arguments
    ///
    /// * `simulation_box` - The periodic cell.
    /// * `forcefield` - Pair parameters and Ewald settings.
    /// * `components` - The exchangeable species, indexed by component id.
    /// * `temperature` - Temperature in K.
    /// * `pressure` - Reservoir pressure in Pa.
    pub fn new(
        simulation_box: SimulationBox,
        forcefield: ForceField,
        components: Vec<Component>,
        temperature: f64,
        pressure: f64,
    ) -> Self {
        let fourier = EwaldFourier::new(&forcefield, &simulation_box);
        let n = components.len();
        Self {
            simulation_box,
            forcefield,
            components,
            external_field: None,
            framework_atoms: Vec::new(),
            beta: 1.0 / temperature,
            pressure: pascal_to_internal(pressure),
            atoms: Vec::new(),
            molecules: Vec::new(),
            number_of_molecules_per_component: vec![0; n],
            number_of_fractional_molecules_per_component: vec![0; n],
            fourier,
        }
    }

    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }

    /// Total number of molecules of `component`, fractional ones included.
    pub fn number_of_molecules(&self, component: usize) -> usize {
        self.number_of_molecules_per_component[component]
    }

    pub fn number_of_fractional_molecules(&self, component: usize) -> usize {
        self.number_of_fractional_molecules_per_component[component]
    }

    /// Number of fully interacting molecules of `component`, the macrostate
    /// variable of the grand-canonical ensemble.
    pub fn number_of_integer_molecules(&self, component: usize) -> usize {
        self.number_of_molecules_per_component[component]
            - self.number_of_fractional_molecules_per_component[component]
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn fourier(&self) -> &EwaldFourier {
        &self.fourier
    }

    pub fn fourier_mut(&mut self) -> &mut EwaldFourier {
        &mut self.fourier
    }

    fn molecule_index(&self, component: usize, slot: usize) -> usize {
        self.number_of_molecules_per_component[..component]
            .iter()
            .sum::<usize>()
            + slot
    }

    fn atom_block_start(&self, component: usize) -> usize {
        self.number_of_molecules_per_component[..component]
            .iter()
            .zip(&self.components)
            .map(|(n, c)| n * c.number_of_atoms())
            .sum()
    }

    /// Range of the flat atom list occupied by molecule `slot` of `component`.
    pub fn atom_range(&self, component: usize, slot: usize) -> Range<usize> {
        let size = self.components[component].number_of_atoms();
        let start = self.atom_block_start(component) + slot * size;
        start..start + size
    }

    pub fn molecule_atoms(&self, component: usize, slot: usize) -> &[Atom] {
        let range = self.atom_range(component, slot);
        &self.atoms[range]
    }

    pub fn molecule_atoms_mut(&mut self, component: usize, slot: usize) -> &mut [Atom] {
        let range = self.atom_range(component, slot);
        &mut self.atoms[range]
    }

    pub fn molecule(&self, component: usize, slot: usize) -> &Molecule {
        &self.molecules[self.molecule_index(component, slot)]
    }

    pub fn molecule_mut(&mut self, component: usize, slot: usize) -> &mut Molecule {
        let index = self.molecule_index(component, slot);
        &mut self.molecules[index]
    }

    /// Appends a molecule to the end of `component`'s block.
    ///
    /// # Arguments
    ///
    /// * `component` - Component the molecule belongs to.
    /// * `molecule` - Rigid-body state of the new molecule.
    /// * `atoms` - Its atoms, in template order.
    ///
    /// # Return
    ///
    /// The slot of the new molecule. Identifiers on the stored atoms are
    /// re-stamped to match.
    pub fn insert_molecule(&mut self, component: usize, molecule: Molecule, atoms: &[Atom]) -> usize {
        let slot = self.number_of_molecules_per_component[component];
        let atom_at = self.atom_block_start(component) + slot * self.components[component].number_of_atoms();
        let molecule_at = self.molecule_index(component, slot);

        self.atoms.splice(atom_at..atom_at, atoms.iter().copied());
        self.molecules.insert(molecule_at, molecule);
        self.number_of_molecules_per_component[component] += 1;
        self.restamp_molecule(component, slot);
        slot
    }

    /// Adds a molecule and marks it as one of `component`'s fractional
    /// molecules.
    pub fn insert_fractional_molecule(
        &mut self,
        component: usize,
        molecule: Molecule,
        atoms: &[Atom],
    ) -> usize {
        let slot = self.insert_molecule(component, molecule, atoms);
        self.number_of_fractional_molecules_per_component[component] += 1;
        slot
    }

    /// Removes molecule `slot` of `component`, compacting the lists. Later
    /// molecules of the component shift down by one slot.
    pub fn delete_molecule(&mut self, component: usize, slot: usize) -> (Molecule, Vec<Atom>) {
        let range = self.atom_range(component, slot);
        let molecule_at = self.molecule_index(component, slot);

        let atoms: Vec<Atom> = self.atoms.drain(range).collect();
        let molecule = self.molecules.remove(molecule_at);
        self.number_of_molecules_per_component[component] -= 1;
        for later in slot..self.number_of_molecules_per_component[component] {
            self.restamp_molecule(component, later);
        }
        (molecule, atoms)
    }

    /// Exchanges the storage of two molecules of the same component.
    pub fn swap_molecules(&mut self, component: usize, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let range_first = self.atom_range(component, first);
        let range_second = self.atom_range(component, second);

        let (head, tail) = self.atoms.split_at_mut(range_second.start);
        head[range_first].swap_with_slice(&mut tail[..range_second.len()]);

        let i = self.molecule_index(component, first);
        let j = self.molecule_index(component, second);
        self.molecules.swap(i, j);

        self.restamp_molecule(component, first);
        self.restamp_molecule(component, second);
    }

    fn restamp_molecule(&mut self, component: usize, slot: usize) {
        for atom in self.molecule_atoms_mut(component, slot) {
            atom.molecule_id = slot as u32;
            atom.component_id = component as u8;
        }
    }

    pub fn inside_blocked_pockets(&self, component: usize, atoms: &[Atom]) -> bool {
        self.components[component].inside_blocked_pockets(&self.simulation_box, atoms)
    }

    /// Read-only kernel context over the current configuration.
    pub fn context(&self) -> EnergyContext<'_> {
        EnergyContext {
            forcefield: &self.forcefield,
            simulation_box: &self.simulation_box,
            framework_atoms: &self.framework_atoms,
            molecule_atoms: &self.atoms,
            external_field: self.external_field.as_ref(),
        }
    }

    /// Kernel context together with mutable access to the reciprocal-space
    /// accumulators, for staged Ewald differences.
    pub fn energy_context(&mut self) -> (EnergyContext<'_>, &mut EwaldFourier) {
        let Self {
            simulation_box,
            forcefield,
            external_field,
            framework_atoms,
            atoms,
            fourier,
            ..
        } = self;
        let context = EnergyContext {
            forcefield,
            simulation_box,
            framework_atoms,
            molecule_atoms: atoms,
            external_field: external_field.as_ref(),
        };
        (context, fourier)
    }

    /// Rebuilds the reciprocal-space accumulators from the current atoms.
    pub fn recompute_fourier(&mut self) {
        self.fourier.recompute(&self.framework_atoms, &self.atoms);
    }

    /// Potential energy of the current configuration, computed from scratch.
    pub fn total_energy(&self) -> RunningEnergy {
        compute_total_energy(&self.context(), &self.fourier)
    }
}
