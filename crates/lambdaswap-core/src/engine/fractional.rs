use super::error::EngineError;
use crate::core::models::system::System;
use crate::core::utils::random::RandomSource;

/// Keeps every component's fractional molecule at a fixed slot of its
/// component block, so moves can address it without searching.
///
/// Insertion and deletion change the molecule list; the helpers here do the
/// slot swaps that put the fractional molecule back where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionalMoleculeIndex {
    slots: Vec<usize>,
}

impl FractionalMoleculeIndex {
    /// Fractional molecules live in slot 0 of every component.
    pub fn new(number_of_components: usize) -> Self {
        Self {
            slots: vec![0; number_of_components],
        }
    }

    #[inline]
    pub fn slot(&self, component: usize) -> usize {
        self.slots[component]
    }

    /// Picks a uniformly random integer molecule of `component` with one
    /// draw. The caller guarantees at least one exists.
    pub fn random_integer_molecule<R: RandomSource + ?Sized>(
        &self,
        random: &mut R,
        system: &System,
        component: usize,
    ) -> usize {
        let k = random.uniform_index(system.number_of_integer_molecules(component));
        if k >= self.slot(component) { k + 1 } else { k }
    }

    /// After a new fractional molecule was appended, moves it into the
    /// fractional slot and the promoted one to the end of the block.
    pub fn restore_after_insertion(&self, system: &mut System, component: usize) {
        let last = system.number_of_molecules(component) - 1;
        system.swap_molecules(component, self.slot(component), last);
    }

    /// Moves the promoted `candidate` into the fractional slot and removes the
    /// decoupled old fractional molecule, which lands in `candidate`'s slot.
    pub fn finish_deletion(&self, system: &mut System, component: usize, candidate: usize) {
        system.swap_molecules(component, self.slot(component), candidate);
        system.delete_molecule(component, candidate);
    }

    /// Checks that the fractional slot holds the only fractional molecule of
    /// `component`.
    pub fn verify(&self, system: &System, component: usize) -> Result<(), EngineError> {
        if system.number_of_fractional_molecules(component) == 0 {
            return Err(EngineError::MissingFractionalMolecule { component });
        }
        let slot = self.slot(component);
        for other in 0..system.number_of_molecules(component) {
            let fractional = system.molecule_atoms(component, other).iter().all(|a| a.is_fractional);
            if fractional != (other == slot) {
                return Err(EngineError::Internal(format!(
                    "component {component}: molecule in slot {other} is {}fractional, fractional slot is {slot}",
                    if fractional { "" } else { "not " }
                )));
            }
        }
        Ok(())
    }
}
