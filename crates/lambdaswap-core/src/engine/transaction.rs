use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::system::System;

#[derive(Debug, Clone)]
struct MoleculeSnapshot {
    component: usize,
    slot: usize,
    molecule: Molecule,
    atoms: Vec<Atom>,
}

/// Copies of the molecules a trial may modify, taken before it starts.
///
/// A transaction only covers in-place edits of the listed molecules. Any
/// structural change (insert, delete, swap) must happen after the outcome is
/// known, on the commit path.
#[derive(Debug, Clone)]
pub struct MoleculeTransaction {
    snapshots: Vec<MoleculeSnapshot>,
}

impl MoleculeTransaction {
    pub fn begin(system: &System, molecules: &[(usize, usize)]) -> Self {
        let snapshots = molecules
            .iter()
            .map(|&(component, slot)| MoleculeSnapshot {
                component,
                slot,
                molecule: *system.molecule(component, slot),
                atoms: system.molecule_atoms(component, slot).to_vec(),
            })
            .collect();
        Self { snapshots }
    }

    /// Atoms of the `index`-th snapshotted molecule as they were at `begin`.
    pub fn atoms(&self, index: usize) -> &[Atom] {
        &self.snapshots[index].atoms
    }

    /// Writes every snapshot back and drops any staged reciprocal-space
    /// update.
    pub fn rollback(self, system: &mut System) {
        for snapshot in self.snapshots {
            system
                .molecule_atoms_mut(snapshot.component, snapshot.slot)
                .copy_from_slice(&snapshot.atoms);
            *system.molecule_mut(snapshot.component, snapshot.slot) = snapshot.molecule;
        }
        system.fourier_mut().discard();
    }

    pub fn commit(self) {}
}

/// Runs `action` on `system` with the listed molecules snapshotted.
///
/// `Ok` keeps the action's changes; `Err` restores the snapshots before the
/// error is returned.
pub fn scoped<T, E, F>(system: &mut System, molecules: &[(usize, usize)], action: F) -> Result<T, E>
where
    F: FnOnce(&mut System, &MoleculeTransaction) -> Result<T, E>,
{
    // 1. Record the original state of every molecule the action may touch.
    let transaction = MoleculeTransaction::begin(system, molecules);

    // 2. Execute the action.
    let result = action(system, &transaction);

    // 3. Keep the changes on success, otherwise put the snapshots back.
    match result {
        Ok(value) => {
            transaction.commit();
            Ok(value)
        }
        Err(error) => {
            transaction.rollback(system);
            Err(error)
        }
    }
}
