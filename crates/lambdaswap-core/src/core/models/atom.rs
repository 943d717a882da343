use nalgebra::Point3;

/// Van der Waals scaling for a coupling parameter `lambda`.
///
/// The dispersion interactions are switched on over the first half of the
/// lambda range and stay fully on afterwards.
#[inline]
pub fn scaling_vdw(lambda: f64) -> f64 {
    if lambda < 0.5 { 2.0 * lambda } else { 1.0 }
}

/// Coulomb scaling for a coupling parameter `lambda`.
///
/// Charges only appear once the dispersion interactions are fully on, which
/// keeps a partially grown molecule from collapsing onto opposite charges.
#[inline]
pub fn scaling_coulomb(lambda: f64) -> f64 {
    if lambda < 0.5 { 0.0 } else { 2.0 * (lambda - 0.5) }
}

/// A single interaction site of a molecule or of the framework.
///
/// Atoms are plain values: trial configurations are built by copying them,
/// mutating the copy, and either writing the copy back or discarding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Cartesian position in Angstrom.
    pub position: Point3<f64>,
    /// Unscaled partial charge in elementary charge units.
    pub charge: f64,
    /// Multiplier applied to all van der Waals interactions of this atom.
    pub scaling_vdw: f64,
    /// Multiplier applied to all electrostatic interactions of this atom.
    pub scaling_coulomb: f64,
    /// Whether the atom belongs to a fractional molecule.
    pub is_fractional: bool,
    /// Slot index of the owning molecule within its component.
    pub molecule_id: u32,
    /// Index into the pseudo-atom table of the force field.
    pub atom_type: u16,
    /// Index of the owning component.
    pub component_id: u8,
    /// Nonzero for atoms whose lambda derivative is being tracked.
    pub group_id: u8,
}

impl Atom {
    /// Creates an atom with the scaling derived from `lambda`.
    ///
    /// A `lambda` of exactly one yields a fully interacting, integer atom.
    pub fn new(
        position: Point3<f64>,
        charge: f64,
        lambda: f64,
        molecule_id: u32,
        atom_type: u16,
        component_id: u8,
        group_id: u8,
    ) -> Self {
        let mut atom = Self {
            position,
            charge,
            scaling_vdw: 1.0,
            scaling_coulomb: 1.0,
            is_fractional: false,
            molecule_id,
            atom_type,
            component_id,
            group_id,
        };
        if lambda < 1.0 {
            atom.set_scaling(lambda);
        }
        atom
    }

    /// Puts the atom at coupling `lambda` and marks it fractional.
    pub fn set_scaling(&mut self, lambda: f64) {
        self.scaling_vdw = scaling_vdw(lambda);
        self.scaling_coulomb = scaling_coulomb(lambda);
        self.is_fractional = true;
    }

    /// Turns the atom into a regular, fully interacting atom.
    pub fn set_scaling_to_integer(&mut self) {
        self.scaling_vdw = 1.0;
        self.scaling_coulomb = 1.0;
        self.is_fractional = false;
        self.group_id = 0;
    }

    /// Switches every interaction of the atom off.
    pub fn set_scaling_fully_off(&mut self) {
        self.scaling_vdw = 0.0;
        self.scaling_coulomb = 0.0;
        self.is_fractional = true;
    }

    /// Charge seen by other atoms after the Coulomb scaling is applied.
    #[inline]
    pub fn scaled_charge(&self) -> f64 {
        self.charge * self.scaling_coulomb
    }

    /// True when `other` is part of the same molecule as `self`.
    #[inline]
    pub fn same_molecule(&self, other: &Atom) -> bool {
        self.component_id == other.component_id && self.molecule_id == other.molecule_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom_at_lambda(lambda: f64) -> Atom {
        Atom::new(Point3::new(1.0, 2.0, 3.0), -0.5, lambda, 4, 1, 0, 1)
    }

    #[test]
    fn new_atom_with_unit_lambda_is_integer() {
        let atom = atom_at_lambda(1.0);
        assert_eq!(atom.scaling_vdw, 1.0);
        assert_eq!(atom.scaling_coulomb, 1.0);
        assert!(!atom.is_fractional);
    }

    #[test]
    fn set_scaling_splits_lambda_between_vdw_and_coulomb() {
        let mut atom = atom_at_lambda(1.0);

        atom.set_scaling(0.25);
        assert_eq!(atom.scaling_vdw, 0.5);
        assert_eq!(atom.scaling_coulomb, 0.0);
        assert!(atom.is_fractional);

        atom.set_scaling(0.75);
        assert_eq!(atom.scaling_vdw, 1.0);
        assert_eq!(atom.scaling_coulomb, 0.5);
    }

    #[test]
    fn set_scaling_to_integer_clears_fractional_state() {
        let mut atom = atom_at_lambda(0.3);
        atom.set_scaling_to_integer();
        assert_eq!(atom.scaling_vdw, 1.0);
        assert_eq!(atom.scaling_coulomb, 1.0);
        assert!(!atom.is_fractional);
        assert_eq!(atom.group_id, 0);
    }

    #[test]
    fn set_scaling_fully_off_zeroes_both_scalings() {
        let mut atom = atom_at_lambda(0.9);
        atom.set_scaling_fully_off();
        assert_eq!(atom.scaling_vdw, 0.0);
        assert_eq!(atom.scaling_coulomb, 0.0);
        assert_eq!(atom.scaled_charge(), 0.0);
    }

    #[test]
    fn same_molecule_compares_component_and_molecule_id() {
        let a = atom_at_lambda(1.0);
        let mut b = a;
        assert!(a.same_molecule(&b));
        b.molecule_id = 5;
        assert!(!a.same_molecule(&b));
        b.molecule_id = a.molecule_id;
        b.component_id = 1;
        assert!(!a.same_molecule(&b));
    }
}
