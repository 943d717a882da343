use nalgebra::{Point3, UnitQuaternion};

/// Rigid-body state of one molecule.
///
/// The atoms themselves live in the flat atom list of the [`System`]; a
/// molecule only records where its body frame sits.
///
/// [`System`]: super::system::System
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Molecule {
    pub center_of_mass: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub mass: f64,
    pub number_of_atoms: usize,
}

impl Molecule {
    pub fn new(
        center_of_mass: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        mass: f64,
        number_of_atoms: usize,
    ) -> Self {
        Self {
            center_of_mass,
            orientation,
            mass,
            number_of_atoms,
        }
    }
}
