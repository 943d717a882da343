use super::atom::Atom;
use super::molecule::Molecule;
use super::simulation_box::SimulationBox;
use crate::core::utils::geometry::{center_of_mass, place_rigid_body, random_orientation};
use crate::core::utils::random::RandomSource;
use nalgebra::{Point3, Vector3};

/// One site of a rigid molecule template, relative to the template's
/// centre of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateAtom {
    pub offset: Vector3<f64>,
    pub atom_type: u16,
    pub charge: f64,
    pub mass: f64,
}

/// Spherical region that no atom of the owning component may enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockedPocket {
    pub center: Point3<f64>,
    pub radius: f64,
}

/// A molecular species exchanged with the reservoir.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    /// Mole fraction of this species in the reservoir gas.
    pub mol_fraction: f64,
    /// Fugacity coefficient; `None` means an ideal gas (coefficient 1).
    pub fugacity_coefficient: Option<f64>,
    pub template: Vec<TemplateAtom>,
    pub blocked_pockets: Vec<BlockedPocket>,
}

impl Component {
    pub fn new(name: impl Into<String>, template: Vec<TemplateAtom>) -> Self {
        Self {
            name: name.into(),
            mol_fraction: 1.0,
            fugacity_coefficient: None,
            template,
            blocked_pockets: Vec::new(),
        }
    }

    pub fn number_of_atoms(&self) -> usize {
        self.template.len()
    }

    pub fn mass(&self) -> f64 {
        self.template.iter().map(|t| t.mass).sum()
    }

    /// Reservoir fugacity of this species at `pressure` (same units as `pressure`).
    #[inline]
    pub fn fugacity(&self, pressure: f64) -> f64 {
        self.fugacity_coefficient.unwrap_or(1.0) * pressure
    }

    /// Shifts the template so its offsets are relative to the mass-weighted
    /// centre.
    pub fn recenter_template(&mut self) {
        let positions: Vec<Point3<f64>> = self.template.iter().map(|t| Point3::from(t.offset)).collect();
        let masses: Vec<f64> = self.template.iter().map(|t| t.mass).collect();
        let com = center_of_mass(&positions, &masses);
        for site in &mut self.template {
            site.offset -= com.coords;
        }
    }

    /// Builds the atoms of a molecule placed at `center` with `orientation`.
    ///
    /// The atoms are fully interacting integer atoms; callers adjust the
    /// scaling and identifiers afterwards.
    pub fn build_molecule(
        &self,
        component_id: u8,
        molecule_id: u32,
        center: Point3<f64>,
        orientation: nalgebra::UnitQuaternion<f64>,
    ) -> (Molecule, Vec<Atom>) {
        let offsets: Vec<Vector3<f64>> = self.template.iter().map(|t| t.offset).collect();
        let positions = place_rigid_body(&offsets, &center, &orientation);
        let atoms = self
            .template
            .iter()
            .zip(positions)
            .map(|(site, position)| {
                Atom::new(
                    position,
                    site.charge,
                    1.0,
                    molecule_id,
                    site.atom_type,
                    component_id,
                    0,
                )
            })
            .collect();
        let molecule = Molecule::new(center, orientation, self.mass(), self.template.len());
        (molecule, atoms)
    }

    /// Generates a trial molecule at a uniform random position and
    /// orientation. Draws three deviates for the position, then three for the
    /// orientation.
    pub fn random_molecule_in_box<R: RandomSource + ?Sized>(
        &self,
        component_id: u8,
        random: &mut R,
        simulation_box: &SimulationBox,
    ) -> (Molecule, Vec<Atom>) {
        let center = simulation_box.random_position(random);
        let orientation = random_orientation(random);
        self.build_molecule(component_id, 0, center, orientation)
    }

    /// True when any atom lies inside one of the blocked pockets.
    pub fn inside_blocked_pockets(&self, simulation_box: &SimulationBox, atoms: &[Atom]) -> bool {
        self.blocked_pockets.iter().any(|pocket| {
            let radius_sq = pocket.radius * pocket.radius;
            atoms
                .iter()
                .any(|atom| simulation_box.distance_squared(&atom.position, &pocket.center) < radius_sq)
        })
    }
}
