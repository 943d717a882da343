use lambdaswap::core::interactions::external_field::ExternalField;
use lambdaswap::engine::config::SimulationConfig;
use std::path::PathBuf;

/// An atom named by its force field pseudo-atom type.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSpec {
    pub type_name: String,
    pub position: [f64; 3],
    pub charge: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub name: String,
    pub mol_fraction: f64,
    pub fugacity_coefficient: Option<f64>,
    pub initial_molecules: usize,
    pub atoms: Vec<AtomSpec>,
    /// `(center, radius)` of every blocked pocket.
    pub blocked_pockets: Vec<([f64; 3], f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemSpec {
    pub box_lengths: [f64; 3],
    pub external_field: Option<ExternalField>,
    pub framework: Vec<AtomSpec>,
    pub components: Vec<ComponentSpec>,
}

pub struct AppConfig {
    pub forcefield_path: PathBuf,
    pub output_dir: PathBuf,
    pub replicas: usize,
    pub system: SystemSpec,
    pub core_config: SimulationConfig,
}
