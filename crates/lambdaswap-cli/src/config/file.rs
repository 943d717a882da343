use crate::error::{CliError, Result};
use lambdaswap::core::interactions::external_field::ExternalField;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSimulationConfig {
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub cycles: Option<usize>,
    pub equilibration_cycles: Option<usize>,
    pub print_every: Option<usize>,
    pub seed: Option<u64>,
    pub replicas: Option<usize>,
    pub insertion_disabled: Option<bool>,
    pub deletion_disabled: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileWangLandauConfig {
    pub initial_factor: Option<f64>,
    pub reduction: Option<f64>,
    pub reduce_every: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLambdaConfig {
    pub bins: Option<usize>,
    pub max_bin_change: Option<usize>,
    pub wang_landau: Option<FileWangLandauConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTmmcConfig {
    pub min_macrostate: Option<usize>,
    pub max_macrostate: Option<usize>,
    pub use_bias: Option<bool>,
    pub update_every: Option<usize>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileBoxConfig {
    /// Edge lengths of the orthorhombic cell in Å.
    pub lengths: [f64; 3],
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileAtom {
    #[serde(rename = "type")]
    pub atom_type: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub charge: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilePocket {
    pub center: [f64; 3],
    pub radius: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileComponent {
    pub name: String,
    pub mol_fraction: Option<f64>,
    pub fugacity_coefficient: Option<f64>,
    pub initial_molecules: Option<usize>,
    pub atoms: Vec<FileAtom>,
    #[serde(default)]
    pub blocked_pockets: Vec<FilePocket>,
}

/// Layout of a simulation file. Every scalar is optional so that command-line
/// flags and built-in defaults can fill the gaps.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    /// Force field parameter file, relative to the simulation file.
    pub forcefield: Option<PathBuf>,
    pub simulation: Option<FileSimulationConfig>,
    pub lambda: Option<FileLambdaConfig>,
    pub tmmc: Option<FileTmmcConfig>,
    #[serde(rename = "box")]
    pub simulation_box: Option<FileBoxConfig>,
    pub external_field: Option<ExternalField>,
    #[serde(default)]
    pub framework: Vec<FileAtom>,
    #[serde(default)]
    pub components: Vec<FileComponent>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading simulation file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
