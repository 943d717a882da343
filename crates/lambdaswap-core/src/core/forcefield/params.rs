use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PseudoAtom {
    pub name: String,
    /// Well depth in K.
    pub epsilon: f64,
    /// Size parameter in Å.
    pub sigma: f64,
    #[serde(default)]
    pub mass: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EwaldParams {
    /// Screening parameter in 1/Å.
    pub alpha: f64,
    /// Largest wave-vector index along each box axis.
    pub kmax: [i32; 3],
}

fn default_overlap_criterion() -> f64 {
    1e5
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ForceField {
    pub pseudo_atoms: Vec<PseudoAtom>,
    pub cutoff_vdw: f64,
    pub cutoff_charge: f64,
    /// Pair energies (K) above this value count as a hard-core overlap.
    #[serde(default = "default_overlap_criterion")]
    pub overlap_criterion: f64,
    #[serde(default)]
    pub ewald: Option<EwaldParams>,
    #[serde(default)]
    pub use_tail_corrections: bool,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid force field parameter: {0}")]
    Invalid(String),
}

impl ForceField {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let forcefield: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        forcefield.validate()?;
        Ok(forcefield)
    }

    fn validate(&self) -> Result<(), ParamLoadError> {
        if self.cutoff_vdw <= 0.0 || self.cutoff_charge <= 0.0 {
            return Err(ParamLoadError::Invalid("cutoffs must be positive".to_string()));
        }
        if let Some(atom) = self.pseudo_atoms.iter().find(|a| a.sigma <= 0.0) {
            return Err(ParamLoadError::Invalid(format!(
                "pseudo atom '{}' has non-positive sigma",
                atom.name
            )));
        }
        Ok(())
    }

    pub fn type_index(&self, name: &str) -> Option<u16> {
        self.pseudo_atoms
            .iter()
            .position(|a| a.name == name)
            .map(|i| i as u16)
    }

    pub fn mass_of(&self, atom_type: u16) -> f64 {
        self.pseudo_atoms
            .get(atom_type as usize)
            .map_or(0.0, |a| a.mass)
    }

    /// Lorentz-Berthelot mixed `(epsilon, sigma)` for a pair of types.
    /// Unknown types do not interact.
    #[inline]
    pub fn pair(&self, a: u16, b: u16) -> (f64, f64) {
        match (
            self.pseudo_atoms.get(a as usize),
            self.pseudo_atoms.get(b as usize),
        ) {
            (Some(pa), Some(pb)) => ((pa.epsilon * pb.epsilon).sqrt(), 0.5 * (pa.sigma + pb.sigma)),
            _ => (0.0, 1.0),
        }
    }

    pub fn ewald_alpha(&self) -> Option<f64> {
        self.ewald.map(|e| e.alpha)
    }
}
