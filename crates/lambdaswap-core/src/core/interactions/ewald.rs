use super::{EnergyContext, FourierBase};
use crate::core::forcefield::params::ForceField;
use crate::core::forcefield::potentials::{COULOMB_CONSTANT, erf};
use crate::core::forcefield::term::RunningEnergy;
use crate::core::models::atom::Atom;
use crate::core::models::simulation_box::SimulationBox;
use itertools::iproduct;
use nalgebra::{Complex, Vector3};
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq)]
struct WaveVector {
    k: Vector3<f64>,
    /// `C 4π/V exp(-k²/4α²)/k²`, with the factor two of the half-space sum folded in.
    prefactor: f64,
}

/// Reciprocal-space accumulators.
///
/// `total` holds the structure factors of the committed configuration;
/// `stored` receives the structure factors of the configuration currently
/// being tried. Only [`EwaldFourier::accept`] writes `total`.
#[derive(Debug, Clone, PartialEq)]
pub struct EwaldFourier {
    wave_vectors: Vec<WaveVector>,
    total: Vec<Complex<f64>>,
    stored: Vec<Complex<f64>>,
}

impl EwaldFourier {
    /// Builds the half-space wave-vector set. Without Ewald parameters the
    /// set is empty and every difference is zero.
    pub fn new(forcefield: &ForceField, simulation_box: &SimulationBox) -> Self {
        let wave_vectors = match forcefield.ewald {
            None => Vec::new(),
            Some(params) => {
                let [kx, ky, kz] = params.kmax;
                let volume = simulation_box.volume();
                let lengths = simulation_box.lengths;
                iproduct!(0..=kx, -ky..=ky, -kz..=kz)
                    .filter(|&(nx, ny, nz)| nx > 0 || ny > 0 || (ny == 0 && nz > 0))
                    .map(|(nx, ny, nz)| {
                        let k = Vector3::new(
                            TAU * nx as f64 / lengths.x,
                            TAU * ny as f64 / lengths.y,
                            TAU * nz as f64 / lengths.z,
                        );
                        let k_sq = k.norm_squared();
                        let prefactor = COULOMB_CONSTANT * 4.0 * PI / volume
                            * (-k_sq / (4.0 * params.alpha * params.alpha)).exp()
                            / k_sq;
                        WaveVector { k, prefactor }
                    })
                    .collect()
            }
        };
        let zeros = vec![Complex::new(0.0, 0.0); wave_vectors.len()];
        Self {
            wave_vectors,
            total: zeros.clone(),
            stored: zeros,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.wave_vectors.is_empty()
    }

    pub fn number_of_wave_vectors(&self) -> usize {
        self.wave_vectors.len()
    }

    /// Rebuilds both accumulators from scratch.
    pub fn recompute(&mut self, framework_atoms: &[Atom], molecule_atoms: &[Atom]) {
        for (i, wave) in self.wave_vectors.iter().enumerate() {
            self.total[i] = structure_factor(&wave.k, framework_atoms)
                + structure_factor(&wave.k, molecule_atoms);
        }
        self.stored.copy_from_slice(&self.total);
    }

    /// Reciprocal-space energy of the committed configuration.
    pub fn energy(&self) -> f64 {
        self.wave_vectors
            .iter()
            .zip(&self.total)
            .map(|(wave, rho)| wave.prefactor * rho.norm_sqr())
            .sum()
    }

    pub fn accept(&mut self) {
        self.total.copy_from_slice(&self.stored);
    }

    /// Drops whatever a rejected trial staged.
    pub fn discard(&mut self) {
        self.stored.copy_from_slice(&self.total);
    }
}

fn structure_factor(k: &Vector3<f64>, atoms: &[Atom]) -> Complex<f64> {
    atoms
        .iter()
        .filter(|a| a.scaled_charge() != 0.0)
        .map(|a| {
            let (sin, cos) = k.dot(&a.position.coords).sin_cos();
            Complex::new(cos, sin) * a.scaled_charge()
        })
        .sum()
}

/// `-C α/√π Σ q²` over the scaled charges.
pub fn self_energy(alpha: f64, atoms: &[Atom]) -> f64 {
    let sum_sq: f64 = atoms.iter().map(|a| a.scaled_charge().powi(2)).sum();
    -COULOMB_CONSTANT * alpha / PI.sqrt() * sum_sq
}

/// Removes the reciprocal-space interaction between atoms of one molecule.
pub fn exclusion_energy(alpha: f64, simulation_box: &SimulationBox, atoms: &[Atom]) -> f64 {
    let mut energy = 0.0;
    for (i, a) in atoms.iter().enumerate() {
        for b in &atoms[i + 1..] {
            if !a.same_molecule(b) {
                continue;
            }
            let q = a.scaled_charge() * b.scaled_charge();
            if q == 0.0 {
                continue;
            }
            let r = simulation_box.distance_squared(&a.position, &b.position).sqrt();
            energy -= COULOMB_CONSTANT * q * erf(alpha * r) / r;
        }
    }
    energy
}

pub fn energy_difference(
    ctx: &EnergyContext<'_>,
    fourier: &mut EwaldFourier,
    base: FourierBase,
    trial: &[Atom],
    reference: &[Atom],
) -> RunningEnergy {
    let Some(alpha) = ctx.forcefield.ewald_alpha() else {
        return RunningEnergy::default();
    };

    let mut fourier_energy = 0.0;
    for (i, wave) in fourier.wave_vectors.iter().enumerate() {
        let old = match base {
            FourierBase::Total => fourier.total[i],
            FourierBase::Stored => fourier.stored[i],
        };
        let new = old + structure_factor(&wave.k, trial) - structure_factor(&wave.k, reference);
        fourier_energy += wave.prefactor * (new.norm_sqr() - old.norm_sqr());
        fourier.stored[i] = new;
    }

    RunningEnergy {
        ewald_fourier: fourier_energy,
        ewald_self: self_energy(alpha, trial) - self_energy(alpha, reference),
        ewald_exclusion: exclusion_energy(alpha, ctx.simulation_box, trial)
            - exclusion_energy(alpha, ctx.simulation_box, reference),
        ..RunningEnergy::default()
    }
}
