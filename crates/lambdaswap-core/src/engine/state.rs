use super::config::SimulationConfig;
use super::error::EngineError;
use super::fractional::FractionalMoleculeIndex;
use super::lambda::LambdaHistogram;
use super::statistics::{MoveCpuTime, SwapMoveStatistics};
use super::tmmc::Tmmc;
use crate::core::models::system::{System, pascal_to_internal};
use crate::core::utils::random::RandomSource;
use tracing::debug;

/// Swap-move bookkeeping owned by one component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMoveState {
    pub lambda: LambdaHistogram,
    pub statistics: SwapMoveStatistics,
    pub cpu_time: MoveCpuTime,
    /// Largest bin excursion a single proposal may make.
    pub max_bin_change: usize,
}

impl ComponentMoveState {
    pub fn new(lambda_bins: usize, max_bin_change: usize) -> Self {
        Self {
            lambda: LambdaHistogram::new(lambda_bins),
            statistics: SwapMoveStatistics::default(),
            cpu_time: MoveCpuTime::default(),
            max_bin_change,
        }
    }
}

/// Everything a swap move reads or writes, owned in one place and handed to
/// the move by reference.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub system: System,
    pub components: Vec<ComponentMoveState>,
    pub tmmc: Tmmc,
    pub fractional: FractionalMoleculeIndex,
}

impl SimulationState {
    /// Wraps `system` for simulation at the temperature and pressure of
    /// `config`.
    ///
    /// Components without a fractional molecule get one at lambda = 0, placed
    /// at a random position and orientation and moved into the fractional
    /// slot. The reciprocal-space state is rebuilt from scratch afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Initialization`] for a system without components
    /// and [`EngineError::EmptyTemplate`] for a component without atoms.
    pub fn new<R: RandomSource + ?Sized>(
        mut system: System,
        config: &SimulationConfig,
        random: &mut R,
    ) -> Result<Self, EngineError> {
        if system.number_of_components() == 0 {
            return Err(EngineError::Initialization(
                "the system defines no components".to_string(),
            ));
        }
        if let Some(empty) = system.components.iter().find(|c| c.number_of_atoms() == 0) {
            return Err(EngineError::EmptyTemplate {
                name: empty.name.clone(),
            });
        }

        system.beta = 1.0 / config.temperature;
        system.pressure = pascal_to_internal(config.pressure);

        let fractional = FractionalMoleculeIndex::new(system.number_of_components());
        for component in 0..system.number_of_components() {
            if system.number_of_fractional_molecules(component) == 0 {
                add_fractional_molecule(&mut system, &fractional, component, random);
                debug!(component, "added fractional molecule at lambda = 0");
            }
            fractional.verify(&system, component)?;
        }
        system.recompute_fourier();

        let components = (0..system.number_of_components())
            .map(|_| ComponentMoveState::new(config.lambda_bins, config.max_bin_change))
            .collect();
        let tmmc = config.tmmc.as_ref().map(Tmmc::new).unwrap_or_default();

        Ok(Self {
            system,
            components,
            tmmc,
            fractional,
        })
    }

    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }
}

fn add_fractional_molecule<R: RandomSource + ?Sized>(
    system: &mut System,
    fractional: &FractionalMoleculeIndex,
    component: usize,
    random: &mut R,
) {
    let (molecule, mut atoms) =
        system.components[component].random_molecule_in_box(component as u8, random, &system.simulation_box);
    for atom in &mut atoms {
        atom.set_scaling(0.0);
        atom.group_id = 1;
    }
    system.insert_fractional_molecule(component, molecule, &atoms);
    fractional.restore_after_insertion(system, component);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::Component;
    use crate::core::models::simulation_box::SimulationBox;
    use crate::core::utils::random::ReplayRandom;
    use crate::engine::config::{SimulationConfigBuilder, TmmcConfig};
    use crate::engine::test_support::{single_site_component, test_forcefield, test_system};
    use nalgebra::{Point3, UnitQuaternion};

    fn config() -> SimulationConfig {
        SimulationConfigBuilder::new()
            .temperature(300.0)
            .pressure(1e5)
            .cycles(10)
            .seed(1)
            .lambda_bins(10)
            .build()
            .unwrap()
    }

    #[test]
    fn new_adds_a_fractional_molecule_in_front_of_existing_ones() {
        let mut system = System::new(
            SimulationBox::cubic(20.0),
            test_forcefield(),
            vec![single_site_component()],
            300.0,
            1e5,
        );
        let (molecule, atoms) =
            system.components[0].build_molecule(0, 0, Point3::new(1.0, 1.0, 1.0), UnitQuaternion::identity());
        system.insert_molecule(0, molecule, &atoms);

        let mut random = ReplayRandom::new([], 0.5);
        let state = SimulationState::new(system, &config(), &mut random).unwrap();

        assert_eq!(state.system.number_of_molecules(0), 2);
        assert_eq!(state.system.number_of_integer_molecules(0), 1);
        assert!(state.system.molecule_atoms(0, 0)[0].is_fractional);
        assert_eq!(state.system.molecule_atoms(0, 0)[0].scaling_vdw, 0.0);
        assert_eq!(state.system.molecule_atoms(0, 1)[0].position, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(state.components[0].lambda.current_bin(), 0);
        assert_eq!(state.components[0].max_bin_change, 5);
        assert!((state.system.beta - 1.0 / 300.0).abs() < 1e-15);
    }

    #[test]
    fn existing_fractional_molecule_is_kept() {
        let system = test_system(1000.0, 2);
        let before = system.atoms().to_vec();
        let mut random = ReplayRandom::new([], 0.5);
        let state = SimulationState::new(system, &config(), &mut random).unwrap();
        assert_eq!(state.system.atoms(), before.as_slice());
        assert_eq!(random.drawn(), 0);
    }

    #[test]
    fn tmmc_is_built_from_the_config() {
        let config = SimulationConfigBuilder::new()
            .temperature(300.0)
            .pressure(1e5)
            .cycles(10)
            .seed(1)
            .lambda_bins(10)
            .tmmc(TmmcConfig {
                min_macrostate: 0,
                max_macrostate: 4,
                use_bias: false,
                update_every: 10,
            })
            .build()
            .unwrap();
        let mut random = ReplayRandom::new([], 0.5);
        let state = SimulationState::new(test_system(1000.0, 0), &config, &mut random).unwrap();
        assert!(state.tmmc.is_enabled());
        assert_eq!(state.tmmc.collection_matrix().len(), 5);
    }

    #[test]
    fn empty_templates_are_rejected() {
        let system = System::new(
            SimulationBox::cubic(20.0),
            test_forcefield(),
            vec![Component::new("ghost", Vec::new())],
            300.0,
            1e5,
        );
        let mut random = ReplayRandom::new([], 0.5);
        let result = SimulationState::new(system, &config(), &mut random);
        assert!(matches!(result, Err(EngineError::EmptyTemplate { name }) if name == "ghost"));
    }
}
