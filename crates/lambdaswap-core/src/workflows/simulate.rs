use crate::core::forcefield::term::RunningEnergy;
use crate::core::interactions::EnergyKernels;
use crate::core::models::system::System;
use crate::core::utils::random::RandomSource;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::moves::swap_cfcmc::swap_move_cfcmc;
use crate::engine::progress::{BlockReport, Progress, ProgressReporter};
use crate::engine::state::SimulationState;
use crate::engine::statistics::{MoveCpuTime, SwapBranch, SwapMoveStatistics};
use crate::engine::tmmc::Tmmc;
use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// Minimum number of swap attempts per cycle.
const MIN_STEPS_PER_CYCLE: usize = 20;

/// Relative energy drift above which a warning is logged.
const DRIFT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct ComponentResult {
    pub name: String,
    pub statistics: SwapMoveStatistics,
    pub cpu_time: MoveCpuTime,
    /// Production visits per lambda bin.
    pub lambda_histogram: Vec<f64>,
    pub lambda_bias: Vec<f64>,
    /// `-ln p(lambda)` in units of kT, `None` for unvisited bins.
    pub free_energy_profile: Vec<Option<f64>>,
    /// Integer-molecule count averaged over production cycles.
    pub average_molecules: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub components: Vec<ComponentResult>,
    pub tmmc: Tmmc,
    pub initial_energy: RunningEnergy,
    /// Initial energy plus every accepted move's energy change.
    pub running_energy: RunningEnergy,
    /// Energy of the final configuration, recomputed from scratch.
    pub final_energy: RunningEnergy,
    pub system: System,
}

impl SimulationResult {
    /// Difference between the recomputed and the accumulated energy.
    pub fn energy_drift(&self) -> f64 {
        self.final_energy.potential_energy() - self.running_energy.potential_energy()
    }
}

/// Runs a complete simulation of `system`.
///
/// # Arguments
///
/// * `system` - Initial configuration. Components without a fractional
///   molecule get one at lambda = 0.
/// * `config` - Thermodynamic state, cycle counts, lambda and TMMC settings.
/// * `kernels` - Energy evaluators used by every move.
/// * `reporter` - Receives phase, cycle and block events.
///
/// # Errors
///
/// Returns [`EngineError`] if the system cannot be set up for simulation.
#[instrument(skip_all, name = "simulation_workflow", fields(seed = config.seed))]
pub fn run<K>(
    system: System,
    config: &SimulationConfig,
    kernels: &K,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError>
where
    K: EnergyKernels + ?Sized,
{
    // === Phase 0: Preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let mut random = StdRng::seed_from_u64(config.seed);
    let mut state = SimulationState::new(system, config, &mut random)?;
    let initial_energy = state.system.total_energy();
    info!(
        components = state.number_of_components(),
        energy = initial_energy.potential_energy(),
        "Simulation state prepared."
    );
    reporter.report(Progress::PhaseFinish);

    let mut running_energy = initial_energy;

    // === Phase 1: Equilibration ===
    if config.equilibration_cycles > 0 {
        equilibrate(&mut random, &mut state, config, kernels, reporter, &mut running_energy)?;
    }

    // === Phase 2: Production ===
    let molecule_sums = produce(&mut random, &mut state, config, kernels, reporter, &mut running_energy)?;

    // === Phase 3: Results ===
    let final_energy = state.system.total_energy();
    let result = finalize(state, config, molecule_sums, initial_energy, running_energy, final_energy);

    let drift = result.energy_drift();
    if drift.abs() > DRIFT_TOLERANCE * final_energy.potential_energy().abs().max(1.0) {
        warn!(drift, "Accumulated energy drifted from the recomputed energy.");
    }
    info!(
        energy = final_energy.potential_energy(),
        drift, "Simulation complete."
    );
    Ok(result)
}

/// Runs `replicas` independent simulations of `system`, seeded
/// `config.seed`, `config.seed + 1`, ... Replicas run concurrently with the
/// `parallel` feature.
#[instrument(skip_all, name = "replica_workflow", fields(replicas = replicas))]
pub fn run_replicas<K>(
    system: &System,
    config: &SimulationConfig,
    kernels: &K,
    replicas: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<SimulationResult>, EngineError>
where
    K: EnergyKernels + Sync + ?Sized,
{
    let seeds: Vec<u64> = (0..replicas as u64).map(|i| config.seed.wrapping_add(i)).collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = seeds.iter();

    #[cfg(feature = "parallel")]
    let iterator = seeds.par_iter();

    iterator
        .map(|&seed| {
            let replica_config = SimulationConfig {
                seed,
                ..config.clone()
            };
            run(system.clone(), &replica_config, kernels, reporter)
        })
        .collect()
}

fn steps_per_cycle(state: &SimulationState) -> usize {
    let molecules: usize = (0..state.system.number_of_components())
        .map(|c| state.system.number_of_molecules(c))
        .sum();
    molecules.max(MIN_STEPS_PER_CYCLE)
}

fn equilibrate<R, K>(
    random: &mut R,
    state: &mut SimulationState,
    config: &SimulationConfig,
    kernels: &K,
    reporter: &ProgressReporter,
    running_energy: &mut RunningEnergy,
) -> Result<(), EngineError>
where
    R: RandomSource + ?Sized,
    K: EnergyKernels + ?Sized,
{
    reporter.report(Progress::PhaseStart {
        name: "Equilibration",
    });
    reporter.report(Progress::TaskStart {
        total_steps: config.equilibration_cycles as u64,
    });
    info!(cycles = config.equilibration_cycles, "Starting equilibration.");

    let mut factor = config.wang_landau.map(|wl| wl.initial_factor);

    for cycle in 1..=config.equilibration_cycles {
        for _ in 0..steps_per_cycle(state) {
            let component = random.uniform_index(state.number_of_components());
            let outcome = swap_move_cfcmc(
                random,
                state,
                kernels,
                component,
                config.insertion_disabled,
                config.deletion_disabled,
            )?;
            if let Some(energy) = outcome.energy {
                *running_energy += energy;
            }
            if let Some(f) = factor {
                let lambda = &mut state.components[component].lambda;
                lambda.record_visit();
                lambda.wang_landau_update(f);
            }
        }

        if let (Some(f), Some(wl)) = (factor.as_mut(), config.wang_landau) {
            if cycle % wl.reduce_every.max(1) == 0 {
                *f *= wl.reduction;
                for move_state in &mut state.components {
                    move_state.lambda.normalize_bias();
                    move_state.lambda.clear_histogram();
                }
                info!(cycle, factor = *f, "Reduced Wang-Landau modification factor.");
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    for move_state in &mut state.components {
        move_state.lambda.normalize_bias();
        move_state.lambda.clear_histogram();
        move_state.statistics.clear_block();
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(())
}

fn produce<R, K>(
    random: &mut R,
    state: &mut SimulationState,
    config: &SimulationConfig,
    kernels: &K,
    reporter: &ProgressReporter,
    running_energy: &mut RunningEnergy,
) -> Result<Vec<f64>, EngineError>
where
    R: RandomSource + ?Sized,
    K: EnergyKernels + ?Sized,
{
    reporter.report(Progress::PhaseStart { name: "Production" });
    reporter.report(Progress::TaskStart {
        total_steps: config.cycles as u64,
    });
    info!(cycles = config.cycles, "Starting production.");

    let mut molecule_sums = vec![0.0; state.number_of_components()];

    for cycle in 1..=config.cycles {
        for _ in 0..steps_per_cycle(state) {
            let component = random.uniform_index(state.number_of_components());
            let macrostate = state.system.number_of_integer_molecules(component);
            let outcome = swap_move_cfcmc(
                random,
                state,
                kernels,
                component,
                config.insertion_disabled,
                config.deletion_disabled,
            )?;
            if let Some(energy) = outcome.energy {
                *running_energy += energy;
            }
            state.tmmc.update_collection_matrix(&outcome.probabilities, macrostate);
            state
                .tmmc
                .record_visit(state.system.number_of_integer_molecules(component));
            state.components[component].lambda.record_visit();
        }

        for (component, sum) in molecule_sums.iter_mut().enumerate() {
            *sum += state.system.number_of_integer_molecules(component) as f64;
        }
        if state.tmmc.is_enabled() && cycle % state.tmmc.update_every() == 0 {
            state.tmmc.update_bias();
        }
        if cycle % config.print_every == 0 {
            report_block(state, cycle, reporter);
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(molecule_sums)
}

fn report_block(state: &mut SimulationState, cycle: usize, reporter: &ProgressReporter) {
    for (component, move_state) in state.components.iter_mut().enumerate() {
        let acceptance = SwapBranch::ALL.map(|b| move_state.statistics.block_acceptance_ratio(b));
        let report = BlockReport {
            cycle,
            component,
            integer_molecules: state.system.number_of_integer_molecules(component),
            lambda_bin: move_state.lambda.current_bin(),
            acceptance,
        };
        info!(
            cycle,
            component,
            molecules = report.integer_molecules,
            lambda_bin = report.lambda_bin,
            "Block finished."
        );
        reporter.report(Progress::Block(report));
        move_state.statistics.clear_block();
    }
}

fn finalize(
    state: SimulationState,
    config: &SimulationConfig,
    molecule_sums: Vec<f64>,
    initial_energy: RunningEnergy,
    running_energy: RunningEnergy,
    final_energy: RunningEnergy,
) -> SimulationResult {
    let SimulationState {
        system,
        components,
        tmmc,
        ..
    } = state;
    let cycles = config.cycles.max(1) as f64;
    let components = components
        .into_iter()
        .zip(molecule_sums)
        .zip(&system.components)
        .map(|((move_state, sum), species)| ComponentResult {
            name: species.name.clone(),
            free_energy_profile: move_state.lambda.free_energy_profile(),
            lambda_histogram: move_state.lambda.histogram().to_vec(),
            lambda_bias: move_state.lambda.bias_factor().to_vec(),
            statistics: move_state.statistics,
            cpu_time: move_state.cpu_time,
            average_molecules: sum / cycles,
        })
        .collect();

    SimulationResult {
        components,
        tmmc,
        initial_energy,
        running_energy,
        final_energy,
        system,
    }
}
