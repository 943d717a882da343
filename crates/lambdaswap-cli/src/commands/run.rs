use crate::cli::RunArgs;
use crate::config::builder::build_config;
use crate::config::models::{AtomSpec, SystemSpec};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use lambdaswap::core::forcefield::params::ForceField;
use lambdaswap::core::interactions::Interactions;
use lambdaswap::core::models::atom::Atom;
use lambdaswap::core::models::component::{BlockedPocket, Component, TemplateAtom};
use lambdaswap::core::models::simulation_box::SimulationBox;
use lambdaswap::core::models::system::System;
use lambdaswap::engine::config::SimulationConfig;
use lambdaswap::engine::progress::ProgressReporter;
use lambdaswap::engine::statistics::SwapBranch;
use lambdaswap::workflows::simulate::{self, ComponentResult, SimulationResult};
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct LambdaRow {
    bin: usize,
    lambda: f64,
    visits: f64,
    bias: f64,
    free_energy: Option<f64>,
}

#[derive(Debug, Serialize)]
struct MacrostateRow {
    molecules: usize,
    ln_pi: f64,
    visits: f64,
}

pub fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    info!("Loading force field from {:?}", &app.forcefield_path);
    let forcefield = ForceField::load(&app.forcefield_path)?;
    let system = build_system(&app.system, forcefield, &app.core_config)?;

    let names: Vec<String> = system.components.iter().map(|c| c.name.clone()).collect();
    let progress_handler = CliProgressHandler::new(names);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting {} replica(s) of {} cycles...",
        app.replicas, app.core_config.cycles
    );
    let results = if app.replicas == 1 {
        vec![simulate::run(system, &app.core_config, &Interactions, &reporter)?]
    } else {
        simulate::run_replicas(&system, &app.core_config, &Interactions, app.replicas, &reporter)?
    };
    info!("Workflow finished, received {} result(s).", results.len());

    std::fs::create_dir_all(&app.output_dir)?;
    for (i, result) in results.iter().enumerate() {
        let replica = (results.len() > 1).then_some(i + 1);
        print_summary(result, replica);
        write_results(&app.output_dir, result, replica)?;
    }
    println!("Results written to {}", app.output_dir.display());
    Ok(())
}

fn resolve_type(forcefield: &ForceField, name: &str) -> Result<u16> {
    forcefield.type_index(name).ok_or_else(|| {
        CliError::Config(format!("pseudo atom type '{name}' is not defined in the force field"))
    })
}

fn framework_atom(forcefield: &ForceField, spec: &AtomSpec) -> Result<Atom> {
    let [x, y, z] = spec.position;
    Ok(Atom::new(
        Point3::new(x, y, z),
        spec.charge,
        1.0,
        0,
        resolve_type(forcefield, &spec.type_name)?,
        0,
        0,
    ))
}

/// Resolves the textual system description against `forcefield` and fills
/// each component with its initial integer molecules at random positions.
pub fn build_system(
    spec: &SystemSpec,
    forcefield: ForceField,
    config: &SimulationConfig,
) -> Result<System> {
    if spec.components.len() > usize::from(u8::MAX) + 1 {
        return Err(CliError::Config(format!(
            "at most 256 components are supported, got {}",
            spec.components.len()
        )));
    }

    let framework_atoms = spec
        .framework
        .iter()
        .map(|a| framework_atom(&forcefield, a))
        .collect::<Result<Vec<_>>>()?;

    let mut components = Vec::with_capacity(spec.components.len());
    for component_spec in &spec.components {
        let template = component_spec
            .atoms
            .iter()
            .map(|a| {
                let atom_type = resolve_type(&forcefield, &a.type_name)?;
                Ok(TemplateAtom {
                    offset: Vector3::from(a.position),
                    atom_type,
                    charge: a.charge,
                    mass: forcefield.mass_of(atom_type),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut component = Component::new(component_spec.name.clone(), template);
        component.recenter_template();
        component.mol_fraction = component_spec.mol_fraction;
        component.fugacity_coefficient = component_spec.fugacity_coefficient;
        component.blocked_pockets = component_spec
            .blocked_pockets
            .iter()
            .map(|&(center, radius)| BlockedPocket {
                center: Point3::from(center),
                radius,
            })
            .collect();
        components.push(component);
    }

    let [a, b, c] = spec.box_lengths;
    let mut system = System::new(
        SimulationBox::new(a, b, c),
        forcefield,
        components,
        config.temperature,
        config.pressure,
    );
    system.external_field = spec.external_field;
    system.framework_atoms = framework_atoms;

    let mut random = StdRng::seed_from_u64(config.seed);
    for (index, component_spec) in spec.components.iter().enumerate() {
        for _ in 0..component_spec.initial_molecules {
            let (molecule, atoms) = system.components[index].random_molecule_in_box(
                index as u8,
                &mut random,
                &system.simulation_box,
            );
            system.insert_molecule(index, molecule, &atoms);
        }
    }
    Ok(system)
}

fn print_summary(result: &SimulationResult, replica: Option<usize>) {
    if let Some(replica) = replica {
        println!("Replica {replica}:");
    }
    for component in &result.components {
        println!(
            "  {}: <N> = {:.4}, acceptance ins/del/lambda {:.3}/{:.3}/{:.3}",
            component.name,
            component.average_molecules,
            component.statistics.acceptance_ratio(SwapBranch::Insertion),
            component.statistics.acceptance_ratio(SwapBranch::Deletion),
            component.statistics.acceptance_ratio(SwapBranch::LambdaChange),
        );
        info!("{}: swap move statistics\n{}\n{}", component.name, component.statistics, component.cpu_time);
    }
    let drift = result.energy_drift();
    println!(
        "  energy {:.6} K (drift {:.3e} K)",
        result.final_energy.potential_energy(),
        drift
    );
    if drift.abs() > 1e-6 * result.final_energy.potential_energy().abs().max(1.0) {
        warn!(drift, "Energy drift exceeds tolerance.");
    }
}

fn output_path(dir: &Path, stem: &str, replica: Option<usize>) -> PathBuf {
    match replica {
        Some(r) => dir.join(format!("{stem}_r{r}.csv")),
        None => dir.join(format!("{stem}.csv")),
    }
}

fn lambda_rows(component: &ComponentResult) -> impl Iterator<Item = LambdaRow> + '_ {
    let bins = component.lambda_histogram.len().max(1) as f64;
    component
        .lambda_histogram
        .iter()
        .zip(&component.lambda_bias)
        .zip(&component.free_energy_profile)
        .enumerate()
        .map(move |(bin, ((&visits, &bias), &free_energy))| LambdaRow {
            bin,
            lambda: bin as f64 / bins,
            visits,
            bias,
            free_energy,
        })
}

/// Writes `lambda_<component>.csv` for every component and, when TMMC is
/// enabled, `tmmc.csv`. Replicas get an `_r<k>` suffix.
pub fn write_results(dir: &Path, result: &SimulationResult, replica: Option<usize>) -> Result<()> {
    for component in &result.components {
        let path = output_path(dir, &format!("lambda_{}", component.name), replica);
        info!("Writing lambda histogram to {:?}", &path);
        let mut writer = csv::Writer::from_path(&path)?;
        for row in lambda_rows(component) {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    if result.tmmc.is_enabled() {
        let path = output_path(dir, "tmmc", replica);
        info!("Writing macrostate distribution to {:?}", &path);
        let mut writer = csv::Writer::from_path(&path)?;
        for (molecules, ln_pi, visits) in result.tmmc.macrostate_rows() {
            writer.serialize(MacrostateRow {
                molecules,
                ln_pi,
                visits,
            })?;
        }
        writer.flush()?;
    }
    Ok(())
}
