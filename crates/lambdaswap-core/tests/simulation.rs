use lambdaswap::core::forcefield::params::ForceField;
use lambdaswap::core::interactions::Interactions;
use lambdaswap::core::models::component::{Component, TemplateAtom};
use lambdaswap::core::models::simulation_box::SimulationBox;
use lambdaswap::core::models::system::System;
use lambdaswap::engine::config::{SimulationConfigBuilder, TmmcConfig};
use lambdaswap::engine::progress::ProgressReporter;
use lambdaswap::engine::statistics::SwapBranch;
use lambdaswap::workflows::simulate::{self, SimulationResult};
use nalgebra::Vector3;

fn forcefield(ewald: bool) -> ForceField {
    let mut source = String::from(
        r#"
        cutoff-vdw = 7.0
        cutoff-charge = 7.0
        use-tail-corrections = true

        [[pseudo-atoms]]
        name = "CH4"
        epsilon = 158.5
        sigma = 3.72
        mass = 16.04

        [[pseudo-atoms]]
        name = "O"
        epsilon = 79.0
        sigma = 3.05
        mass = 16.0
        "#,
    );
    if ewald {
        source.push_str(
            r#"
        [ewald]
        alpha = 0.3
        kmax = [4, 4, 4]
        "#,
        );
    }
    toml::from_str(&source).unwrap()
}

fn methane() -> Component {
    Component::new(
        "methane",
        vec![TemplateAtom {
            offset: Vector3::zeros(),
            atom_type: 0,
            charge: 0.0,
            mass: 16.04,
        }],
    )
}

fn polar_dimer() -> Component {
    let mut component = Component::new(
        "dimer",
        vec![
            TemplateAtom {
                offset: Vector3::new(-0.6, 0.0, 0.0),
                atom_type: 1,
                charge: 0.4,
                mass: 16.0,
            },
            TemplateAtom {
                offset: Vector3::new(0.6, 0.0, 0.0),
                atom_type: 1,
                charge: -0.4,
                mass: 16.0,
            },
        ],
    );
    component.recenter_template();
    component
}

fn assert_consistent(result: &SimulationResult) {
    let scale = result.final_energy.potential_energy().abs().max(1.0);
    assert!(
        result.energy_drift().abs() < 1e-6 * scale,
        "drift {} for energy {}",
        result.energy_drift(),
        result.final_energy.potential_energy()
    );

    let system = &result.system;
    for component in 0..system.number_of_components() {
        assert_eq!(system.number_of_fractional_molecules(component), 1);
        assert!(system.molecule_atoms(component, 0).iter().all(|a| a.is_fractional));
        for slot in 1..system.number_of_molecules(component) {
            let atoms = system.molecule_atoms(component, slot);
            assert!(atoms.iter().all(|a| !a.is_fractional && a.scaling_vdw == 1.0));
            assert!(atoms.iter().all(|a| a.molecule_id as usize == slot));
        }
    }
}

#[test]
fn lennard_jones_fluid_keeps_energy_and_fractional_slot_consistent() {
    let system = System::new(SimulationBox::cubic(20.0), forcefield(false), vec![methane()], 300.0, 5e6);
    let config = SimulationConfigBuilder::new()
        .temperature(300.0)
        .pressure(5e6)
        .cycles(40)
        .equilibration_cycles(10)
        .seed(3)
        .lambda_bins(10)
        .build()
        .unwrap();

    let result = simulate::run(system, &config, &Interactions, &ProgressReporter::new()).unwrap();

    assert_consistent(&result);
    let methane = &result.components[0];
    assert!(methane.statistics.total_counts.iter().sum::<u64>() > 0);
    assert!(methane.statistics.total_accepted[SwapBranch::LambdaChange as usize] > 0);
    assert!(methane.lambda_histogram.iter().sum::<f64>() > 0.0);
    assert!(methane.average_molecules >= 0.0);
}

#[test]
fn charged_molecules_with_ewald_keep_energy_consistent() {
    let system = System::new(SimulationBox::cubic(16.0), forcefield(true), vec![polar_dimer()], 300.0, 5e6);
    let config = SimulationConfigBuilder::new()
        .temperature(300.0)
        .pressure(5e6)
        .cycles(30)
        .seed(11)
        .lambda_bins(8)
        .max_bin_change(3)
        .build()
        .unwrap();

    let result = simulate::run(system, &config, &Interactions, &ProgressReporter::new()).unwrap();

    assert_consistent(&result);
    assert!(result.final_energy.ewald_self <= 0.0);
}

#[test]
fn tmmc_window_limits_the_molecule_count_of_two_components() {
    let system = System::new(
        SimulationBox::cubic(18.0),
        forcefield(false),
        vec![methane(), polar_dimer()],
        300.0,
        5e6,
    );
    let config = SimulationConfigBuilder::new()
        .temperature(300.0)
        .pressure(5e6)
        .cycles(30)
        .seed(5)
        .lambda_bins(10)
        .tmmc(TmmcConfig {
            min_macrostate: 0,
            max_macrostate: 3,
            use_bias: true,
            update_every: 10,
        })
        .build()
        .unwrap();

    let result = simulate::run(system, &config, &Interactions, &ProgressReporter::new()).unwrap();

    assert_consistent(&result);
    for component in 0..2 {
        assert!(result.system.number_of_integer_molecules(component) <= 3);
    }
    assert_eq!(result.tmmc.ln_pi().len(), 4);
    assert_eq!(result.components.len(), 2);
    assert_eq!(result.components[1].name, "dimer");
}
