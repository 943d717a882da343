use super::defaults::DefaultsConfig;
use super::file::{
    FileAtom, FileComponent, FileConfig, FileLambdaConfig, FileSimulationConfig, FileTmmcConfig,
};
use super::models::{AppConfig, AtomSpec, ComponentSpec, SystemSpec};
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use lambdaswap::engine::config::{SimulationConfigBuilder, TmmcConfig, WangLandauConfig};
use std::path::{Path, PathBuf};

/// Merges command-line flags, the simulation file and built-in defaults, in
/// that order of precedence.
pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.config)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let base_dir = args.config.parent().unwrap_or_else(|| Path::new("."));

    let forcefield_path = match (&args.forcefield, file_config.forcefield.take()) {
        (Some(cli), _) => existing_path(cli.clone())?,
        (None, Some(file)) => existing_path(base_dir.join(file))?,
        (None, None) => {
            return Err(CliError::Config(
                "No force field given. Set `forcefield` in the simulation file or pass --forcefield."
                    .to_string(),
            ));
        }
    };

    let sim = file_config.simulation.take().unwrap_or_default();
    let lambda = file_config.lambda.take().unwrap_or_default();

    let temperature = sim
        .temperature
        .ok_or_else(|| CliError::Config("`simulation.temperature` is required".to_string()))?;
    let pressure = sim
        .pressure
        .ok_or_else(|| CliError::Config("`simulation.pressure` is required".to_string()))?;

    let replicas = args
        .replicas
        .or(sim.replicas)
        .unwrap_or(defaults.replicas);
    if replicas == 0 {
        return Err(CliError::Argument("at least one replica is required".to_string()));
    }

    let mut builder = SimulationConfigBuilder::new()
        .temperature(temperature)
        .pressure(pressure)
        .cycles(args.cycles.or(sim.cycles).unwrap_or(defaults.cycles))
        .equilibration_cycles(
            args.equilibration_cycles
                .or(sim.equilibration_cycles)
                .unwrap_or(defaults.equilibration_cycles),
        )
        .print_every(sim.print_every.unwrap_or(defaults.print_every))
        .seed(args.seed.or(sim.seed).unwrap_or(defaults.seed))
        .lambda_bins(lambda.bins.unwrap_or(defaults.lambda_bins))
        .insertion_disabled(args.no_insertion || sim.insertion_disabled.unwrap_or(false))
        .deletion_disabled(args.no_deletion || sim.deletion_disabled.unwrap_or(false));
    if let Some(max_change) = lambda.max_bin_change {
        builder = builder.max_bin_change(max_change);
    }
    if let Some(wang_landau) = merge_wang_landau(&lambda, &defaults) {
        builder = builder.wang_landau(wang_landau);
    }
    if let Some(tmmc) = file_config.tmmc.take() {
        builder = builder.tmmc(merge_tmmc(tmmc, &defaults)?);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let system = build_system_spec(file_config, &defaults)?;

    Ok(AppConfig {
        forcefield_path,
        output_dir: args.output.clone(),
        replicas,
        system,
        core_config,
    })
}

fn existing_path(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Provided path does not exist: {}", path.display()),
        )));
    }
    Ok(path)
}

fn merge_wang_landau(lambda: &FileLambdaConfig, defaults: &DefaultsConfig) -> Option<WangLandauConfig> {
    let file = lambda.wang_landau.as_ref()?;
    Some(WangLandauConfig {
        initial_factor: file
            .initial_factor
            .unwrap_or(defaults.wang_landau.initial_factor),
        reduction: file.reduction.unwrap_or(defaults.wang_landau.reduction),
        reduce_every: file
            .reduce_every
            .unwrap_or(defaults.wang_landau.reduce_every),
    })
}

fn merge_tmmc(file: FileTmmcConfig, defaults: &DefaultsConfig) -> Result<TmmcConfig> {
    Ok(TmmcConfig {
        min_macrostate: file
            .min_macrostate
            .ok_or_else(|| CliError::Config("`tmmc` requires `min-macrostate`".to_string()))?,
        max_macrostate: file
            .max_macrostate
            .ok_or_else(|| CliError::Config("`tmmc` requires `max-macrostate`".to_string()))?,
        use_bias: file.use_bias.unwrap_or(defaults.tmmc_use_bias),
        update_every: file.update_every.unwrap_or(defaults.tmmc_update_every),
    })
}

fn atom_spec(atom: FileAtom) -> AtomSpec {
    AtomSpec {
        type_name: atom.atom_type,
        position: atom.position,
        charge: atom.charge,
    }
}

fn component_spec(component: FileComponent, defaults: &DefaultsConfig) -> Result<ComponentSpec> {
    if component.atoms.is_empty() {
        return Err(CliError::Config(format!(
            "component '{}' has no atoms",
            component.name
        )));
    }
    Ok(ComponentSpec {
        name: component.name,
        mol_fraction: component.mol_fraction.unwrap_or(defaults.mol_fraction),
        fugacity_coefficient: component.fugacity_coefficient,
        initial_molecules: component
            .initial_molecules
            .unwrap_or(defaults.initial_molecules),
        atoms: component.atoms.into_iter().map(atom_spec).collect(),
        blocked_pockets: component
            .blocked_pockets
            .into_iter()
            .map(|p| (p.center, p.radius))
            .collect(),
    })
}

fn build_system_spec(file_config: FileConfig, defaults: &DefaultsConfig) -> Result<SystemSpec> {
    let simulation_box = file_config
        .simulation_box
        .ok_or_else(|| CliError::Config("`box.lengths` is required".to_string()))?;
    if simulation_box.lengths.iter().any(|&l| l <= 0.0) {
        return Err(CliError::Config(format!(
            "box lengths must be positive, got {:?}",
            simulation_box.lengths
        )));
    }
    if file_config.components.is_empty() {
        return Err(CliError::Config(
            "at least one `[[components]]` entry is required".to_string(),
        ));
    }

    Ok(SystemSpec {
        box_lengths: simulation_box.lengths,
        external_field: file_config.external_field,
        framework: file_config.framework.into_iter().map(atom_spec).collect(),
        components: file_config
            .components
            .into_iter()
            .map(|c| component_spec(c, defaults))
            .collect::<Result<_>>()?,
    })
}

fn simulation(config: &mut FileConfig) -> &mut FileSimulationConfig {
    config.simulation.get_or_insert_with(Default::default)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        let float = |expected| parser::parse_value::<f64>(key, value, expected);
        let integer = |expected| parser::parse_value::<usize>(key, value, expected);
        let flag = |expected| parser::parse_value::<bool>(key, value, expected);
        let to_config = |e: parser::ParseError| CliError::Config(e.to_string());

        match key {
            "forcefield" => config.forcefield = Some(PathBuf::from(value)),
            "simulation.temperature" => {
                let v = float("number").map_err(to_config)?;
                simulation(&mut config).temperature = Some(v);
            }
            "simulation.pressure" => {
                let v = float("number").map_err(to_config)?;
                simulation(&mut config).pressure = Some(v);
            }
            "simulation.cycles" => {
                let v = integer("integer").map_err(to_config)?;
                simulation(&mut config).cycles = Some(v);
            }
            "simulation.equilibration-cycles" => {
                let v = integer("integer").map_err(to_config)?;
                simulation(&mut config).equilibration_cycles = Some(v);
            }
            "simulation.print-every" => {
                let v = integer("integer").map_err(to_config)?;
                simulation(&mut config).print_every = Some(v);
            }
            "simulation.seed" => {
                let v = parser::parse_value::<u64>(key, value, "integer").map_err(to_config)?;
                simulation(&mut config).seed = Some(v);
            }
            "simulation.replicas" => {
                let v = integer("integer").map_err(to_config)?;
                simulation(&mut config).replicas = Some(v);
            }
            "simulation.insertion-disabled" => {
                let v = flag("boolean").map_err(to_config)?;
                simulation(&mut config).insertion_disabled = Some(v);
            }
            "simulation.deletion-disabled" => {
                let v = flag("boolean").map_err(to_config)?;
                simulation(&mut config).deletion_disabled = Some(v);
            }
            "lambda.bins" => {
                let v = integer("integer").map_err(to_config)?;
                config.lambda.get_or_insert_with(Default::default).bins = Some(v);
            }
            "lambda.max-bin-change" => {
                let v = integer("integer").map_err(to_config)?;
                config.lambda.get_or_insert_with(Default::default).max_bin_change = Some(v);
            }
            "tmmc.min-macrostate" => {
                let v = integer("integer").map_err(to_config)?;
                config.tmmc.get_or_insert_with(Default::default).min_macrostate = Some(v);
            }
            "tmmc.max-macrostate" => {
                let v = integer("integer").map_err(to_config)?;
                config.tmmc.get_or_insert_with(Default::default).max_macrostate = Some(v);
            }
            "tmmc.use-bias" => {
                let v = flag("boolean").map_err(to_config)?;
                config.tmmc.get_or_insert_with(Default::default).use_bias = Some(v);
            }
            "tmmc.update-every" => {
                let v = integer("integer").map_err(to_config)?;
                config.tmmc.get_or_insert_with(Default::default).update_every = Some(v);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{key}'"
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
        forcefield = "ff.toml"

        [simulation]
        temperature = 300.0
        pressure = 1e5

        [box]
        lengths = [30.0, 30.0, 30.0]

        [[components]]
        name = "methane"
        atoms = [{ type = "CH4", position = [0.0, 0.0, 0.0] }]
    "#;

    fn write_inputs(simulation: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ff.toml"), "").unwrap();
        let path = dir.path().join("simulation.toml");
        fs::write(&path, simulation).unwrap();
        (dir, path)
    }

    fn run_args(config: &Path, extra: &[&str]) -> RunArgs {
        let mut argv = vec![
            "lambdaswap".to_string(),
            "run".to_string(),
            "-c".to_string(),
            config.to_string_lossy().to_string(),
            "-o".to_string(),
            "out".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    fn minimal_file_is_completed_with_defaults() {
        let (dir, path) = write_inputs(MINIMAL);
        let app = build_config(&run_args(&path, &[])).unwrap();

        assert_eq!(app.forcefield_path, dir.path().join("ff.toml"));
        assert_eq!(app.replicas, 1);
        assert_eq!(app.output_dir, PathBuf::from("out"));
        let core = &app.core_config;
        assert_eq!(core.temperature, 300.0);
        assert_eq!(core.cycles, 10_000);
        assert_eq!(core.seed, 42);
        assert_eq!(core.lambda_bins, 21);
        assert_eq!(core.max_bin_change, 10);
        assert!(core.tmmc.is_none());
        assert!(core.wang_landau.is_none());
        assert!(!core.insertion_disabled);

        let methane = &app.system.components[0];
        assert_eq!(methane.mol_fraction, 1.0);
        assert_eq!(methane.initial_molecules, 0);
        assert_eq!(methane.atoms[0].type_name, "CH4");
    }

    #[test]
    fn command_line_overrides_file_values() {
        let (_dir, path) = write_inputs(&format!("{MINIMAL}\n[lambda]\nbins = 11\n"));
        let app = build_config(&run_args(
            &path,
            &["--cycles", "5", "--seed", "9", "-r", "3", "--no-deletion"],
        ))
        .unwrap();

        assert_eq!(app.core_config.cycles, 5);
        assert_eq!(app.core_config.seed, 9);
        assert_eq!(app.core_config.lambda_bins, 11);
        assert_eq!(app.replicas, 3);
        assert!(app.core_config.deletion_disabled);
    }

    #[test]
    fn set_values_override_the_file() {
        let (_dir, path) = write_inputs(MINIMAL);
        let app = build_config(&run_args(
            &path,
            &[
                "-S",
                "simulation.temperature=250",
                "-S",
                "tmmc.min-macrostate=0",
                "-S",
                "tmmc.max-macrostate=8",
                "-S",
                "tmmc.use-bias=false",
            ],
        ))
        .unwrap();

        assert_eq!(app.core_config.temperature, 250.0);
        let tmmc = app.core_config.tmmc.unwrap();
        assert_eq!(tmmc.max_macrostate, 8);
        assert!(!tmmc.use_bias);
        assert_eq!(tmmc.update_every, 1000);
    }

    #[test]
    fn wang_landau_section_is_completed_with_defaults() {
        let (_dir, path) = write_inputs(&format!(
            "{MINIMAL}\n[lambda]\nbins = 5\n[lambda.wang-landau]\nreduction = 0.8\n"
        ));
        let app = build_config(&run_args(&path, &[])).unwrap();
        let wang_landau = app.core_config.wang_landau.unwrap();
        assert_eq!(wang_landau.reduction, 0.8);
        assert_eq!(wang_landau.initial_factor, 1.0);
    }

    #[test]
    fn invalid_set_values_are_reported() {
        let (_dir, path) = write_inputs(MINIMAL);
        for bad in ["cycles", "simulation.cycles=many", "simulation.colour=blue"] {
            let result = build_config(&run_args(&path, &["-S", bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "{bad} accepted");
        }
    }

    #[test]
    fn missing_required_values_are_reported() {
        let (_dir, path) = write_inputs(&MINIMAL.replace("temperature = 300.0", ""));
        let err = build_config(&run_args(&path, &[])).err().unwrap();
        assert!(err.to_string().contains("simulation.temperature"));

        let (_dir, path) = write_inputs(&format!("{MINIMAL}\n[tmmc]\nmax-macrostate = 4\n"));
        let err = build_config(&run_args(&path, &[])).err().unwrap();
        assert!(err.to_string().contains("min-macrostate"));
    }

    #[test]
    fn missing_forcefield_file_is_an_io_error() {
        let (_dir, path) = write_inputs(&MINIMAL.replace("ff.toml", "absent.toml"));
        assert!(matches!(
            build_config(&run_args(&path, &[])),
            Err(CliError::Io(_))
        ));
    }

    #[test]
    fn zero_replicas_is_rejected() {
        let (_dir, path) = write_inputs(MINIMAL);
        assert!(matches!(
            build_config(&run_args(&path, &["-r", "0"])),
            Err(CliError::Argument(_))
        ));
    }
}
