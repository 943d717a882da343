use lambdaswap::engine::config::WangLandauConfig;

pub struct DefaultsConfig {
    pub cycles: usize,
    pub equilibration_cycles: usize,
    pub print_every: usize,
    pub seed: u64,
    pub replicas: usize,
    pub lambda_bins: usize,
    pub wang_landau: WangLandauConfig,
    pub tmmc_use_bias: bool,
    pub tmmc_update_every: usize,
    pub mol_fraction: f64,
    pub initial_molecules: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cycles: 10_000,
            equilibration_cycles: 0,
            print_every: 1000,
            seed: 42,
            replicas: 1,
            lambda_bins: 21,
            wang_landau: WangLandauConfig::default(),
            tmmc_use_bias: true,
            tmmc_update_every: 1000,
            mol_fraction: 1.0,
            initial_molecules: 0,
        }
    }
}
