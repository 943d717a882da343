use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Inclusive macrostate window and biasing mode for Transition-Matrix Monte Carlo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TmmcConfig {
    pub min_macrostate: usize,
    pub max_macrostate: usize,
    /// Apply the macrostate bias to acceptance, not just collect transitions.
    pub use_bias: bool,
    /// Recompute the bias from the collection matrix every this many cycles.
    pub update_every: usize,
}

/// Wang-Landau adaptation of the lambda bias during equilibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WangLandauConfig {
    pub initial_factor: f64,
    /// Multiplier applied to the modification factor whenever it is reduced.
    pub reduction: f64,
    /// Number of cycles between reductions.
    pub reduce_every: usize,
}

impl Default for WangLandauConfig {
    fn default() -> Self {
        Self {
            initial_factor: 1.0,
            reduction: 0.5,
            reduce_every: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Temperature in K.
    pub temperature: f64,
    /// Reservoir pressure in Pa.
    pub pressure: f64,
    pub cycles: usize,
    pub equilibration_cycles: usize,
    pub print_every: usize,
    pub seed: u64,
    pub lambda_bins: usize,
    pub max_bin_change: usize,
    pub wang_landau: Option<WangLandauConfig>,
    pub tmmc: Option<TmmcConfig>,
    pub insertion_disabled: bool,
    pub deletion_disabled: bool,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    temperature: Option<f64>,
    pressure: Option<f64>,
    cycles: Option<usize>,
    equilibration_cycles: Option<usize>,
    print_every: Option<usize>,
    seed: Option<u64>,
    lambda_bins: Option<usize>,
    max_bin_change: Option<usize>,
    wang_landau: Option<WangLandauConfig>,
    tmmc: Option<TmmcConfig>,
    insertion_disabled: bool,
    deletion_disabled: bool,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
    pub fn pressure(mut self, pascal: f64) -> Self {
        self.pressure = Some(pascal);
        self
    }
    pub fn cycles(mut self, cycles: usize) -> Self {
        self.cycles = Some(cycles);
        self
    }
    pub fn equilibration_cycles(mut self, cycles: usize) -> Self {
        self.equilibration_cycles = Some(cycles);
        self
    }
    pub fn print_every(mut self, cycles: usize) -> Self {
        self.print_every = Some(cycles);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn lambda_bins(mut self, bins: usize) -> Self {
        self.lambda_bins = Some(bins);
        self
    }
    pub fn max_bin_change(mut self, bins: usize) -> Self {
        self.max_bin_change = Some(bins);
        self
    }
    pub fn wang_landau(mut self, config: WangLandauConfig) -> Self {
        self.wang_landau = Some(config);
        self
    }
    pub fn tmmc(mut self, config: TmmcConfig) -> Self {
        self.tmmc = Some(config);
        self
    }
    pub fn insertion_disabled(mut self, disabled: bool) -> Self {
        self.insertion_disabled = disabled;
        self
    }
    pub fn deletion_disabled(mut self, disabled: bool) -> Self {
        self.deletion_disabled = disabled;
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let temperature = self
            .temperature
            .ok_or(ConfigError::MissingParameter("temperature"))?;
        if temperature <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "temperature",
                reason: format!("must be positive, got {temperature}"),
            });
        }
        let lambda_bins = self
            .lambda_bins
            .ok_or(ConfigError::MissingParameter("lambda_bins"))?;
        if lambda_bins == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "lambda_bins",
                reason: "at least one bin is required".to_string(),
            });
        }
        let max_bin_change = self.max_bin_change.unwrap_or(lambda_bins / 2);
        if max_bin_change >= lambda_bins {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_bin_change",
                reason: format!("must be smaller than the number of bins ({lambda_bins})"),
            });
        }
        if let Some(tmmc) = &self.tmmc {
            if tmmc.min_macrostate > tmmc.max_macrostate {
                return Err(ConfigError::InvalidParameter {
                    parameter: "tmmc",
                    reason: format!(
                        "min macrostate {} exceeds max macrostate {}",
                        tmmc.min_macrostate, tmmc.max_macrostate
                    ),
                });
            }
        }

        Ok(SimulationConfig {
            temperature,
            pressure: self
                .pressure
                .ok_or(ConfigError::MissingParameter("pressure"))?,
            cycles: self.cycles.ok_or(ConfigError::MissingParameter("cycles"))?,
            equilibration_cycles: self.equilibration_cycles.unwrap_or(0),
            print_every: self.print_every.unwrap_or(1000).max(1),
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            lambda_bins,
            max_bin_change,
            wang_landau: self.wang_landau,
            tmmc: self.tmmc,
            insertion_disabled: self.insertion_disabled,
            deletion_disabled: self.deletion_disabled,
        })
    }
}
