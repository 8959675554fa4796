pub mod defaults;

pub type Tolerance = f64;

/// Enumeration past 63 variables would overflow the 64-bit pattern counter.
pub const BRUTE_FORCE_HARD_LIMIT: usize = 63;

#[derive(Debug, Clone)]
pub struct Config {
    /// Pivot and ratio-test tolerance for the simplex solver.
    pub epsilon: Tolerance,
    /// Largest variable count the exact baseline will enumerate, capped at `BRUTE_FORCE_HARD_LIMIT`.
    pub brute_force_max_variables: usize,
    /// Fewest patterns enumerated between two progress reports.
    pub progress_min_step: u64,
    /// Sampled rounding draws, zero to skip sampling.
    pub rounding_samples: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        use defaults::*;
        Config {
            epsilon: EPSILON,
            brute_force_max_variables: BRUTE_FORCE_MAX_VARIABLES,
            progress_min_step: PROGRESS_MIN_STEP,
            rounding_samples: ROUNDING_SAMPLES,
            seed: RNG_SEED,
        }
    }
}

impl Config {
    pub fn brute_force_limit(&self) -> usize {
        self.brute_force_max_variables.min(BRUTE_FORCE_HARD_LIMIT)
    }
}
