use crate::config::{self};

pub const EPSILON: config::Tolerance = 1e-9;
pub const BRUTE_FORCE_MAX_VARIABLES: usize = 63;
pub const PROGRESS_MIN_STEP: u64 = 1 << 20;
pub const ROUNDING_SAMPLES: usize = 0;

pub const RNG_SEED: u64 = 0;
