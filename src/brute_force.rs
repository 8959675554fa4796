use crate::config::{Config, BRUTE_FORCE_HARD_LIMIT};
use crate::formula::Instance;
use crate::valuation::{evaluate, Valuation};
use log::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub enum BruteForce {
    Optimal { weight: f64, valuation: Valuation },
    /// Too many variables to enumerate; nothing was attempted.
    Skipped { num_variables: usize },
}

impl BruteForce {
    pub fn weight(&self) -> Option<f64> {
        match self {
            BruteForce::Optimal { weight, .. } => Some(*weight),
            BruteForce::Skipped { .. } => None,
        }
    }
}

/// Whether the exact baseline will enumerate an instance with `num_variables` variables.
pub fn applicable(num_variables: usize, config: &Config) -> bool {
    num_variables <= config.brute_force_limit()
}

/// Exact optimum by trying all `2^n` assignments. Ties keep the first pattern,
/// counting up from all-false.
pub fn solve_brute_force(instance: &Instance, config: &Config) -> BruteForce {
    let num_variables = instance.num_variables();
    if !applicable(num_variables, config) {
        debug!(
            "brute force skipped: {} variables, limit {}",
            num_variables,
            config.brute_force_limit()
        );
        return BruteForce::Skipped { num_variables };
    }
    debug_assert!(num_variables <= BRUTE_FORCE_HARD_LIMIT);

    let total = 1u64 << num_variables;
    let step = config.progress_min_step.max(total / 100).max(1);

    let mut valuation = Valuation::new(num_variables);
    let mut best_weight = f64::NEG_INFINITY;
    let mut best_bits = 0u64;
    for bits in 0..total {
        if bits != 0 && bits % step == 0 {
            info!(
                "brute-force progress: {:.1}% ({}/{})",
                bits as f64 / total as f64 * 100.0,
                bits,
                total
            );
        }
        valuation.set_bits(bits);
        let weight = evaluate(&valuation, instance.clauses());
        if weight > best_weight {
            best_weight = weight;
            best_bits = bits;
        }
    }
    debug!("brute force: optimum {} over {} assignments", best_weight, total);

    BruteForce::Optimal {
        weight: best_weight,
        valuation: Valuation::from_bits(num_variables, best_bits),
    }
}
