use crate::brute_force::{solve_brute_force, BruteForce};
use crate::config::Config;
use crate::derandomize::{derandomize_half, derandomize_lp_rounding, Derandomized};
use crate::formula::Instance;
use crate::lp::{solve_relaxation, LpRelaxation};
use crate::rounding::{best_of, Sampled};
use crate::valuation::Probabilities;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct Timings {
    pub half: Duration,
    pub lp_solve: Duration,
    pub lp_rounding: Duration,
    pub sampling: Duration,
    pub brute_force: Duration,
}

impl Timings {
    /// True when none of the approximation phases took a whole microsecond.
    pub fn below_resolution(&self) -> bool {
        [self.half, self.lp_solve, self.lp_rounding]
            .iter()
            .all(|d| d.as_micros() == 0)
    }
}

/// Average time per repeat of the approximation phases, for instances too
/// small to time in a single run. Only `half`, `lp_solve` and `lp_rounding` are filled.
pub fn benchmark(instance: &Instance, config: &Config, repeats: u32) -> Timings {
    let repeats = repeats.max(1);
    let (_, half) = timed(|| {
        for _ in 0..repeats {
            derandomize_half(instance);
        }
    });
    let (lp, lp_solve) = timed(|| {
        let mut lp = solve_relaxation(instance, config);
        for _ in 1..repeats {
            lp = solve_relaxation(instance, config);
        }
        lp
    });
    let (_, lp_rounding) = timed(|| {
        for _ in 0..repeats {
            derandomize_lp_rounding(instance, &lp.probabilities);
        }
    });
    debug!("benchmarked {} repeats", repeats);
    Timings {
        half: half / repeats,
        lp_solve: lp_solve / repeats,
        lp_rounding: lp_rounding / repeats,
        ..Timings::default()
    }
}

/// Every algorithm run once on the same instance.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub half: Derandomized,
    pub lp: LpRelaxation,
    pub lp_rounding: Derandomized,
    pub sampled: Option<Sampled>,
    pub brute_force: BruteForce,
    pub timings: Timings,
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

impl Comparison {
    pub fn run(instance: &Instance, config: &Config) -> Self {
        let (half, half_time) = timed(|| derandomize_half(instance));
        info!("derandomized 1/2: {}", half.weight);

        let (lp, lp_solve_time) = timed(|| solve_relaxation(instance, config));
        info!("LP bound: {}", lp.bound);

        let (lp_rounding, lp_rounding_time) = timed(|| derandomize_lp_rounding(instance, &lp.probabilities));
        info!("derandomized LP rounding: {}", lp_rounding.weight);

        let (sampled, sampling_time) = timed(|| {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let probabilities = Probabilities::PerVariable(lp.probabilities.clone());
            best_of(instance, &probabilities, config.rounding_samples, &mut rng)
        });

        let (brute_force, brute_force_time) = timed(|| solve_brute_force(instance, config));

        Self {
            half,
            lp,
            lp_rounding,
            sampled,
            brute_force,
            timings: Timings {
                half: half_time,
                lp_solve: lp_solve_time,
                lp_rounding: lp_rounding_time,
                sampling: sampling_time,
                brute_force: brute_force_time,
            },
        }
    }

    /// Best weight found by any approximation.
    pub fn best_approximation(&self) -> f64 {
        let mut best = self.half.weight.max(self.lp_rounding.weight);
        if let Some(s) = &self.sampled {
            best = best.max(s.weight);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{instance_strategy, p, small_instance, Clause};
    use proptest::prelude::*;
    use test_env_log::test;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn small_instance_agrees() {
        let config = Config {
            rounding_samples: 8,
            ..Config::default()
        };
        let c = Comparison::run(&small_instance(), &config);
        assert_eq!(c.half.weight, 6.0);
        assert_eq!(c.lp_rounding.weight, 6.0);
        assert!((c.lp.bound - 6.0).abs() < TOLERANCE);
        assert_eq!(c.brute_force.weight(), Some(6.0));
        assert_eq!(c.sampled.as_ref().map(|s| s.samples), Some(8));
        assert_eq!(c.best_approximation(), 6.0);
    }

    #[test]
    fn approximations_survive_skipped_baseline() {
        let f = Instance::new(64, (1..=64).map(|v| Clause::new(1.0, vec![p(v)]))).unwrap();
        let c = Comparison::run(&f, &Config::default());
        assert_eq!(c.brute_force, BruteForce::Skipped { num_variables: 64 });
        assert_eq!(c.half.weight, 64.0);
        assert_eq!(c.lp_rounding.weight, 64.0);
        assert!(c.sampled.is_none());
    }

    #[test]
    fn benchmark_fills_approximation_phases() {
        let t = benchmark(&small_instance(), &Config::default(), 3);
        assert_eq!(t.sampling, Duration::default());
        assert_eq!(t.brute_force, Duration::default());

        let zero = Timings::default();
        assert!(zero.below_resolution());
        let slow = Timings {
            lp_solve: Duration::from_millis(2),
            ..Timings::default()
        };
        assert!(!slow.below_resolution());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn proptest_ordering(f in instance_strategy()) {
            let c = Comparison::run(&f, &Config::default());
            let optimum = c.brute_force.weight().unwrap();
            prop_assert!(c.lp.bound + TOLERANCE >= optimum);
            prop_assert!(optimum + TOLERANCE >= c.best_approximation());
        }
    }
}
