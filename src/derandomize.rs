//! Method of conditional expectations.
//!
//! Variables are fixed one at a time in index order. Each is set to whichever
//! value keeps the exact conditional expectation of the satisfied weight
//! highest, with the remaining variables still drawn from `probabilities`.
//! Because the running expectation never decreases, the final weight is at
//! least the unconditional expectation of the randomized algorithm.

use crate::formula::Instance;
use crate::lp::clamp_probability;
use crate::valuation::{evaluate, expected_weight, Assignment, Probabilities, Valuation};
use log::{debug, trace};

#[derive(Clone, Debug)]
pub struct Derandomized {
    pub valuation: Valuation,
    pub weight: f64,
    /// Conditional expectation before any variable is fixed, then after each one.
    pub expectations: Vec<f64>,
}

pub fn derandomize(instance: &Instance, probabilities: &Probabilities) -> Derandomized {
    let mut valuation = Valuation::new(instance.num_variables());
    let mut expectations = Vec::with_capacity(instance.num_variables() + 1);
    expectations.push(expected_weight(&valuation, instance.clauses(), probabilities));

    for v in instance.variables() {
        valuation.set(v, Assignment::True);
        let e_true = expected_weight(&valuation, instance.clauses(), probabilities);
        valuation.set(v, Assignment::False);
        let e_false = expected_weight(&valuation, instance.clauses(), probabilities);

        // ties go to false
        let e = if e_true > e_false {
            valuation.set(v, Assignment::True);
            e_true
        } else {
            e_false
        };
        trace!(
            "x{} = {:?} (true: {}, false: {})",
            v.0,
            valuation.get(v),
            e_true,
            e_false
        );
        expectations.push(e);
    }

    debug_assert!(valuation.is_complete());
    let weight = evaluate(&valuation, instance.clauses());
    debug!(
        "derandomized: expectation {} -> weight {}",
        expectations[0], weight
    );
    Derandomized {
        valuation,
        weight,
        expectations,
    }
}

/// Derandomized uniform assignment: a 1/2-approximation when no clause is empty.
pub fn derandomize_half(instance: &Instance) -> Derandomized {
    derandomize(instance, &Probabilities::Uniform(0.5))
}

/// Derandomized rounding of LP values, where `probabilities[i]` belongs to variable `i + 1`.
/// Values are clamped into `[0, 1]` first.
pub fn derandomize_lp_rounding(instance: &Instance, probabilities: &[f64]) -> Derandomized {
    let clamped = probabilities.iter().map(|p| clamp_probability(*p)).collect();
    derandomize(instance, &Probabilities::PerVariable(clamped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::{solve_brute_force, BruteForce};
    use crate::config::Config;
    use crate::formula::{instance_strategy, n, p, small_instance, Clause, Variable};
    use proptest::prelude::*;
    use test_env_log::test;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn half_small() {
        let f = small_instance();
        let r = derandomize_half(&f);
        assert_eq!(r.valuation, Valuation::from_bits(2, 0b10));
        assert_eq!(r.weight, 6.0);
        assert_eq!(r.expectations.len(), 3);
        assert!((r.expectations[0] - 3.25).abs() < TOLERANCE);
    }

    #[test]
    fn lp_rounding_follows_probabilities() {
        let f = small_instance();
        let r = derandomize_lp_rounding(&f, &[0.0, 1.0]);
        assert_eq!(r.valuation.to_bools(), vec![false, true]);
        assert_eq!(r.weight, 6.0);
        assert!((r.expectations[0] - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn lp_rounding_clamps_out_of_range() {
        let f = small_instance();
        let noisy = derandomize_lp_rounding(&f, &[-0.5, 1.5]);
        let exact = derandomize_lp_rounding(&f, &[0.0, 1.0]);
        assert_eq!(noisy.valuation, exact.valuation);
        assert_eq!(noisy.expectations, exact.expectations);
        assert!(noisy.expectations.iter().all(|e| *e >= 0.0 && *e <= f.total_weight()));
    }

    #[test]
    fn ties_go_to_false() {
        // x1 and !x1 with equal weight: both choices give expectation 1
        let f = Instance::new(1, vec![Clause::new(1.0, vec![p(1)]), Clause::new(1.0, vec![n(1)])]).unwrap();
        let r = derandomize_half(&f);
        assert_eq!(r.valuation.get(Variable(1)), Assignment::False);
        assert_eq!(r.weight, 1.0);

        let r = derandomize_lp_rounding(&f, &[0.5]);
        assert_eq!(r.valuation.get(Variable(1)), Assignment::False);

        // a single tautological clause is indifferent to x1
        let f = Instance::new(1, vec![Clause::new(2.0, vec![p(1), n(1)])]).unwrap();
        let r = derandomize_half(&f);
        assert_eq!(r.valuation.get(Variable(1)), Assignment::False);
        assert_eq!(r.weight, 2.0);
    }

    #[test]
    fn no_variables() {
        let f = Instance::new(0, vec![Clause::new(4.0, vec![])]).unwrap();
        let r = derandomize_half(&f);
        assert_eq!(r.valuation.num_variables(), 0);
        assert_eq!(r.weight, 0.0);
        assert_eq!(r.expectations, vec![0.0]);
    }

    proptest! {
        #[test]
        fn proptest_half_approximation(f in instance_strategy()) {
            let r = derandomize_half(&f);
            prop_assert!(r.weight + TOLERANCE >= f.total_weight() / 2.0);
        }

        #[test]
        fn proptest_monotone_refinement(f in instance_strategy(), ps in proptest::collection::vec(0.0f64..=1.0, 8)) {
            for r in [derandomize_half(&f), derandomize(&f, &Probabilities::PerVariable(ps.clone()))].iter() {
                for w in r.expectations.windows(2) {
                    prop_assert!(w[1] + TOLERANCE >= w[0], "{:?}", r.expectations);
                }
                prop_assert!((r.expectations.last().unwrap() - r.weight).abs() < TOLERANCE);
            }
        }

        #[test]
        fn proptest_deterministic(f in instance_strategy(), ps in proptest::collection::vec(0.0f64..=1.0, 8)) {
            let a = derandomize_half(&f);
            let b = derandomize_half(&f);
            prop_assert_eq!(a.valuation, b.valuation);
            prop_assert_eq!(a.weight, b.weight);

            let a = derandomize_lp_rounding(&f, &ps);
            let b = derandomize_lp_rounding(&f, &ps);
            prop_assert_eq!(a.valuation, b.valuation);
            prop_assert_eq!(a.weight, b.weight);
        }

        #[test]
        fn proptest_below_optimum(f in instance_strategy(), ps in proptest::collection::vec(0.0f64..=1.0, 8)) {
            let optimum = match solve_brute_force(&f, &Config::default()) {
                BruteForce::Optimal { weight, .. } => weight,
                BruteForce::Skipped { .. } => unreachable!(),
            };
            prop_assert!(derandomize_half(&f).weight <= optimum + TOLERANCE);
            prop_assert!(derandomize_lp_rounding(&f, &ps).weight <= optimum + TOLERANCE);
        }
    }
}
