use crate::formula::Instance;
use crate::lp::clamp_probability;
use crate::valuation::{evaluate, Assignment, Probabilities, Valuation};
use log::{debug, trace};
use rand::Rng;

/// Draws each variable true with its probability, clamped into `[0, 1]`.
pub fn sample<R: Rng>(instance: &Instance, probabilities: &Probabilities, rng: &mut R) -> Valuation {
    let mut valuation = Valuation::new(instance.num_variables());
    for v in instance.variables() {
        let value = rng.gen_bool(clamp_probability(probabilities.of(v)));
        valuation.set(v, Assignment::from(value));
    }
    valuation
}

#[derive(Clone, Debug)]
pub struct Sampled {
    pub valuation: Valuation,
    pub weight: f64,
    pub samples: usize,
}

/// Best of `samples` independent draws, the earliest winning ties. `None` if `samples` is zero.
pub fn best_of<R: Rng>(
    instance: &Instance,
    probabilities: &Probabilities,
    samples: usize,
    rng: &mut R,
) -> Option<Sampled> {
    let mut best: Option<Sampled> = None;
    for i in 0..samples {
        let valuation = sample(instance, probabilities, rng);
        let weight = evaluate(&valuation, instance.clauses());
        trace!("sample {}: {}", i, weight);
        if best.as_ref().map_or(true, |b| weight > b.weight) {
            best = Some(Sampled {
                valuation,
                weight,
                samples,
            });
        }
    }
    if let Some(b) = &best {
        debug!("best of {} samples: {}", samples, b.weight);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::small_instance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_env_log::test;

    #[test]
    fn certain_probabilities() {
        let f = small_instance();
        let mut rng = StdRng::seed_from_u64(7);
        let v = sample(&f, &Probabilities::PerVariable(vec![0.0, 1.0]), &mut rng);
        assert_eq!(v, Valuation::from_bits(2, 0b10));
        assert!(v.is_complete());
    }

    #[test]
    fn out_of_range_probabilities() {
        let f = small_instance();
        let mut rng = StdRng::seed_from_u64(3);
        let v = sample(&f, &Probabilities::PerVariable(vec![-0.5, 1.5]), &mut rng);
        assert_eq!(v, Valuation::from_bits(2, 0b10));

        let v = sample(&f, &Probabilities::Uniform(2.0), &mut rng);
        assert_eq!(v, Valuation::from_bits(2, 0b11));
    }

    #[test]
    fn same_seed_same_result() {
        let f = small_instance();
        let probabilities = Probabilities::Uniform(0.5);
        let a = best_of(&f, &probabilities, 16, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = best_of(&f, &probabilities, 16, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.valuation, b.valuation);
        assert_eq!(a.weight, b.weight);
        assert_eq!(a.samples, 16);
        assert!(a.weight <= 6.0);
    }

    #[test]
    fn many_samples_find_optimum() {
        // each draw hits x1 = false, x2 = true with probability 1/4
        let f = small_instance();
        let r = best_of(&f, &Probabilities::Uniform(0.5), 200, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(r.weight, 6.0);
    }

    #[test]
    fn zero_samples() {
        let f = small_instance();
        assert!(best_of(&f, &Probabilities::Uniform(0.5), 0, &mut StdRng::seed_from_u64(0)).is_none());
    }
}
