use crate::formula::{Clause, Literal, Variable};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Assignment {
    True,
    False,
    Undecided,
}

impl From<bool> for Assignment {
    fn from(b: bool) -> Self {
        if b {
            Assignment::True
        } else {
            Assignment::False
        }
    }
}

/// A (possibly partial) assignment of variables `1..=n`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Valuation {
    values: Vec<Assignment>,
}

impl Valuation {
    /// Every variable starts out undecided.
    pub fn new(num_variables: usize) -> Self {
        Self {
            values: vec![Assignment::Undecided; num_variables],
        }
    }

    /// Bit `i` of `bits` gives the value of variable `i + 1`.
    pub fn from_bits(num_variables: usize, bits: u64) -> Self {
        let mut valuation = Self::new(num_variables);
        valuation.set_bits(bits);
        valuation
    }

    pub(crate) fn set_bits(&mut self, bits: u64) {
        for (i, value) in self.values.iter_mut().enumerate() {
            *value = Assignment::from((bits >> i) & 1 == 1);
        }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, v: Variable) -> Assignment {
        self.values[v.0 - 1]
    }

    pub fn set(&mut self, v: Variable, value: Assignment) {
        self.values[v.0 - 1] = value;
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|a| *a != Assignment::Undecided)
    }

    /// Value of a literal under this valuation.
    pub fn assignment_for(&self, literal: &Literal) -> Assignment {
        match self.get(*literal.variable()) {
            Assignment::True => Assignment::from(literal.is_positive()),
            Assignment::False => Assignment::from(!literal.is_positive()),
            Assignment::Undecided => Assignment::Undecided,
        }
    }

    /// Variable values in index order; undecided reads as false.
    pub fn to_bools(&self) -> Vec<bool> {
        self.values.iter().map(|a| *a == Assignment::True).collect()
    }
}

/// Prints the 0/1 value of each variable in index order, space separated.
impl Display for Valuation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for value in &self.values {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            f.write_str(if *value == Assignment::True { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Per-variable probability of being set true.
#[derive(Clone, PartialEq, Debug)]
pub enum Probabilities {
    Uniform(f64),
    /// Entry `i` belongs to variable `i + 1`. Missing entries read as 0.
    PerVariable(Vec<f64>),
}

impl Probabilities {
    pub fn of(&self, v: Variable) -> f64 {
        match self {
            Probabilities::Uniform(p) => *p,
            Probabilities::PerVariable(ps) => ps.get(v.0 - 1).copied().unwrap_or(0.0),
        }
    }

    fn literal_true(&self, literal: &Literal) -> f64 {
        let p = self.of(*literal.variable());
        if literal.is_positive() {
            p
        } else {
            1.0 - p
        }
    }
}

/// Total weight of clauses satisfied by `valuation`, with undecided variables read as false.
pub fn evaluate<'a>(valuation: &Valuation, clauses: impl IntoIterator<Item = &'a Clause>) -> f64 {
    clauses
        .into_iter()
        .filter(|clause| {
            clause
                .literals()
                .any(|l| l.holds(valuation.get(*l.variable()) == Assignment::True))
        })
        .map(|clause| clause.weight())
        .sum()
}

/// Probability that `clause` ends up satisfied when undecided variables are drawn
/// independently with `probabilities`.
pub fn satisfaction_probability(valuation: &Valuation, clause: &Clause, probabilities: &Probabilities) -> f64 {
    let mut prod_unsat = 1.0;
    let mut has_undecided = false;
    for (i, literal) in clause.literals().enumerate() {
        match valuation.assignment_for(literal) {
            Assignment::True => return 1.0,
            Assignment::False => continue,
            Assignment::Undecided => {
                // A variable is drawn once per clause: repeats add nothing, x | !x always holds.
                match clause.literals().take(i).find(|l| l.variable() == literal.variable()) {
                    Some(earlier) if earlier == literal => continue,
                    Some(_) => return 1.0,
                    None => {}
                }
                has_undecided = true;
                prod_unsat *= 1.0 - probabilities.literal_true(literal);
            }
        }
    }
    if has_undecided {
        1.0 - prod_unsat
    } else {
        0.0
    }
}

/// Exact expected satisfied weight under the partial `valuation`.
pub fn expected_weight<'a>(
    valuation: &Valuation,
    clauses: impl IntoIterator<Item = &'a Clause>,
    probabilities: &Probabilities,
) -> f64 {
    clauses
        .into_iter()
        .map(|clause| clause.weight() * satisfaction_probability(valuation, clause, probabilities))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, small_instance, Instance};
    use test_env_log::test;

    const EPS: f64 = 1e-12;

    #[test]
    fn evaluate_complete() {
        let f = small_instance();
        // bit 0 is x1, bit 1 is x2
        let expected = [(0b00, 2.0), (0b01, 1.0), (0b10, 6.0), (0b11, 4.0)];
        for (bits, weight) in expected.iter() {
            let valuation = Valuation::from_bits(2, *bits);
            assert!(valuation.is_complete());
            assert_eq!(evaluate(&valuation, f.clauses()), *weight, "bits {:b}", bits);
        }
    }

    #[test]
    fn evaluate_reads_undecided_as_false() {
        let f = small_instance();
        let valuation = Valuation::new(2);
        assert!(!valuation.is_complete());
        assert_eq!(evaluate(&valuation, f.clauses()), evaluate(&Valuation::from_bits(2, 0), f.clauses()));
    }

    #[test]
    fn expected_uniform_from_scratch() {
        let f = small_instance();
        let e = expected_weight(&Valuation::new(2), f.clauses(), &Probabilities::Uniform(0.5));
        // 1 * 3/4 + 2 * 1/2 + 3 * 1/2
        assert!((e - 3.25).abs() < EPS);
    }

    #[test]
    fn expected_partial() {
        let f = small_instance();
        let mut valuation = Valuation::new(2);
        valuation.set(Variable(1), Assignment::True);
        let probabilities = Probabilities::PerVariable(vec![0.0, 0.25]);
        // clause 1 satisfied, clause 2 dead, clause 3 with p = 0.25
        let e = expected_weight(&valuation, f.clauses(), &probabilities);
        assert!((e - (1.0 + 0.0 + 0.75)).abs() < EPS);
    }

    #[test]
    fn expected_matches_evaluate_when_complete() {
        let f = small_instance();
        for bits in 0..4 {
            let valuation = Valuation::from_bits(2, bits);
            let e = expected_weight(&valuation, f.clauses(), &Probabilities::Uniform(0.5));
            assert_eq!(e, evaluate(&valuation, f.clauses()));
        }
    }

    #[test]
    fn duplicate_and_complementary_literals() {
        let f = Instance::new(
            1,
            vec![
                Clause::new(1.0, vec![p(1), p(1)]),
                Clause::new(1.0, vec![p(1), n(1)]),
                Clause::new(5.0, vec![]),
            ],
        )
        .unwrap();
        let probabilities = Probabilities::PerVariable(vec![0.3]);
        let e = expected_weight(&Valuation::new(1), f.clauses(), &probabilities);
        // (x1 | x1) holds with probability 0.3, (x1 | !x1) always
        assert!((e - 1.3).abs() < EPS);
        assert_eq!(evaluate(&Valuation::from_bits(1, 1), f.clauses()), 2.0);
    }

    #[test]
    fn missing_probability_reads_as_zero() {
        let probabilities = Probabilities::PerVariable(vec![0.7]);
        assert_eq!(probabilities.of(Variable(1)), 0.7);
        assert_eq!(probabilities.of(Variable(2)), 0.0);
    }

    #[test]
    fn display_valuation() {
        let mut valuation = Valuation::from_bits(3, 0b101);
        assert_eq!(valuation.to_string(), "1 0 1");
        valuation.set(Variable(3), Assignment::Undecided);
        assert_eq!(valuation.to_string(), "1 0 0");
        assert_eq!(valuation.to_bools(), vec![true, false, false]);
    }
}
