pub mod weighted;

use std::fmt::{self, Debug, Display, Formatter};

/// A Boolean variable. Indices are 1-based and bounded by the instance's variable count.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    /// Builds a literal from its signed integer form (`3` is x3, `-3` is !x3).
    pub fn from_signed(l: i64) -> Self {
        let v = Variable(l.unsigned_abs() as usize);
        if l < 0 {
            Literal::Negative(v)
        } else {
            Literal::Positive(v)
        }
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    /// Whether the literal holds when its variable takes `value`.
    pub fn holds(&self, value: bool) -> bool {
        value == self.is_positive()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "{}", x),
            Literal::Negative(Variable(x)) => write!(f, "!{}", x),
        }
    }
}

/// A weighted disjunction. Literal order carries no meaning and duplicates are allowed.
#[derive(Clone, Debug)]
pub struct Clause {
    weight: f64,
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(weight: f64, disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            weight,
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Number of negated occurrences, counting duplicates.
    pub fn negative_count(&self) -> usize {
        self.literals.iter().filter(|l| !l.is_positive()).count()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:", self.weight)?;
        if self.literals.len() > 1 {
            f.write_str("(")?;
        }
        let mut first_literal = true;
        for literal in &self.literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() > 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A weighted MAX-SAT instance over variables `1..=num_variables`.
///
/// Immutable once built; `new` checks that every literal is in range and
/// that every weight is finite and non-negative.
#[derive(Clone)]
pub struct Instance {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Instance {
    pub fn new(num_variables: usize, conjuncts: impl IntoIterator<Item = Clause>) -> Result<Self, InstanceError> {
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        for (idx, clause) in clauses.iter().enumerate() {
            if !clause.weight.is_finite() || clause.weight < 0.0 {
                return Err(InstanceError::InvalidWeight {
                    clause: idx,
                    weight: clause.weight,
                });
            }
            if let Some(literal) = clause.literals().find(|l| l.idx() == 0 || l.idx() > num_variables) {
                return Err(InstanceError::VariableOutOfRange {
                    clause: idx,
                    literal: *literal,
                    num_variables,
                });
            }
        }
        Ok(Self { num_variables, clauses })
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Variables in increasing index order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (1..=self.num_variables).map(Variable)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.clauses.iter().map(|c| c.weight).sum()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{} vars] ", self.num_variables)?;
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    VariableOutOfRange {
        clause: usize,
        literal: Literal,
        num_variables: usize,
    },
    InvalidWeight {
        clause: usize,
        weight: f64,
    },
}

impl Display for InstanceError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            InstanceError::VariableOutOfRange {
                clause,
                literal,
                num_variables,
            } => write!(
                f,
                "clause {}: literal {} out of range for {} variables",
                clause, literal, num_variables
            ),
            InstanceError::InvalidWeight { clause, weight } => {
                write!(f, "clause {}: weight {} is not finite and non-negative", clause, weight)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// The three-clause instance used throughout the tests: optimum 6 at x1=false, x2=true.
#[cfg(test)]
pub(crate) fn small_instance() -> Instance {
    Instance::new(
        2,
        vec![
            Clause::new(1.0, vec![p(1), p(2)]),
            Clause::new(2.0, vec![n(1)]),
            Clause::new(3.0, vec![p(2)]),
        ],
    )
    .unwrap()
}

/// Random instances small enough for the exact baseline. Clauses are never empty.
#[cfg(test)]
pub(crate) fn instance_strategy() -> impl proptest::strategy::Strategy<Value = Instance> {
    use proptest::prelude::*;

    (1usize..=8).prop_flat_map(|num_vars| {
        let literal = (1..=num_vars, any::<bool>()).prop_map(|(v, positive)| {
            if positive {
                Literal::Positive(Variable(v))
            } else {
                Literal::Negative(Variable(v))
            }
        });
        let clause = (0u32..=10, proptest::collection::vec(literal, 1..=4))
            .prop_map(|(w, literals)| Clause::new(w as f64, literals));
        proptest::collection::vec(clause, 1..=12)
            .prop_map(move |clauses| Instance::new(num_vars, clauses).unwrap())
    })
}
