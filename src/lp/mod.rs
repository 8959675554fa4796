pub mod simplex;

use crate::config::Config;
use crate::formula::Instance;
use log::{debug, warn};
use simplex::{LpOutcome, Simplex};
use std::fmt::{self, Display, Formatter};

/// `max c.x` subject to `A x <= b`, `x >= 0`, with `b >= 0`.
#[derive(Clone, Debug)]
pub struct LinearProgram {
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
    c: Vec<f64>,
}

impl LinearProgram {
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>) -> Result<Self, LpError> {
        if a.len() != b.len() {
            return Err(LpError::DimensionMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }
        if let Some(row) = a.iter().find(|row| row.len() != c.len()) {
            return Err(LpError::DimensionMismatch {
                expected: c.len(),
                found: row.len(),
            });
        }
        if a.iter().flatten().chain(&b).chain(&c).any(|x| !x.is_finite()) {
            return Err(LpError::NonFinite);
        }
        if let Some(row) = b.iter().position(|x| *x < 0.0) {
            return Err(LpError::NegativeRhs { row });
        }
        Ok(Self { a, b, c })
    }

    pub fn num_constraints(&self) -> usize {
        self.a.len()
    }

    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.a.iter().map(Vec::as_slice)
    }

    pub fn rhs(&self) -> &[f64] {
        &self.b
    }

    pub fn objective(&self) -> &[f64] {
        &self.c
    }

    pub fn solve(&self, epsilon: f64) -> LpOutcome {
        Simplex::new(self, epsilon).solve()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LpError {
    DimensionMismatch { expected: usize, found: usize },
    NegativeRhs { row: usize },
    NonFinite,
}

impl Display for LpError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LpError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {}, found {}", expected, found)
            }
            LpError::NegativeRhs { row } => write!(f, "row {} has a negative right-hand side", row),
            LpError::NonFinite => f.write_str("coefficients must be finite"),
        }
    }
}

impl std::error::Error for LpError {}

/// The MAX-SAT relaxation over `x_1..x_n` followed by `y_1..y_m`:
///
/// ```text
/// max  sum w_C y_C
/// s.t. y_C - sum_{x_i in C} x_i + sum_{!x_i in C} x_i <= neg(C)   for each clause
///      x_i <= 1, y_C <= 1
/// ```
pub fn relaxation(instance: &Instance) -> LinearProgram {
    let n = instance.num_variables();
    let m = instance.num_clauses();
    let num_vars = n + m;

    let mut a = Vec::with_capacity(m + n + m);
    let mut b = Vec::with_capacity(m + n + m);

    for (ci, clause) in instance.clauses().enumerate() {
        let mut row = vec![0.0; num_vars];
        for literal in clause.literals() {
            if literal.is_positive() {
                row[literal.idx() - 1] -= 1.0;
            } else {
                row[literal.idx() - 1] += 1.0;
            }
        }
        row[n + ci] = 1.0;
        a.push(row);
        b.push(clause.negative_count() as f64);
    }
    for i in 0..num_vars {
        let mut row = vec![0.0; num_vars];
        row[i] = 1.0;
        a.push(row);
        b.push(1.0);
    }

    let mut c = vec![0.0; num_vars];
    for (ci, clause) in instance.clauses().enumerate() {
        c[n + ci] = clause.weight();
    }

    LinearProgram { a, b, c }
}

#[derive(Clone, Debug)]
pub struct LpRelaxation {
    /// Optimal relaxation value; an upper bound on the MAX-SAT optimum. Infinite if unbounded.
    pub bound: f64,
    /// Rounding probability of each variable, entry `i` for variable `i + 1`.
    pub probabilities: Vec<f64>,
    /// Set when the solver found no finite optimum and uniform probabilities were used.
    pub fallback: bool,
}

/// Solves the relaxation and turns the `x` values into rounding probabilities.
pub fn solve_relaxation(instance: &Instance, config: &Config) -> LpRelaxation {
    let lp = relaxation(instance);
    debug!(
        "relaxation: {} constraints, {} variables",
        lp.num_constraints(),
        lp.num_variables()
    );
    relaxation_result(lp.solve(config.epsilon), instance.num_variables())
}

/// Reads the first `n` solution values as rounding probabilities. An unbounded
/// outcome falls back to 1/2 for every variable.
pub fn relaxation_result(outcome: LpOutcome, n: usize) -> LpRelaxation {
    match outcome {
        LpOutcome::Optimal { objective, solution } => LpRelaxation {
            bound: objective,
            probabilities: solution[..n].iter().map(|x| clamp_probability(*x)).collect(),
            fallback: false,
        },
        LpOutcome::Unbounded => {
            warn!("relaxation unbounded, rounding with uniform probabilities");
            LpRelaxation {
                bound: f64::INFINITY,
                probabilities: vec![0.5; n],
                fallback: true,
            }
        }
    }
}

/// Pulls solver noise back into `[0, 1]`; non-finite values read as 0.
pub fn clamp_probability(x: f64) -> f64 {
    if x.is_finite() {
        x.max(0.0).min(1.0)
    } else {
        0.0
    }
}
