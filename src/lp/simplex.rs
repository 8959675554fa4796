//! Primal simplex over a dense tableau.
//!
//! Only programs whose all-slack basis is feasible are handled (`b >= 0`), so
//! there is no phase one. The tableau keeps non-basic columns only:
//!
//! ```text
//!            col 0      col j (non-basic label N[j])
//! row 0      objective  negated reduced cost
//! row i      x_B[i]     coefficient
//! ```
//!
//! Labels `1..=n` name the structural variables, `n+1..=n+m` the slacks.
//! The entering column is the first with a negative reduced cost; the leaving
//! row is the first to reach the minimum ratio.

use crate::lp::LinearProgram;
use log::{debug, trace};

#[derive(Clone, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal { objective: f64, solution: Vec<f64> },
    Unbounded,
}

impl LpOutcome {
    /// Optimal value, or positive infinity when unbounded.
    pub fn objective(&self) -> f64 {
        match self {
            LpOutcome::Optimal { objective, .. } => *objective,
            LpOutcome::Unbounded => f64::INFINITY,
        }
    }

    pub fn solution(&self) -> Option<&[f64]> {
        match self {
            LpOutcome::Optimal { solution, .. } => Some(solution),
            LpOutcome::Unbounded => None,
        }
    }
}

pub struct Simplex {
    rows: usize,
    cols: usize,
    // (rows + 1) x (cols + 1), row-major
    tableau: Vec<f64>,
    basic: Vec<usize>,
    non_basic: Vec<usize>,
    epsilon: f64,
}

impl Simplex {
    pub fn new(lp: &LinearProgram, epsilon: f64) -> Self {
        let rows = lp.num_constraints();
        let cols = lp.num_variables();
        let width = cols + 1;

        let mut tableau = vec![0.0; (rows + 1) * width];
        for (j, c) in lp.objective().iter().enumerate() {
            tableau[j + 1] = -c;
        }
        for (i, (row, rhs)) in lp.rows().zip(lp.rhs()).enumerate() {
            let start = (i + 1) * width;
            tableau[start] = *rhs;
            tableau[start + 1..start + width].copy_from_slice(row);
        }

        let mut basic = vec![0; rows + 1];
        for (i, label) in basic.iter_mut().enumerate().skip(1) {
            *label = cols + i;
        }
        let non_basic = (0..=cols).collect();

        Self {
            rows,
            cols,
            tableau,
            basic,
            non_basic,
            epsilon,
        }
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.tableau[i * (self.cols + 1) + j]
    }

    fn entering(&self) -> Option<usize> {
        (1..=self.cols).find(|&j| self.at(0, j) < -self.epsilon)
    }

    /// Minimum-ratio row for column `s`; a later row only wins by more than epsilon.
    fn leaving(&self, s: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 1..=self.rows {
            let coef = self.at(i, s);
            if coef <= self.epsilon {
                continue;
            }
            let ratio = self.at(i, 0) / coef;
            best = match best {
                None => Some((i, ratio)),
                Some((_, min)) if ratio < min - self.epsilon => Some((i, ratio)),
                kept => kept,
            };
        }
        best.map(|(r, _)| r)
    }

    fn pivot(&mut self, r: usize, s: usize) {
        let width = self.cols + 1;
        let inv = 1.0 / self.tableau[r * width + s];

        for j in 0..width {
            if j != s {
                self.tableau[r * width + j] *= inv;
            }
        }
        self.tableau[r * width + s] = inv;

        for i in 0..=self.rows {
            if i == r {
                continue;
            }
            let coef = self.tableau[i * width + s];
            if coef == 0.0 {
                continue;
            }
            for j in 0..width {
                if j != s {
                    let delta = coef * self.tableau[r * width + j];
                    self.tableau[i * width + j] -= delta;
                }
            }
            self.tableau[i * width + s] = -coef * inv;
        }

        std::mem::swap(&mut self.basic[r], &mut self.non_basic[s]);
    }

    pub fn solve(mut self) -> LpOutcome {
        let mut pivots = 0usize;
        while let Some(s) = self.entering() {
            let r = match self.leaving(s) {
                Some(r) => r,
                None => {
                    debug!("simplex: unbounded in x{} after {} pivots", self.non_basic[s], pivots);
                    return LpOutcome::Unbounded;
                }
            };
            trace!(
                "pivot {}: x{} enters, x{} leaves, objective {}",
                pivots,
                self.non_basic[s],
                self.basic[r],
                self.at(0, 0)
            );
            self.pivot(r, s);
            pivots += 1;
        }

        let mut solution = vec![0.0; self.cols];
        for i in 1..=self.rows {
            let label = self.basic[i];
            if label >= 1 && label <= self.cols {
                solution[label - 1] = self.at(i, 0);
            }
        }
        let objective = self.at(0, 0);
        debug!("simplex: optimal {} after {} pivots", objective, pivots);
        LpOutcome::Optimal { objective, solution }
    }
}
