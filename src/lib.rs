//! Weighted MAX-SAT approximation: the derandomized 1/2-approximation, derandomized
//! LP rounding backed by a dense simplex solver, and an exhaustive baseline to check both.

pub mod brute_force;
pub mod compare;
pub mod config;
pub mod derandomize;
pub mod formula;
pub mod lp;
pub mod rounding;
pub mod valuation;

pub use brute_force::{solve_brute_force, BruteForce};
pub use compare::Comparison;
pub use config::Config;
pub use derandomize::{derandomize_half, derandomize_lp_rounding, Derandomized};
pub use formula::{Clause, Instance, InstanceError, Literal, Variable};
pub use lp::{solve_relaxation, LpRelaxation};
pub use valuation::{evaluate, expected_weight, Assignment, Probabilities, Valuation};
